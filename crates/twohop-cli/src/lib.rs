//! twohop CLI library
//!
//! Scans a vault directory into the in-memory index and runs one discovery
//! call for a chosen note. The binary in `main.rs` is a thin wrapper.

pub mod cli;
pub mod render;
pub mod scan;

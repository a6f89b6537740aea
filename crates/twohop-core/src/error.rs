//! Document store errors

use serde::{Deserialize, Serialize};

/// Common result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store operation errors
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "twohop")]
#[command(about = "twohop - two-hop link discovery for a markdown vault")]
#[command(version)]
pub struct Cli {
    /// Vault directory to scan
    pub vault: PathBuf,

    /// Active note path, relative to the vault root (omit for a full
    /// sorted listing of the vault)
    pub note: Option<String>,

    /// Config file path (defaults to <vault>/twohop.toml)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Override the configured sort order
    /// (path-asc, path-desc, mtime-asc, mtime-desc)
    #[arg(long)]
    pub sort: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use twohop_cli::cli::Cli;
use twohop_cli::{render, scan};
use twohop_core::{MetadataIndex, SortOrder, TwohopConfig, VaultStore};
use twohop_engine::LinkEngine;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.vault.join("twohop.toml"));
    let mut config = TwohopConfig::load(&config_path)?;
    if let Some(sort) = &cli.sort {
        config.sort_order = sort.parse::<SortOrder>()?;
    }

    let vault = Arc::new(scan::scan_vault(&cli.vault)?);
    info!(vault = %cli.vault.display(), "vault scanned");

    if let Some(note) = &cli.note {
        anyhow::ensure!(vault.exists(note), "note '{note}' not found in vault");
    }

    let index: Arc<dyn MetadataIndex> = vault.clone();
    let store: Arc<dyn VaultStore> = vault;
    let engine = LinkEngine::new(index, store, config);
    let result = engine.discover(cli.note.as_deref()).await;

    if cli.json {
        let json =
            serde_json::to_string_pretty(&result).context("failed to serialize result")?;
        println!("{json}");
    } else {
        render::print_text(&result);
    }

    Ok(())
}

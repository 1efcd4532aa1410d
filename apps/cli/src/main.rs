//! Command-line front end for the asset dumper
//!
//! ```bash
//! asset-dumper --path ./dump --asset-ids "1818,1819" --token "$ROBLOSECURITY"
//! ```

use anyhow::{bail, Context};
use asset_dumper::{
    parse_asset_ids, AssetId, ConsoleProgressReporter, DumpConfig, DumpError, Dumper,
    IntoProgressCallback,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Parser)]
#[command(name = "asset-dumper", about = "Download assets by ID and write a manifest of the results")]
struct Cli {
    /// A folder to download assets to
    #[arg(long)]
    path: PathBuf,

    /// A comma-separated list of asset IDs to dump
    #[arg(long = "asset-ids")]
    asset_ids: String,

    /// A .ROBLOSECURITY token
    #[arg(long, env = "ROBLOSECURITY", hide_env_values = true)]
    token: Option<String>,

    /// Maximum number of downloads in flight (default: all at once)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log every request and per-asset outcome
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file may supply ROBLOSECURITY
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if !cli.path.is_dir() {
        bail!("Path does not exist: {}", cli.path.display());
    }
    let path = cli.path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", cli.path.display()))?;

    let asset_ids = parse_asset_ids(&cli.asset_ids).context("Invalid --asset-ids")?;
    debug!("Parsed {} asset IDs", asset_ids.len());

    let mut config = DumpConfig::default();
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    if let Some(limit) = cli.concurrency {
        config = config.with_max_concurrent_downloads(limit);
    }

    let dumper = Dumper::new(config)?
        .with_progress(ConsoleProgressReporter::new(cli.verbose).into_callback())
        .with_failure_hook(Arc::new(|id: AssetId, error: &DumpError| {
            if let Some(suggestion) = error.suggestion() {
                warn!("Asset {}: {}", id, suggestion);
            }
        }));

    println!("Fetching asset information...");
    let report = dumper.run(&path, &asset_ids).await.map_err(describe)?;
    println!("Manifest written to {}", report.manifest_path.display());

    Ok(())
}

/// Attach the error's suggestion, if it has one
fn describe(error: DumpError) -> anyhow::Error {
    match error.suggestion().map(str::to_string) {
        Some(suggestion) => anyhow::Error::new(error).context(suggestion),
        None => anyhow::Error::new(error),
    }
}

//! Asset Dumper Library
//!
//! Batch downloads remote assets by numeric id. Metadata is looked up in
//! batches of 50, every asset's content is then fetched concurrently and
//! written as `<id>.<extension>`, and an `assets.json` manifest records which
//! downloads succeeded.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use asset_dumper::{
//!     AssetId, ConsoleProgressReporter, DumpConfig, DumpError, Dumper, IntoProgressCallback,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> asset_dumper::Result<()> {
//! let config = DumpConfig::default().with_token("my-security-token");
//!
//! let dumper = Dumper::new(config)?
//!     .with_progress(ConsoleProgressReporter::new(false).into_callback())
//!     .with_failure_hook(Arc::new(|id: AssetId, error: &DumpError| {
//!         eprintln!("asset {} failed: {}", id, error);
//!     }));
//!
//! let ids = asset_dumper::parse_asset_ids("1818,1819")?;
//! let report = dumper.run(Path::new("./assets"), &ids).await?;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```

pub mod dumper;

// Re-export commonly used types for convenience
pub use dumper::{
    parse_asset_ids, AssetId, AssetMetadata, AssetRecord, AssetSource,
    ConsoleProgressReporter, DumpConfig, DumpError, DumpReport, DumpSummary, Dumper,
    FailureHook, HttpAssetSource, IntoProgressCallback, Manifest, NullProgressReporter,
    ProgressCallback, ProgressEvent, ProgressReporter, Result,
};

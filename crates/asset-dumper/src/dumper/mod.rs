//! Dumper module
//!
//! This module contains all the dump functionality: core types,
//! configuration, the metadata API, batch downloads and the manifest.

pub mod api;
pub mod batch;
pub mod config;
pub mod core;
pub mod manifest;
pub mod r#lib;

// Re-export main types for convenience
pub use r#lib::{parse_asset_ids, DumpReport, Dumper};
pub use api::{fetch_metadata, AssetSource};
pub use batch::{download_all, plan_downloads};
pub use config::DumpConfig;
pub use self::core::{
    AssetId, AssetMetadata, AssetRecord, PlannedAsset,
    DumpError, Result, FileOperation,
    ProgressCallback, ProgressEvent, ProgressReporter, IntoProgressCallback,
    ConsoleProgressReporter, NullProgressReporter, FailureHook,
    DumpMetrics, DumpMetricsSnapshot, DumpSummary, HttpAssetSource,
};
pub use manifest::Manifest;

//! Core types used throughout the dumper
//!
//! This module contains the fundamental types that all other modules depend on.

pub mod asset_type;
pub mod error;
pub mod files;
pub mod http;
pub mod metrics;
pub mod progress;

pub use asset_type::{extension_for, filename_for, FALLBACK_EXTENSION};
pub use error::{DumpError, FileOperation, Result};
pub use files::{write_asset, write_manifest};
pub use http::HttpAssetSource;
pub use metrics::{DumpMetrics, DumpMetricsSnapshot, DumpSummary};
pub use progress::{
    ConsoleProgressReporter, FailureHook, IntoProgressCallback, NullProgressReporter,
    ProgressCallback, ProgressEvent, ProgressReporter,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Numeric identifier of a remote asset
pub type AssetId = u64;

/// Metadata returned by the metadata endpoint for one asset
///
/// Only the fields the dumper needs are decoded; anything else the
/// endpoint sends is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetMetadata {
    pub id: AssetId,
    pub name: String,
    #[serde(rename = "typeId")]
    pub type_id: u32,
}

/// An asset whose destination has been decided but whose download has not
/// settled yet
#[derive(Debug, Clone)]
pub struct PlannedAsset {
    pub id: AssetId,
    pub name: String,
    pub type_id: u32,
    pub filename: String,
    pub path: PathBuf,
}

impl PlannedAsset {
    /// Derive the filename and destination for an asset from its metadata
    pub fn from_metadata(metadata: &AssetMetadata, output_dir: &Path) -> Self {
        let filename = filename_for(metadata.id, metadata.type_id);
        Self {
            id: metadata.id,
            name: metadata.name.clone(),
            type_id: metadata.type_id,
            path: output_dir.join(&filename),
            filename,
        }
    }

    /// Consume the plan into its final manifest record
    pub fn settle(self, success: bool) -> AssetRecord {
        AssetRecord {
            name: self.name,
            id: self.id,
            filename: self.filename,
            type_id: self.type_id,
            success,
        }
    }
}

/// One manifest entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
    pub id: AssetId,
    pub filename: String,
    pub type_id: u32,
    pub success: bool,
}

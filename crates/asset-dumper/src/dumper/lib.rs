//! The dumper facade: metadata, downloads and manifest for one run

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::dumper::{
    api::{fetch_metadata, AssetSource},
    batch::{download_all, plan_downloads},
    config::DumpConfig,
    core::{
        files::ensure_output_dir, write_manifest, AssetId, DumpError, DumpMetrics,
        DumpMetricsSnapshot, DumpSummary, FailureHook, HttpAssetSource, ProgressCallback, Result,
    },
    manifest::Manifest,
};

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct DumpReport {
    pub manifest: Manifest,
    pub summary: DumpSummary,
    pub manifest_path: PathBuf,
    pub metrics: DumpMetricsSnapshot,
}

/// Runs the whole pipeline against one asset source
///
/// ```rust,no_run
/// use asset_dumper::{DumpConfig, Dumper};
/// use std::path::Path;
///
/// # async fn example() -> asset_dumper::Result<()> {
/// let dumper = Dumper::new(DumpConfig::default())?;
/// let report = dumper.run(Path::new("./assets"), &[1818, 1819]).await?;
/// println!("{}", report.summary);
/// # Ok(())
/// # }
/// ```
pub struct Dumper<S: AssetSource = HttpAssetSource> {
    config: DumpConfig,
    source: S,
    progress_callback: Option<ProgressCallback>,
    failure_hook: Option<FailureHook>,
}

impl Dumper<HttpAssetSource> {
    /// Create a dumper talking to the configured HTTP endpoints
    pub fn new(config: DumpConfig) -> Result<Self> {
        config.validate()?;
        let source = HttpAssetSource::from_config(&config)?;
        Ok(Self::with_source(config, source))
    }
}

impl<S: AssetSource> Dumper<S> {
    /// Create a dumper over any asset source
    pub fn with_source(config: DumpConfig, source: S) -> Self {
        Self {
            config,
            source,
            progress_callback: None,
            failure_hook: None,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Observe per-asset errors that the manifest reduces to `success = false`
    pub fn with_failure_hook(mut self, hook: FailureHook) -> Self {
        self.failure_hook = Some(hook);
        self
    }

    /// Dump `ids` into `output_dir` and write the manifest there
    ///
    /// Metadata failures, missing metadata and a missing output directory
    /// abort the run before any file is written. Download failures only mark
    /// the affected asset as failed.
    pub async fn run(&self, output_dir: &Path, ids: &[AssetId]) -> Result<DumpReport> {
        if ids.is_empty() {
            return Err(DumpError::EmptyAssetList);
        }
        self.config.validate()?;
        ensure_output_dir(output_dir).await?;

        info!("Fetching asset information for {} assets", ids.len());
        let metadata = fetch_metadata(
            &self.source,
            ids,
            self.config.metadata_batch_size,
            self.progress_callback.as_ref(),
        )
        .await?;
        debug!("Received metadata for {} distinct assets", metadata.len());

        let planned = plan_downloads(ids, &metadata, output_dir)?;

        info!("Downloading {} assets to {}", planned.len(), output_dir.display());
        let metrics = DumpMetrics::default();
        let records = download_all(
            &self.source,
            &metrics,
            planned,
            self.progress_callback.clone(),
            self.failure_hook.clone(),
            self.config.max_concurrent_downloads,
        )
        .await;

        let manifest = Manifest::new(records);
        let summary = manifest.summary();
        info!("{}", summary);

        let manifest_path = write_manifest(output_dir, &self.config.manifest_filename, &manifest).await?;

        Ok(DumpReport {
            manifest,
            summary,
            manifest_path,
            metrics: metrics.snapshot(),
        })
    }
}

/// Parse a comma-separated list of asset ids such as `"1818, 1819,1820"`
pub fn parse_asset_ids(input: &str) -> Result<Vec<AssetId>> {
    if input.trim().is_empty() {
        return Err(DumpError::EmptyAssetList);
    }

    input
        .split(',')
        .map(|part| {
            let part = part.trim();
            let id = part.parse::<AssetId>().map_err(|e| DumpError::InvalidAssetId {
                input: part.to_string(),
                reason: e.to_string(),
            })?;
            if id == 0 {
                return Err(DumpError::InvalidAssetId {
                    input: part.to_string(),
                    reason: "asset IDs must be positive".to_string(),
                });
            }
            Ok(id)
        })
        .collect()
}

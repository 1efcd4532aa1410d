//! Progress tracking and reporting for dump operations

use std::io::Write;
use std::sync::Arc;

use super::{AssetId, DumpError, DumpSummary};

/// Progress callback for dump operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Observer for per-asset errors that would otherwise only be reduced to
/// `success = false` in the manifest
pub type FailureHook = Arc<dyn Fn(AssetId, &DumpError) + Send + Sync>;

/// Events emitted during a dump
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    MetadataBatchFetched {
        batch: usize,
        batches: usize,
        assets: usize,
    },
    BatchStarted {
        total: usize,
    },
    AssetSettled {
        id: AssetId,
        success: bool,
        settled: usize,
        total: usize,
    },
    BatchFinished {
        succeeded: usize,
        failed: usize,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_metadata_batch(&self, _batch: usize, _batches: usize, _assets: usize) {}
    fn on_batch_started(&self, _total: usize) {}
    fn on_asset_settled(&self, _id: AssetId, _success: bool, _settled: usize, _total: usize) {}
    fn on_batch_finished(&self, _succeeded: usize, _failed: usize) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::MetadataBatchFetched { batch, batches, assets } => {
                self.on_metadata_batch(batch, batches, assets);
            }
            ProgressEvent::BatchStarted { total } => {
                self.on_batch_started(total);
            }
            ProgressEvent::AssetSettled { id, success, settled, total } => {
                self.on_asset_settled(id, success, settled, total);
            }
            ProgressEvent::BatchFinished { succeeded, failed } => {
                self.on_batch_finished(succeeded, failed);
            }
        })
    }
}

/// Console reporter that keeps a running `settled/total` count on one line
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_metadata_batch(&self, batch: usize, batches: usize, assets: usize) {
        if self.verbose {
            println!("Fetched metadata batch {}/{} ({} assets)", batch, batches, assets);
        }
    }

    fn on_batch_started(&self, total: usize) {
        print!("Downloading... [0/{}]", total);
        let _ = std::io::stdout().flush();
    }

    fn on_asset_settled(&self, id: AssetId, success: bool, settled: usize, total: usize) {
        if self.verbose {
            let status = if success { "ok" } else { "failed" };
            println!("\rDownloading... [{}/{}] {} {}", settled, total, id, status);
        } else {
            print!("\rDownloading... [{}/{}]", settled, total);
            let _ = std::io::stdout().flush();
        }
    }

    fn on_batch_finished(&self, succeeded: usize, failed: usize) {
        if !self.verbose {
            println!();
        }
        println!("{}", DumpSummary { total: succeeded + failed, succeeded, failed });
    }
}

/// Reporter that ignores every event
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}

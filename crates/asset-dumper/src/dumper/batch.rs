//! Planning and running the concurrent downloads of one batch

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, error, warn};

use crate::dumper::api::AssetSource;
use crate::dumper::core::{
    write_asset, AssetId, AssetMetadata, AssetRecord, DumpError, DumpMetrics, FailureHook,
    PlannedAsset, ProgressCallback, ProgressEvent, Result,
};

/// Decide a destination for every requested id, in request order
///
/// Fails on the first id that has no metadata; nothing has been downloaded
/// at that point.
pub fn plan_downloads(
    ids: &[AssetId],
    metadata: &HashMap<AssetId, AssetMetadata>,
    output_dir: &Path,
) -> Result<Vec<PlannedAsset>> {
    ids.iter()
        .map(|id| {
            metadata
                .get(id)
                .map(|asset| PlannedAsset::from_metadata(asset, output_dir))
                .ok_or(DumpError::MissingMetadata { id: *id })
        })
        .collect()
}

/// Fetch and write one asset
async fn download_asset<S: AssetSource + ?Sized>(source: &S, asset: &PlannedAsset) -> Result<u64> {
    let content = source.fetch_content(asset.id).await?;
    write_asset(&asset.path, &content).await
}

/// Download every planned asset concurrently
///
/// All downloads are in flight at once unless `max_concurrent` caps them.
/// Records come back in the order of `planned`, whatever order the
/// downloads finish in. Failures never abort siblings: they are logged,
/// handed to `failure_hook`, and reduced to `success = false`.
pub async fn download_all<S: AssetSource + ?Sized>(
    source: &S,
    metrics: &DumpMetrics,
    planned: Vec<PlannedAsset>,
    progress_callback: Option<ProgressCallback>,
    failure_hook: Option<FailureHook>,
    max_concurrent: Option<usize>,
) -> Vec<AssetRecord> {
    let total = planned.len();
    let limit = max_concurrent.unwrap_or(total).max(1);
    debug!("Starting download of {} assets with limit={}", total, limit);

    if let Some(ref callback) = progress_callback {
        callback(ProgressEvent::BatchStarted { total });
    }

    let records: Vec<AssetRecord> = stream::iter(planned)
        .map(|asset| {
            let progress_cb = progress_callback.clone();
            let hook = failure_hook.clone();
            async move {
                let (success, settled) = match download_asset(source, &asset).await {
                    Ok(size) => (true, metrics.record_success(size)),
                    Err(e) => {
                        if e.is_per_asset() {
                            warn!("Failed to download asset {} ({}): {}", asset.id, e.category(), e);
                        } else {
                            // A source raised a run-level error for one asset; it still only fails that asset
                            error!("Unexpected error downloading asset {} ({}): {}", asset.id, e.category(), e);
                        }
                        if let Some(ref hook) = hook {
                            hook(asset.id, &e);
                        }
                        (false, metrics.record_failure())
                    }
                };

                if let Some(ref callback) = progress_cb {
                    callback(ProgressEvent::AssetSettled {
                        id: asset.id,
                        success,
                        settled: settled as usize,
                        total,
                    });
                }

                asset.settle(success)
            }
        })
        .buffered(limit)
        .collect()
        .await;

    let succeeded = records.iter().filter(|record| record.success).count();
    if let Some(ref callback) = progress_callback {
        callback(ProgressEvent::BatchFinished {
            succeeded,
            failed: records.len() - succeeded,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::tempdir;

    /// Content source where some ids fail and lower ids take longer
    struct StaggeredSource {
        failing: Vec<AssetId>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl StaggeredSource {
        fn new(failing: Vec<AssetId>) -> Self {
            Self { failing, in_flight: AtomicUsize::new(0), peak: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl AssetSource for StaggeredSource {
        async fn fetch_metadata_batch(&self, _ids: &[AssetId]) -> Result<Vec<AssetMetadata>> {
            Ok(Vec::new())
        }

        async fn fetch_content(&self, id: AssetId) -> Result<Bytes> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50 / id.max(1))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(&id) {
                Err(DumpError::ContentStatus { id, status: 404 })
            } else {
                Ok(Bytes::from(format!("content of {id}")))
            }
        }
    }

    fn metadata_for(ids: &[AssetId], type_id: u32) -> HashMap<AssetId, AssetMetadata> {
        ids.iter()
            .map(|id| (*id, AssetMetadata { id: *id, name: format!("Asset {id}"), type_id }))
            .collect()
    }

    #[test]
    fn test_plan_keeps_request_order() {
        let ids = [3, 1, 2];
        let metadata = metadata_for(&ids, 3);

        let planned = plan_downloads(&ids, &metadata, Path::new("out")).unwrap();

        let filenames: Vec<_> = planned.iter().map(|asset| asset.filename.as_str()).collect();
        assert_eq!(filenames, vec!["3.mp3", "1.mp3", "2.mp3"]);
    }

    #[test]
    fn test_plan_fails_on_missing_metadata() {
        let metadata = metadata_for(&[1, 3], 1);

        let result = plan_downloads(&[1, 2, 3], &metadata, Path::new("out"));

        assert!(matches!(result, Err(DumpError::MissingMetadata { id: 2 })));
    }

    #[tokio::test]
    async fn test_records_in_submission_order_with_failures() {
        let temp_dir = tempdir().unwrap();
        let ids = [1, 2, 3, 4];
        let planned = plan_downloads(&ids, &metadata_for(&ids, 7), temp_dir.path()).unwrap();
        let source = StaggeredSource::new(vec![2]);
        let metrics = DumpMetrics::default();

        let records = download_all(&source, &metrics, planned, None, None, None).await;

        let outcome: Vec<_> = records.iter().map(|record| (record.id, record.success)).collect();
        assert_eq!(outcome, vec![(1, true), (2, false), (3, true), (4, true)]);
        assert!(temp_dir.path().join("1.txt").exists());
        assert!(!temp_dir.path().join("2.txt").exists());
        assert_eq!(source.peak.load(Ordering::SeqCst), 4);

        let snapshot = metrics.snapshot();
        assert_eq!((snapshot.succeeded, snapshot.failed), (3, 1));
    }

    #[tokio::test]
    async fn test_concurrency_cap_is_respected() {
        let temp_dir = tempdir().unwrap();
        let ids: Vec<AssetId> = (1..=6).collect();
        let planned = plan_downloads(&ids, &metadata_for(&ids, 1), temp_dir.path()).unwrap();
        let source = StaggeredSource::new(Vec::new());

        let records = download_all(&source, &DumpMetrics::default(), planned, None, None, Some(2)).await;

        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|record| record.success));
        assert!(source.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_failure_hook_and_progress_events() {
        let temp_dir = tempdir().unwrap();
        let ids = [1, 2, 3];
        let planned = plan_downloads(&ids, &metadata_for(&ids, 5), temp_dir.path()).unwrap();
        let source = StaggeredSource::new(vec![1, 3]);

        let failures = Arc::new(Mutex::new(Vec::new()));
        let failure_sink = failures.clone();
        let hook: FailureHook = Arc::new(move |id: AssetId, error: &DumpError| {
            failure_sink.lock().unwrap().push((id, error.category()));
        });

        let events = Arc::new(Mutex::new(Vec::new()));
        let event_sink = events.clone();
        let progress: ProgressCallback = Arc::new(move |event: ProgressEvent| event_sink.lock().unwrap().push(event));

        download_all(&source, &DumpMetrics::default(), planned, Some(progress), Some(hook), None).await;

        let mut failures = failures.lock().unwrap().clone();
        failures.sort();
        assert_eq!(failures, vec![(1, "content_status"), (3, "content_status")]);

        let events = events.lock().unwrap();
        assert_eq!(events.first(), Some(&ProgressEvent::BatchStarted { total: 3 }));
        assert_eq!(events.last(), Some(&ProgressEvent::BatchFinished { succeeded: 1, failed: 2 }));
        let settled: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::AssetSettled { settled, .. } => Some(*settled),
                _ => None,
            })
            .collect();
        assert_eq!(settled, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_download_errors_are_classified_per_asset() {
        let temp_dir = tempdir().unwrap();
        let ids = [1, 2];
        let planned = plan_downloads(&ids, &metadata_for(&ids, 1), &temp_dir.path().join("gone")).unwrap();
        let source = StaggeredSource::new(vec![1]);

        let failures = Arc::new(Mutex::new(Vec::new()));
        let failure_sink = failures.clone();
        let hook: FailureHook = Arc::new(move |id: AssetId, error: &DumpError| {
            failure_sink.lock().unwrap().push((id, error.category(), error.is_per_asset()));
        });

        let records = download_all(&source, &DumpMetrics::default(), planned, None, Some(hook), None).await;

        assert!(records.iter().all(|record| !record.success));
        let mut failures = failures.lock().unwrap().clone();
        failures.sort();
        assert_eq!(failures, vec![(1, "content_status", true), (2, "file_system", true)]);
    }

    #[tokio::test]
    async fn test_write_failure_marks_asset_failed() {
        let temp_dir = tempdir().unwrap();
        let missing_dir = temp_dir.path().join("gone");
        let ids = [5];
        let planned = plan_downloads(&ids, &metadata_for(&ids, 1), &missing_dir).unwrap();
        let source = StaggeredSource::new(Vec::new());

        let records = download_all(&source, &DumpMetrics::default(), planned, None, None, None).await;

        assert!(!records[0].success);
    }
}

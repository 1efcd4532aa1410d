//! Batched metadata lookup

use std::collections::HashMap;
use tracing::debug;

use super::AssetSource;
use crate::dumper::core::{AssetId, AssetMetadata, DumpError, ProgressCallback, ProgressEvent, Result};

/// Fetch metadata for every id, `batch_size` ids per request
///
/// Batches are requested one after another in input order. Any failed batch
/// aborts the whole lookup. Ids the server does not return are absent from
/// the resulting map.
pub async fn fetch_metadata<S: AssetSource + ?Sized>(
    source: &S,
    ids: &[AssetId],
    batch_size: usize,
    progress_callback: Option<&ProgressCallback>,
) -> Result<HashMap<AssetId, AssetMetadata>> {
    if batch_size == 0 {
        return Err(DumpError::Configuration {
            message: "metadata batch size must be at least 1".to_string(),
            field: Some("metadata_batch_size".to_string()),
            suggestion: None,
        });
    }

    let batches = ids.len().div_ceil(batch_size);
    let mut results = HashMap::with_capacity(ids.len());

    for (index, chunk) in ids.chunks(batch_size).enumerate() {
        debug!("Requesting metadata batch {}/{} ({} ids)", index + 1, batches, chunk.len());
        let page = source.fetch_metadata_batch(chunk).await?;

        if page.len() < chunk.len() {
            debug!("Metadata batch {} returned {} of {} requested assets", index + 1, page.len(), chunk.len());
        }

        if let Some(callback) = progress_callback {
            callback(ProgressEvent::MetadataBatchFetched {
                batch: index + 1,
                batches,
                assets: page.len(),
            });
        }

        for metadata in page {
            results.insert(metadata.id, metadata);
        }
    }

    Ok(results)
}

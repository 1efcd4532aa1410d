//! Remote asset endpoints
//!
//! `AssetSource` is the seam between the pipeline and the network. The
//! production implementation is [`HttpAssetSource`](crate::dumper::core::HttpAssetSource).

pub mod metadata;

pub use metadata::fetch_metadata;

use async_trait::async_trait;
use bytes::Bytes;

use crate::dumper::core::{AssetId, AssetMetadata, Result};

/// Where asset metadata and content come from
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Look up metadata for one batch of ids with a single request
    ///
    /// Ids unknown to the server are simply missing from the result.
    async fn fetch_metadata_batch(&self, ids: &[AssetId]) -> Result<Vec<AssetMetadata>>;

    /// Retrieve the raw content of one asset
    async fn fetch_content(&self, id: AssetId) -> Result<Bytes>;
}

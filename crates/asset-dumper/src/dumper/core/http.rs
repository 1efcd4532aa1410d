//! HTTP utilities
//!
//! A single `reqwest::Client` carries the connection pool, the default
//! headers and the session cookie for every request of a run. All download
//! futures borrow it read-only.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::dumper::api::AssetSource;
use crate::dumper::config::{DumpConfig, SECURITY_COOKIE};
use crate::dumper::core::{AssetId, AssetMetadata, DumpError, Result};

/// Body of a metadata response
#[derive(Debug, Deserialize)]
struct MetadataPage {
    data: Vec<AssetMetadata>,
}

/// Asset source backed by the metadata and delivery HTTP endpoints
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    client: Client,
    metadata_url: String,
    delivery_url: String,
}

impl HttpAssetSource {
    /// Create a new HTTP source from dump configuration
    pub fn from_config(config: &DumpConfig) -> Result<Self> {
        let (header_name, header_value) = &config.asset_request_header;
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(header_name.as_bytes()).map_err(|e| DumpError::Configuration {
                message: format!("invalid header name '{}': {}", header_name, e),
                field: Some("asset_request_header".to_string()),
                suggestion: None,
            })?,
            HeaderValue::from_str(header_value).map_err(|e| DumpError::Configuration {
                message: format!("invalid header value '{}': {}", header_value, e),
                field: Some("asset_request_header".to_string()),
                suggestion: None,
            })?,
        );

        let jar = Arc::new(Jar::default());
        if let Some(token) = &config.token {
            let cookie = format!("{}={}; Path=/", SECURITY_COOKIE, token);
            for endpoint in [&config.metadata_url, &config.delivery_url] {
                let url = Url::parse(endpoint).map_err(|e| DumpError::InvalidUrl {
                    url: endpoint.clone(),
                    suggestion: "Endpoint must be an absolute URL".to_string(),
                    source: e,
                })?;
                jar.add_cookie_str(&cookie, &url);
            }
            debug!("Security token attached for metadata and delivery endpoints");
        }

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .cookie_provider(jar);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| DumpError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
            field: None,
            suggestion: None,
        })?;

        Ok(Self {
            client,
            metadata_url: config.metadata_url.clone(),
            delivery_url: config.delivery_url.clone(),
        })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch_metadata_batch(&self, ids: &[AssetId]) -> Result<Vec<AssetMetadata>> {
        let query: Vec<(&str, AssetId)> = ids.iter().map(|id| ("assetIds", *id)).collect();

        let response = self.client
            .get(&self.metadata_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| DumpError::MetadataRequest {
                url: self.metadata_url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DumpError::MetadataStatus {
                url: self.metadata_url.clone(),
                status: status.as_u16(),
            });
        }

        let page: MetadataPage = response.json().await
            .map_err(|e| DumpError::InvalidResponse {
                url: self.metadata_url.clone(),
                source: e,
            })?;

        Ok(page.data)
    }

    async fn fetch_content(&self, id: AssetId) -> Result<Bytes> {
        let response = self.client
            .get(&self.delivery_url)
            .query(&[("id", id)])
            .send()
            .await
            .map_err(|e| DumpError::ContentRequest {
                id,
                url: self.delivery_url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DumpError::ContentStatus {
                id,
                status: status.as_u16(),
            });
        }

        debug!("Asset {} resolved to {}", id, response.url());

        response.bytes().await
            .map_err(|e| DumpError::ContentRequest {
                id,
                url: self.delivery_url.clone(),
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_with_token() {
        let config = DumpConfig::default().with_token("secret");
        assert!(HttpAssetSource::from_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let config = DumpConfig {
            asset_request_header: ("bad header".to_string(), "true".to_string()),
            ..DumpConfig::default()
        };
        assert!(matches!(
            HttpAssetSource::from_config(&config),
            Err(DumpError::Configuration { .. })
        ));
    }

    #[test]
    fn test_invalid_endpoint_with_token_rejected() {
        let config = DumpConfig::default()
            .with_endpoints("relative/path", "https://example.com/asset")
            .with_token("secret");
        assert!(matches!(
            HttpAssetSource::from_config(&config),
            Err(DumpError::InvalidUrl { .. })
        ));
    }
}

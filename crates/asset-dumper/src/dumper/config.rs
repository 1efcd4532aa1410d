//! Configuration types for the dumper

use std::time::Duration;

use crate::dumper::core::{DumpError, Result};

/// Endpoint answering batched metadata lookups
pub const DEFAULT_METADATA_URL: &str = "https://develop.roblox.com/v1/assets";
/// Endpoint redirecting an asset id to its content
pub const DEFAULT_DELIVERY_URL: &str = "https://assetdelivery.roblox.com/v1/asset";
/// Server-imposed limit on ids per metadata request
pub const DEFAULT_METADATA_BATCH_SIZE: usize = 50;
/// Name of the session cookie carrying the security token
pub const SECURITY_COOKIE: &str = ".ROBLOSECURITY";

/// Configuration for a dump run
#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub metadata_url: String,
    pub delivery_url: String,
    pub user_agent: String,
    /// Header name/value marking requests as asset requests
    pub asset_request_header: (String, String),
    pub metadata_batch_size: usize,
    /// Cap on in-flight downloads; `None` launches every download at once
    pub max_concurrent_downloads: Option<usize>,
    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
    pub manifest_filename: String,
    /// Security token sent as a session cookie
    pub token: Option<String>,
}

impl DumpConfig {
    pub fn with_token<S: Into<String>>(mut self, token: S) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_endpoints<M: Into<String>, D: Into<String>>(mut self, metadata_url: M, delivery_url: D) -> Self {
        self.metadata_url = metadata_url.into();
        self.delivery_url = delivery_url.into();
        self
    }

    pub fn with_max_concurrent_downloads(mut self, limit: usize) -> Self {
        self.max_concurrent_downloads = Some(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check the configuration before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.metadata_batch_size == 0 {
            return Err(DumpError::Configuration {
                message: "metadata batch size must be at least 1".to_string(),
                field: Some("metadata_batch_size".to_string()),
                suggestion: Some(format!("Use the server limit of {}", DEFAULT_METADATA_BATCH_SIZE)),
            });
        }

        if self.max_concurrent_downloads == Some(0) {
            return Err(DumpError::Configuration {
                message: "download concurrency must be at least 1".to_string(),
                field: Some("max_concurrent_downloads".to_string()),
                suggestion: Some("Leave it unset to download everything at once".to_string()),
            });
        }

        if self.manifest_filename.is_empty() {
            return Err(DumpError::Configuration {
                message: "manifest filename is empty".to_string(),
                field: Some("manifest_filename".to_string()),
                suggestion: None,
            });
        }

        if let Some(token) = &self.token {
            // The cookie jar silently truncates or trims values it cannot parse
            if token.chars().any(|c| c == ';' || c.is_whitespace() || c.is_control()) {
                return Err(DumpError::Configuration {
                    message: "security token contains ';', whitespace or control characters".to_string(),
                    field: Some("token".to_string()),
                    suggestion: Some("Pass the cookie value only, without the name or attributes".to_string()),
                });
            }
        }

        for url in [&self.metadata_url, &self.delivery_url] {
            url::Url::parse(url).map_err(|e| match DumpError::from(e) {
                DumpError::InvalidUrl { suggestion, source, .. } => DumpError::InvalidUrl {
                    url: url.clone(),
                    suggestion,
                    source,
                },
                other => other,
            })?;
        }

        Ok(())
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            delivery_url: DEFAULT_DELIVERY_URL.to_string(),
            user_agent: "Roblox/WinInet".to_string(),
            asset_request_header: ("Roblox-Browser-Asset-Request".to_string(), "true".to_string()),
            metadata_batch_size: DEFAULT_METADATA_BATCH_SIZE,
            max_concurrent_downloads: None,
            timeout: None,
            manifest_filename: "assets.json".to_string(),
            token: None,
        }
    }
}

//! Error types for the dumper with enough context to report what went wrong
//! and whether the failure is confined to a single asset.

use std::path::PathBuf;
use thiserror::Error;

use super::AssetId;

/// Every failure the dump pipeline can produce
#[derive(Error, Debug)]
pub enum DumpError {
    /// Transport-level failure on a metadata batch
    #[error("Metadata request to '{url}' failed")]
    MetadataRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Transport-level failure fetching one asset's content
    #[error("Content request for asset {id} to '{url}' failed")]
    ContentRequest {
        id: AssetId,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The metadata endpoint answered with a non-success status
    #[error("Metadata request to '{url}' failed with status {status}")]
    MetadataStatus {
        url: String,
        status: u16,
    },

    /// The metadata endpoint answered with a body we could not decode
    #[error("Metadata response from '{url}' could not be decoded")]
    InvalidResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A requested asset has no entry in the merged metadata
    #[error("No metadata returned for asset {id}")]
    MissingMetadata {
        id: AssetId,
    },

    /// The delivery endpoint answered with a non-success status
    #[error("Content request for asset {id} failed with status {status}")]
    ContentStatus {
        id: AssetId,
        status: u16,
    },

    /// File system I/O errors with file context
    #[error("File operation failed while {operation} '{path}'")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// The output directory does not exist or is not a directory
    #[error("Output directory '{path}' does not exist")]
    OutputDirMissing {
        path: PathBuf,
    },

    /// Nothing to download
    #[error("No asset IDs specified")]
    EmptyAssetList,

    /// An entry in the asset id list is not a positive integer
    #[error("Invalid asset ID '{input}': {reason}")]
    InvalidAssetId {
        input: String,
        reason: String,
    },

    /// URL parsing errors with helpful suggestions
    #[error("Invalid URL '{url}': {suggestion}")]
    InvalidUrl {
        url: String,
        suggestion: String,
        #[source]
        source: url::ParseError,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },

    /// The manifest could not be serialized
    #[error("Failed to encode manifest")]
    ManifestEncode {
        #[source]
        source: serde_json::Error,
    },
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Create,
    Write,
    Metadata,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Metadata => write!(f, "reading metadata of"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DumpError>;

impl DumpError {
    /// Whether this error only affects the asset it was raised for.
    ///
    /// Per-asset errors are folded into `success = false` on the asset's
    /// record; everything else aborts the run.
    pub fn is_per_asset(&self) -> bool {
        matches!(
            self,
            DumpError::ContentStatus { .. }
                | DumpError::ContentRequest { .. }
                | DumpError::FileSystem { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DumpError::MetadataRequest { .. } => "metadata_request",
            DumpError::ContentRequest { .. } => "content_request",
            DumpError::MetadataStatus { .. } => "metadata_status",
            DumpError::InvalidResponse { .. } => "invalid_response",
            DumpError::MissingMetadata { .. } => "missing_metadata",
            DumpError::ContentStatus { .. } => "content_status",
            DumpError::FileSystem { .. } => "file_system",
            DumpError::OutputDirMissing { .. } => "output_dir_missing",
            DumpError::EmptyAssetList => "empty_asset_list",
            DumpError::InvalidAssetId { .. } => "invalid_asset_id",
            DumpError::InvalidUrl { .. } => "invalid_url",
            DumpError::Configuration { .. } => "configuration",
            DumpError::ManifestEncode { .. } => "manifest_encode",
        }
    }

    /// Get user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            DumpError::MetadataStatus { status: 401 | 403, .. }
            | DumpError::ContentStatus { status: 401 | 403, .. } => {
                Some("The asset may be private; supply a security token")
            }
            DumpError::MissingMetadata { .. } => {
                Some("Check that every asset ID exists and is visible to this account")
            }
            DumpError::OutputDirMissing { .. } => Some("Create the directory first"),
            DumpError::InvalidUrl { suggestion, .. } => Some(suggestion),
            DumpError::Configuration { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}

impl From<url::ParseError> for DumpError {
    fn from(error: url::ParseError) -> Self {
        let suggestion = match error {
            url::ParseError::EmptyHost => "URL must have a valid hostname",
            url::ParseError::InvalidPort => "Port number must be between 1 and 65535",
            url::ParseError::RelativeUrlWithoutBase => "URL must be absolute (include http:// or https://)",
            _ => "Check URL format and try again",
        }
        .to_string();

        DumpError::InvalidUrl {
            url: "<unparseable>".to_string(),
            suggestion,
            source: error,
        }
    }
}

impl From<serde_json::Error> for DumpError {
    fn from(error: serde_json::Error) -> Self {
        DumpError::ManifestEncode { source: error }
    }
}

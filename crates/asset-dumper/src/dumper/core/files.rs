//! File operation utilities
//!
//! Writing downloaded assets and the manifest to the output directory.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::dumper::core::{DumpError, FileOperation, Result};
use crate::dumper::manifest::Manifest;

/// Write asset content to `dest_path`, truncating any existing file
///
/// Returns the number of bytes written. The file handle is closed when this
/// function returns, whether or not the write succeeded.
pub async fn write_asset(dest_path: &Path, content: &[u8]) -> Result<u64> {
    let mut file = fs::File::create(dest_path).await
        .map_err(|e| DumpError::FileSystem {
            path: dest_path.to_path_buf(),
            operation: FileOperation::Create,
            source: e,
        })?;

    file.write_all(content).await
        .map_err(|e| DumpError::FileSystem {
            path: dest_path.to_path_buf(),
            operation: FileOperation::Write,
            source: e,
        })?;

    file.flush().await
        .map_err(|e| DumpError::FileSystem {
            path: dest_path.to_path_buf(),
            operation: FileOperation::Write,
            source: e,
        })?;

    debug!("Wrote {} bytes to {}", content.len(), dest_path.display());
    Ok(content.len() as u64)
}

/// Serialize the manifest and write it into `output_dir`, overwriting any
/// previous manifest. Not atomic.
pub async fn write_manifest(output_dir: &Path, filename: &str, manifest: &Manifest) -> Result<PathBuf> {
    let manifest_path = output_dir.join(filename);
    let json = manifest.to_json()?;

    fs::write(&manifest_path, json).await
        .map_err(|e| DumpError::FileSystem {
            path: manifest_path.clone(),
            operation: FileOperation::Write,
            source: e,
        })?;

    debug!("Wrote manifest with {} entries to {}", manifest.assets.len(), manifest_path.display());
    Ok(manifest_path)
}

/// Check that the output directory exists and is a directory
pub async fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    match fs::metadata(output_dir).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(DumpError::OutputDirMissing { path: output_dir.to_path_buf() }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DumpError::OutputDirMissing { path: output_dir.to_path_buf() })
        }
        Err(e) => Err(DumpError::FileSystem {
            path: output_dir.to_path_buf(),
            operation: FileOperation::Metadata,
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_asset_truncates_existing_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("1.png");
        tokio::fs::write(&path, b"a much longer previous payload").await.unwrap();

        let written = write_asset(&path, b"new").await.unwrap();

        assert_eq!(written, 3);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_write_asset_into_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing").join("1.png");

        match write_asset(&path, b"data").await.unwrap_err() {
            DumpError::FileSystem { operation, path: failed, .. } => {
                assert_eq!(operation, FileOperation::Create);
                assert_eq!(failed, path);
            }
            other => panic!("Expected FileSystem error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ensure_output_dir() {
        let temp_dir = tempdir().unwrap();
        assert!(ensure_output_dir(temp_dir.path()).await.is_ok());

        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            ensure_output_dir(&missing).await,
            Err(DumpError::OutputDirMissing { .. })
        ));

        let file = temp_dir.path().join("file.txt");
        tokio::fs::write(&file, b"x").await.unwrap();
        assert!(matches!(
            ensure_output_dir(&file).await,
            Err(DumpError::OutputDirMissing { .. })
        ));
    }
}

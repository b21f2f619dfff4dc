//! Filesystem probe abstraction.
//!
//! Override discovery only needs one operation from the platform: a status
//! query that distinguishes "does not exist" from every other failure.
//! Plugins hold an `Arc<dyn FileSystem>` so tests can substitute recording
//! or fault-injecting implementations.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result type for filesystem probe operations.
pub type FsResult<T> = Result<T, FsError>;

/// Errors surfaced by [`FileSystem`] implementations.
///
/// `NotFound` is the only error class that means "the path does not exist";
/// everything else is a real fault and must be propagated, never swallowed.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// Any other I/O failure while probing the path.
    #[error("I/O error probing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Whether this error means the probed path simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

/// Status information for a probed path.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File size in bytes.
    pub size: u64,
    /// Whether this is a regular file.
    pub is_file: bool,
    /// Whether this is a directory.
    pub is_dir: bool,
}

/// Platform filesystem probe.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Query a path's status. Returns [`FsError::NotFound`] when the path
    /// does not exist.
    async fn metadata(&self, path: &Path) -> FsResult<FileMetadata>;

    /// Existence check on top of [`FileSystem::metadata`].
    ///
    /// Returns `Ok(false)` for `NotFound` and propagates every other error.
    async fn exists(&self, path: &Path) -> FsResult<bool> {
        match self.metadata(path).await {
            Ok(_) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }
}

/// [`FileSystem`] backed by the real filesystem via tokio.
#[cfg(not(target_family = "wasm"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

#[cfg(not(target_family = "wasm"))]
impl NativeFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_family = "wasm"))]
#[async_trait]
impl FileSystem for NativeFileSystem {
    async fn metadata(&self, path: &Path) -> FsResult<FileMetadata> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(FileMetadata {
                size: meta.len(),
                is_file: meta.is_file(),
                is_dir: meta.is_dir(),
            }),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(FsError::NotFound(path.to_path_buf()))
            }
            Err(error) => Err(FsError::Io {
                path: path.to_path_buf(),
                source: error,
            }),
        }
    }
}

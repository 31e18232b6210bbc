//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, the interface media uploads
//! go through, and its implementations (local filesystem and, behind the
//! `mock` feature, an in-memory backend for tests).

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
use crate::error::{ErrorKind, Result};
use crate::models::FileInfo;
use crate::path::{numbered, validate as validate_path};
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use url::Url;

pub(crate) type FileInfoStream<'a> = Pin<Box<dyn Stream<Item = Result<FileInfo>> + Send + 'a>>;

/// How many numbered alternatives [`StorageBackend::available_path`] tries.
pub const MAX_NAME_ATTEMPTS: u32 = 100;

/// Unified interface for storage backends.
///
/// # Path Handling
/// All paths are relative to the storage root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations should
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use bookland_storage::{backend::StorageBackend, error::Result};
///
/// async fn cover_bytes(backend: &dyn StorageBackend) -> Result<Option<Vec<u8>>> {
///     let path = Path::new("uploads/book_images/01-dune-herbert.png");
///     if !backend.exists(path).await? {
///         return Ok(None);
///     }
///     Ok(Some(backend.read(path).await?))
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// List all files matching an optional prefix.
    ///
    /// Default implementation of this method is to collect all the results
    /// from [`list_stream()`](Self::list_stream) into a [`Vec`] before
    /// returning.
    async fn list(&self, prefix: Option<&Path>) -> Result<Vec<FileInfo>> {
        self.list_stream(prefix).try_collect().await
    }

    /// Stream file metadata matching an optional prefix.
    ///
    /// If a prefix is provided, only files whose paths start with the prefix
    /// (component-wise) are returned. A prefix that doesn't exist yields an
    /// empty stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::TryStreamExt;
    /// use std::path::Path;
    /// # use bookland_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// let mut torrents = backend.list_stream(Some(Path::new("uploads/torrents")));
    /// while let Some(info) = torrents.try_next().await? {
    ///     println!("{}: {} bytes", info.path.display(), info.size);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>) -> FileInfoStream<'a>;

    /// Check if a file exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write file contents.
    ///
    /// Creates a new file or overwrites an existing file with the provided data.
    ///
    /// # Notes
    /// - Implementations should create parent directories as needed.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Delete a file.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn delete(&self, path: &Path) -> Result<()>;

    /// Rename/move a file within the same backend.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the source
    /// file does not exist.
    ///
    /// # Notes
    /// - Implementations should create parent directories as needed
    /// - If the destination already exists, it will be overwritten
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// # use bookland_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// backend.rename(
    ///     Path::new("uploads/book_images/cover.png"),
    ///     Path::new("uploads/book_images/01-dune-herbert.png"),
    /// ).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Public URL the file at `path` is served under. The file doesn't need to exist.
    fn url(&self, path: &Path) -> Result<Url>;

    /// First of `path`, `stem_1.ext`, `stem_2.ext`, ... that isn't taken yet.
    ///
    /// Gives up with [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists)
    /// after [`MAX_NAME_ATTEMPTS`] alternatives.
    async fn available_path(&self, path: &Path) -> Result<PathBuf> {
        let path = validate_path(path)?;
        if !self.exists(&path).await? {
            return Ok(path);
        }
        for n in 1..=MAX_NAME_ATTEMPTS {
            let candidate = numbered(&path, n);
            if !self.exists(&candidate).await? {
                tracing::debug!(taken = %path.display(), chosen = %candidate.display(), "Storage path taken");
                return Ok(candidate);
            }
        }
        exn::bail!(ErrorKind::AlreadyExists(path))
    }
}

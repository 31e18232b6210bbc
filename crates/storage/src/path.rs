//! Path validation and public URL construction.
//!
//! Stored paths are always relative to the storage root. Anything that could
//! escape the root (`..` past the top, absolute prefixes, null bytes) is
//! rejected before a backend touches it.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Validates a storage path for security and correctness.
/// Ensures that paths don't escape the storage root (no `..` traversal).
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use bookland_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("uploads/torrents/dune-herbert-(kozy).torrent").is_ok());
/// assert!(validate_path("uploads/../uploads/cover.png").is_ok()); // (never leaves the media root)
/// // Invalid paths
/// assert!(validate_path("../etc/passwd").is_err());
/// assert!(validate_path("uploads/../../b").is_err()); // (leaves the media root)
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(
///     validate_path("uploads/./book_images//01-dune-herbert.png/").unwrap(),
///     Path::new("uploads/book_images/01-dune-herbert.png")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but
                // truncate in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Parses the public base URL files are served under.
///
/// A trailing slash is added when missing so that joining keeps the last
/// segment (`https://cdn.example/media` serves `https://cdn.example/media/uploads/...`).
pub fn parse_base_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base).or_raise(|| ErrorKind::InvalidUrl(base.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        exn::bail!(ErrorKind::InvalidUrl(base.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Public URL of the stored file at `path`. Reserved characters get percent-encoded.
pub fn public_url(base: &Url, path: &Path) -> Result<Url> {
    let validated = validate(path)?;
    let relative = validated.to_str().ok_or_raise(|| ErrorKind::InvalidPath(validated.clone()))?;
    // Path components must never be read as a scheme or query.
    let relative = relative.replace('?', "%3F").replace('#', "%23");
    base.join(&format!("./{relative}")).or_raise(|| ErrorKind::InvalidPath(validated.clone()))
}

/// `dir/name.ext` → `dir/name_{n}.ext`.
pub(crate) fn numbered(path: &Path, n: u32) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{n}"),
    };
    path.with_file_name(name)
}

use std::path::PathBuf;
use time::OffsetDateTime;

/// Metadata of a stored file, as reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Storage path, relative to the media root.
    pub path: PathBuf,
    pub size: u64,
    pub modified: OffsetDateTime,
}
impl FileInfo {
    pub fn new(path: impl Into<PathBuf>, size: u64, modified: OffsetDateTime) -> Self {
        Self { path: path.into(), size, modified }
    }
}


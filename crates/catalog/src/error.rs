//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Every failure is reported to the
//! immediate caller; nothing in this crate retries on its own.

use crate::guard::BlockReason;
use crate::slug::Collection;
use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input failed validation (missing name fields, bad extension, out of
    /// range values). Fix the input and try again.
    #[display("validation failed: {_0}")]
    Validation(#[error(not(source))] String),
    /// The slug is already taken within its collection.
    #[display("slug '{slug}' is already taken in {collection}")]
    UniquenessViolation { collection: Collection, slug: String },
    /// Deletion refused because dependent records still exist.
    #[display("{_0}")]
    Blocked(#[error(not(source))] BlockReason),
    /// The datastore (or blob storage) could not answer a query.
    #[display("storage unavailable")]
    StorageUnavailable,
}

impl ErrorKind {
    /// Shorthand for [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable)
    }
}

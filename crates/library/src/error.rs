//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the catalog rules, the
//! datastore and blob storage are re-raised under one of these kinds with the
//! original error kept as the child.

use bookland_catalog::error::{Error as CatalogError, ErrorKind as CatalogErrorKind};
use bookland_catalog::{BlockReason, Collection};
use bookland_db::error::{Error as DbError, ErrorKind as DbErrorKind};
use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// ### Caller Errors
/// - [`ErrorKind::Validation`]
/// - [`ErrorKind::UniquenessViolation`]
/// - [`ErrorKind::Conflict`]
/// - [`ErrorKind::Blocked`]
/// - [`ErrorKind::NotFound`]
///
/// ### Dependency Errors
/// - [`ErrorKind::StorageUnavailable`] - the datastore failed.
/// - [`ErrorKind::Media`] - blob storage failed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("validation failed: {_0}")]
    Validation(#[error(not(source))] String),
    #[display("slug '{slug}' is already taken in {collection}")]
    UniquenessViolation { collection: Collection, slug: String },
    /// A unique constraint other than a slug (platform name, one rating per
    /// user and book) rejected the save.
    #[display("{_0} already exists")]
    Conflict(#[error(not(source))] String),
    #[display("{_0}")]
    Blocked(#[error(not(source))] BlockReason),
    #[display("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[display("storage unavailable")]
    StorageUnavailable,
    #[display("media storage error")]
    Media,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable | Self::Media)
    }

    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Re-raise a catalog rule failure under the matching kind.
    #[track_caller]
    pub(crate) fn catalog(err: CatalogError) -> Error {
        let kind = match &*err {
            CatalogErrorKind::Validation(message) => Self::Validation(message.clone()),
            CatalogErrorKind::UniquenessViolation { collection, slug } => {
                Self::UniquenessViolation { collection: *collection, slug: slug.clone() }
            },
            CatalogErrorKind::Blocked(reason) => Self::Blocked(reason.clone()),
            CatalogErrorKind::StorageUnavailable => Self::StorageUnavailable,
        };
        err.raise(kind)
    }

    /// Re-raise a datastore failure under the matching kind.
    #[track_caller]
    pub(crate) fn datastore(err: DbError) -> Error {
        let kind = match &*err {
            DbErrorKind::Conflict(what) => Self::Conflict(what.to_string()),
            DbErrorKind::Constraint(what) => Self::Validation(format!("{what} refers to a missing record")),
            DbErrorKind::NotFound { entity, id } => Self::not_found(entity, *id),
            DbErrorKind::Database | DbErrorKind::Migration | DbErrorKind::InvalidData(_) => Self::StorageUnavailable,
        };
        err.raise(kind)
    }
}

/// Like [`ErrorKind::datastore`], reporting unique violations as a taken slug.
pub(crate) fn slug_taken(collection: Collection, slug: &str) -> impl FnOnce(DbError) -> Error {
    let slug = slug.to_string();
    move |err| {
        if matches!(&*err, DbErrorKind::Conflict(_)) {
            err.raise(ErrorKind::UniquenessViolation { collection, slug })
        } else {
            ErrorKind::datastore(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_kinds_carry_over() {
        let err = ErrorKind::catalog(CatalogError::from(CatalogErrorKind::validation("name is required")));
        assert_eq!(*err, ErrorKind::Validation("name is required".to_string()));
        let err = ErrorKind::catalog(CatalogError::from(CatalogErrorKind::StorageUnavailable));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_datastore_kinds() {
        let err = ErrorKind::datastore(DbError::from(DbErrorKind::Constraint("book author")));
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        let err = ErrorKind::datastore(DbError::from(DbErrorKind::NotFound { entity: "book", id: 3 }));
        assert_eq!(*err, ErrorKind::not_found("book", 3));
        assert_eq!((*err).to_string(), "book #3 not found");
    }

    #[test]
    fn test_slug_conflict() {
        let err = slug_taken(Collection::Books, "dune")(DbError::from(DbErrorKind::Conflict("book slug")));
        assert_eq!(*err, ErrorKind::UniquenessViolation { collection: Collection::Books, slug: "dune".to_string() });
        let err = slug_taken(Collection::Books, "dune")(DbError::from(DbErrorKind::Database));
        assert_eq!(*err, ErrorKind::StorageUnavailable);
    }
}

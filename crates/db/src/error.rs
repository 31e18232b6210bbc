//! Datastore Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. The underlying `sqlx` error is kept
//! as the child of every [`ErrorKind::Database`], [`ErrorKind::Conflict`] and
//! [`ErrorKind::Constraint`] error.

use derive_more::{Display, Error};

/// A datastore error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for datastore operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// A unique constraint (slug, cycle name, platform name, one rating per
    /// user and book) rejected the write.
    #[display("conflicting {_0}")]
    Conflict(#[error(not(source))] &'static str),
    /// A foreign key or check constraint rejected the write.
    #[display("constraint violated by {_0}")]
    Constraint(#[error(not(source))] &'static str),
    #[display("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },
    /// A stored value could not be converted to or from its model.
    #[display("invalid data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database)
    }
}

/// Classifies a failed write, keeping the `sqlx` error as the cause.
///
/// `what` names the record being written and ends up in the message.
pub(crate) fn write_error(what: &'static str) -> impl FnOnce(sqlx::Error) -> Error {
    move |err| {
        let kind = match err.as_database_error() {
            Some(db) if db.is_unique_violation() => ErrorKind::Conflict(what),
            Some(db) if db.is_foreign_key_violation() || db.is_check_violation() => ErrorKind::Constraint(what),
            _ => ErrorKind::Database,
        };
        exn::Exn::from(err).raise(kind)
    }
}

//! SQLite datastore for the audiobook catalog.
//!
//! This crate owns the schema (embedded `sqlx` migrations) and every query the
//! catalog runs. It is the source of truth for the catalog; uploaded media
//! lives in blob storage and is referenced by relative path.
//!
//! # Architecture
//! - [`Database`] manages the connection pool and applies migrations on
//!   connect.
//! - [`Repository`] reads and writes catalog entities and implements
//!   [`CatalogStore`](bookland_catalog::CatalogStore), the read-only view the
//!   slug, filename, counter and guard logic depend on.
//!
//! Unique-constraint failures surface as [`ErrorKind::Conflict`](error::ErrorKind::Conflict)
//! so the caller can tell "slug taken" apart from an unavailable database.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::repo::Repository;

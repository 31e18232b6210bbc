//! Repository over every catalog table.
//!
//! Saves are upserts keyed on the primary key: a model without an id is
//! inserted and gets its generated id written back, a model with one is
//! updated in place. Lookups return `Ok(None)` for missing rows; deletes
//! report whether a row was removed.

mod attachment;
mod book;
mod catalog;
mod social;
mod store;

use crate::Database;
use sqlx::SqlitePool;

/// Repository for all catalog entities.
///
/// Related rows cascade the way the catalog expects: subcategories go with
/// their category, attachments, links and ratings go with their book, and
/// deleting a cycle detaches its books instead of deleting them.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

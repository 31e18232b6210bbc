//! The catalog service.
//!
//! [`Catalog`] ties the catalog rules to the datastore and blob storage. It is
//! the only place that saves entities, so every save goes through the same
//! steps: validate, assign the slug, persist, then bring the derived state
//! (attachment counters, stored file names) back in line.
//!
//! Uploads and deletes touching one book's attachments are serialized per book
//! so that sequence numbers in file names and the counters stay consistent;
//! different books proceed in parallel.

mod attachments;
mod entities;
pub mod error;
mod locks;
mod regenerate;
mod social;
#[cfg(test)]
mod testing;

pub use crate::attachments::Upload;
pub use crate::regenerate::RenameEvent;
use crate::error::{ErrorKind, Result};
use crate::locks::BookLocks;
use bookland_catalog::models::{Book, BookId, BookIdentity, Counters, WorkType};
use bookland_catalog::recompute_counters;
use bookland_config::Config;
use bookland_db::{Database, Repository};
use bookland_storage::BackendHandle;
use bookland_storage::backend::LocalBackend;
use exn::{OptionExt, ResultExt};
use std::sync::Arc;
use tracing::instrument;

/// Tunables of the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Extra book slug probes allowed beyond the number of books.
    pub probe_headroom: u64,
}
impl Default for Settings {
    fn default() -> Self {
        Self { probe_headroom: bookland_catalog::slug::DEFAULT_PROBE_HEADROOM }
    }
}
impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self { probe_headroom: config.slugs.probe_headroom }
    }
}

/// Catalog operations over a datastore and a media backend.
pub struct Catalog {
    repo: Repository,
    media: BackendHandle,
    settings: Settings,
    locks: BookLocks,
}

impl Catalog {
    pub fn new(repo: Repository, media: BackendHandle, settings: Settings) -> Self {
        Self { repo, media, settings, locks: BookLocks::default() }
    }

    /// Connect to the database and media root named in `config`.
    #[instrument(skip_all, fields(database = %config.database.display()))]
    pub async fn open(config: &Config) -> Result<Self> {
        let db = Database::connect(&config.database).await.map_err(ErrorKind::datastore)?;
        let media = LocalBackend::new("media", &config.media.root, &config.media.base_url)
            .or_raise(|| ErrorKind::Media)?;
        tracing::info!(media = %config.media.root.display(), "Opened catalog");
        Ok(Self::new(Repository::from(&db), Arc::new(media), Settings::from(config)))
    }

    /// Direct access to the datastore, for reads.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn media(&self) -> &BackendHandle {
        &self.media
    }

    async fn load_book(&self, id: BookId) -> Result<Book> {
        self.repo
            .get_book(id)
            .await
            .map_err(ErrorKind::datastore)?
            .ok_or_raise(|| ErrorKind::not_found("book", id.0))
    }

    /// Everything attachment names are built from, with relations resolved.
    async fn identity(&self, book: &Book) -> Result<BookIdentity> {
        let id = book.id.ok_or_raise(|| ErrorKind::Validation("book must be saved first".to_string()))?;
        let cycle = match (book.work_type, book.cycle) {
            (WorkType::Cycle, Some(cycle)) => self.repo.get_cycle(cycle).await.map_err(ErrorKind::datastore)?,
            _ => None,
        };
        let authors = self.repo.authors_of(id).await.map_err(ErrorKind::datastore)?;
        BookIdentity::resolve(book, cycle.as_ref(), &authors).map_err(ErrorKind::catalog)
    }

    /// Recount the book's attachments and persist the totals.
    ///
    /// Callers hold the book's lock.
    async fn refresh_counters(&self, book: BookId) -> Result<Counters> {
        let counters = recompute_counters(&self.repo, book).await.map_err(ErrorKind::catalog)?;
        self.repo.update_counters(book, &counters).await.map_err(ErrorKind::datastore)?;
        tracing::debug!(%book, total = counters.total(), "Updated counters");
        Ok(counters)
    }
}

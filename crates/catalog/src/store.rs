//! The read-only view of the datastore the catalog logic depends on.

use crate::error::Result;
use crate::models::{AttachmentKind, BookId, CategoryId, SubcategoryId};
use crate::slug::Collection;
use async_trait::async_trait;

/// A subcategory of a category together with the number of books filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryDependents {
    pub id: SubcategoryId,
    pub name: String,
    pub books: u64,
}

/// Queries the catalog logic issues against the datastore.
///
/// Implementations are expected to report every failure as
/// [`StorageUnavailable`](crate::error::ErrorKind::StorageUnavailable); the
/// callers in this crate re-raise with that kind regardless.
///
/// Results must reflect writes that have already completed: counters read
/// through [`count`](Self::count) are only correct if the attachment insert or
/// delete that triggered them has been applied.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Whether `candidate` is already used as a slug within `collection`.
    async fn exists_slug(&self, collection: Collection, candidate: &str) -> Result<bool>;

    /// Number of entities in `collection`.
    async fn collection_size(&self, collection: Collection) -> Result<u64>;

    /// Number of attachments of `kind` owned by `book`.
    async fn count(&self, book: BookId, kind: AttachmentKind) -> Result<u64>;

    /// Every subcategory of `category`, in creation order, with its book count.
    async fn subcategories_of(&self, category: CategoryId) -> Result<Vec<SubcategoryDependents>>;

    /// Number of books filed under `subcategory`.
    async fn books_in_subcategory(&self, subcategory: SubcategoryId) -> Result<u64>;
}

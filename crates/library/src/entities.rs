//! Saving and deleting the catalog's named entities.

use crate::Catalog;
use crate::error::{ErrorKind, Result, slug_taken};
use bookland_catalog::models::{
    Author, AuthorId, Book, BookId, Category, CategoryId, Cycle, CycleId, Reader, ReaderId, Subcategory, SubcategoryId,
};
use bookland_catalog::{Collection, DeleteTarget, allocate_slug, allocate_slug_with, guard_delete};
use tracing::instrument;

impl Catalog {
    /// Validate, re-derive the slug from the name and save.
    #[instrument(skip_all, fields(name = %category.name))]
    pub async fn save_category(&self, category: &mut Category) -> Result<CategoryId> {
        category.validate().map_err(ErrorKind::catalog)?;
        allocate_slug(&self.repo, category).await.map_err(ErrorKind::catalog)?;
        self.repo
            .save_category(category)
            .await
            .map_err(slug_taken(Collection::Categories, &category.slug))
    }

    /// Delete a category that has no subcategories left.
    ///
    /// Returns `false` when there was no such category.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let Some(category) = self.repo.get_category(id).await.map_err(ErrorKind::datastore)? else {
            return Ok(false);
        };
        guard_delete(&self.repo, DeleteTarget::Category(&category)).await.map_err(ErrorKind::catalog)?;
        self.repo.delete_category(id).await.map_err(ErrorKind::datastore)
    }

    #[instrument(skip_all, fields(name = %subcategory.name))]
    pub async fn save_subcategory(&self, subcategory: &mut Subcategory) -> Result<SubcategoryId> {
        subcategory.validate().map_err(ErrorKind::catalog)?;
        allocate_slug(&self.repo, subcategory).await.map_err(ErrorKind::catalog)?;
        self.repo
            .save_subcategory(subcategory)
            .await
            .map_err(slug_taken(Collection::Subcategories, &subcategory.slug))
    }

    /// Delete a subcategory no book is filed under.
    #[instrument(skip(self))]
    pub async fn delete_subcategory(&self, id: SubcategoryId) -> Result<bool> {
        let Some(subcategory) = self.repo.get_subcategory(id).await.map_err(ErrorKind::datastore)? else {
            return Ok(false);
        };
        guard_delete(&self.repo, DeleteTarget::Subcategory(&subcategory)).await.map_err(ErrorKind::catalog)?;
        self.repo.delete_subcategory(id).await.map_err(ErrorKind::datastore)
    }

    #[instrument(skip_all, fields(surname = %author.person.surname_nick))]
    pub async fn save_author(&self, author: &mut Author) -> Result<AuthorId> {
        author.validate().map_err(ErrorKind::catalog)?;
        allocate_slug(&self.repo, author).await.map_err(ErrorKind::catalog)?;
        self.repo.save_author(author).await.map_err(slug_taken(Collection::Authors, &author.slug))
    }

    #[instrument(skip_all, fields(surname = %reader.person.surname_nick))]
    pub async fn save_reader(&self, reader: &mut Reader) -> Result<ReaderId> {
        reader.validate().map_err(ErrorKind::catalog)?;
        allocate_slug(&self.repo, reader).await.map_err(ErrorKind::catalog)?;
        self.repo.save_reader(reader).await.map_err(slug_taken(Collection::Readers, &reader.slug))
    }

    /// Save a cycle. A slug set by the caller is kept.
    ///
    /// Cycle names are unique as well; a taken name is reported the same way
    /// as a taken slug.
    #[instrument(skip_all, fields(name = %cycle.name))]
    pub async fn save_cycle(&self, cycle: &mut Cycle) -> Result<CycleId> {
        cycle.validate().map_err(ErrorKind::catalog)?;
        allocate_slug(&self.repo, cycle).await.map_err(ErrorKind::catalog)?;
        self.repo.save_cycle(cycle).await.map_err(slug_taken(Collection::Cycles, &cycle.slug))
    }

    /// Delete a cycle. Its books stay, detached from the series.
    #[instrument(skip(self))]
    pub async fn delete_cycle(&self, id: CycleId) -> Result<bool> {
        self.repo.delete_cycle(id).await.map_err(ErrorKind::datastore)
    }

    /// Save a book and its relations.
    ///
    /// The slug is assigned once, on the first save, probing numeric suffixes
    /// until a free one is found; later saves keep it even when the title
    /// changes. Series fields are cleared unless the book is part of a cycle.
    /// Counters are recomputed from the stored attachments afterwards.
    #[instrument(skip_all, fields(title = %book.title))]
    pub async fn save_book(&self, book: &mut Book) -> Result<BookId> {
        book.normalize_series();
        book.validate().map_err(ErrorKind::catalog)?;
        allocate_slug_with(&self.repo, book, self.settings.probe_headroom).await.map_err(ErrorKind::catalog)?;
        let id = self.repo.save_book(book).await.map_err(slug_taken(Collection::Books, &book.slug))?;

        let _guard = self.locks.lock(id).await;
        book.counters = self.refresh_counters(id).await?;
        tracing::info!(%id, slug = %book.slug, "Saved book");
        Ok(id)
    }

    /// Delete a book with all its attachments, links and ratings.
    ///
    /// Stored files are removed after the rows; a file that can't be removed
    /// is logged and left behind.
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: BookId) -> Result<bool> {
        let guard = self.locks.lock(id).await;
        let attachments = self.repo.list_all_attachments(id).await.map_err(ErrorKind::datastore)?;
        if !self.repo.delete_book(id).await.map_err(ErrorKind::datastore)? {
            return Ok(false);
        }
        for attachment in &attachments {
            self.remove_blob(attachment.file()).await;
        }
        drop(guard);
        self.locks.forget(id).await;
        tracing::info!(%id, files = attachments.len(), "Deleted book");
        Ok(true)
    }
}

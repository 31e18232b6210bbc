//! The catalog's read-only view of the datastore.

use super::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{DependentsRow, unsigned};
use async_trait::async_trait;
use bookland_catalog::error::{ErrorKind as CatalogErrorKind, Result as CatalogResult};
use bookland_catalog::models::{AttachmentKind, BookId, CategoryId, SubcategoryId};
use bookland_catalog::{CatalogStore, Collection, SubcategoryDependents};
use exn::ResultExt;

impl Repository {
    async fn exists_slug_inner(&self, collection: Collection, candidate: &str) -> Result<bool> {
        sqlx::query_scalar(include_str!("../../queries/exists_slug.sql"))
            .bind(collection.to_string())
            .bind(candidate)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    async fn collection_size_inner(&self, collection: Collection) -> Result<u64> {
        let size: i64 = sqlx::query_scalar(include_str!("../../queries/collection_size.sql"))
            .bind(collection.to_string())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        unsigned(size, "collection size")
    }

    async fn subcategories_of_inner(&self, category: CategoryId) -> Result<Vec<SubcategoryDependents>> {
        let rows: Vec<DependentsRow> = sqlx::query_as(include_str!("../../queries/subcategories_of.sql"))
            .bind(category.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(SubcategoryDependents::try_from).collect()
    }

    async fn books_in_subcategory_inner(&self, subcategory: SubcategoryId) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../../queries/books_in_subcategory.sql"))
            .bind(subcategory.0)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        unsigned(count, "book count")
    }
}

/// Every datastore failure reaches the catalog as
/// [`StorageUnavailable`](CatalogErrorKind::StorageUnavailable), with the
/// datastore error kept as its cause.
#[async_trait]
impl CatalogStore for Repository {
    async fn exists_slug(&self, collection: Collection, candidate: &str) -> CatalogResult<bool> {
        self.exists_slug_inner(collection, candidate).await.or_raise(|| CatalogErrorKind::StorageUnavailable)
    }

    async fn collection_size(&self, collection: Collection) -> CatalogResult<u64> {
        self.collection_size_inner(collection).await.or_raise(|| CatalogErrorKind::StorageUnavailable)
    }

    async fn count(&self, book: BookId, kind: AttachmentKind) -> CatalogResult<u64> {
        self.count_attachments(book, kind).await.or_raise(|| CatalogErrorKind::StorageUnavailable)
    }

    async fn subcategories_of(&self, category: CategoryId) -> CatalogResult<Vec<SubcategoryDependents>> {
        self.subcategories_of_inner(category).await.or_raise(|| CatalogErrorKind::StorageUnavailable)
    }

    async fn books_in_subcategory(&self, subcategory: SubcategoryId) -> CatalogResult<u64> {
        self.books_in_subcategory_inner(subcategory).await.or_raise(|| CatalogErrorKind::StorageUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::fixtures::{book, id, repo};
    use bookland_catalog::models::{Attachment, BookImage, Category, Subcategory};
    use bookland_catalog::{Verdict, allocate_slug, can_delete, recompute_counters};

    #[tokio::test]
    async fn test_slug_lookups_span_collections() {
        let repo = repo().await;
        book(&repo).await;
        assert!(repo.exists_slug(Collection::Books, "dyuna").await.unwrap());
        assert!(!repo.exists_slug(Collection::Authors, "dyuna").await.unwrap());
        assert!(repo.exists_slug(Collection::Readers, "koziy_nikolay").await.unwrap());
        assert_eq!(repo.collection_size(Collection::Books).await.unwrap(), 1);
        assert_eq!(repo.collection_size(Collection::Cycles).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_book_slug_probing_against_sqlite() {
        let repo = repo().await;
        book(&repo).await;
        let mut second = bookland_catalog::models::Book::new("Дюна");
        assert_eq!(allocate_slug(&repo, &mut second).await.unwrap(), "dyuna-1");
    }

    #[tokio::test]
    async fn test_guard_sees_books_in_subcategories() {
        let repo = repo().await;
        let book = book(&repo).await;
        let subcategory = repo.get_subcategory(book.subcategories[0]).await.unwrap().unwrap();
        let category = repo.get_category(subcategory.category).await.unwrap().unwrap();

        let dependents = repo.subcategories_of(subcategory.category).await.unwrap();
        let expected = SubcategoryDependents { id: subcategory.id.unwrap(), name: "Космос".to_string(), books: 1 };
        assert_eq!(dependents, [expected]);
        let verdict = can_delete(&repo, bookland_catalog::DeleteTarget::Category(&category)).await.unwrap();
        assert!(matches!(verdict, Verdict::Blocked(_)));

        let mut empty = Subcategory::new(subcategory.category, "Пустая");
        empty.slug = "pustaya".to_string();
        repo.save_subcategory(&mut empty).await.unwrap();
        assert_eq!(repo.books_in_subcategory(empty.id.unwrap()).await.unwrap(), 0);
        let verdict = can_delete(&repo, bookland_catalog::DeleteTarget::Subcategory(&empty)).await.unwrap();
        assert_eq!(verdict, Verdict::Allowed);

        let mut lonely = Category::new("Поэзия");
        lonely.slug = "poeziya".to_string();
        repo.save_category(&mut lonely).await.unwrap();
        let verdict = can_delete(&repo, bookland_catalog::DeleteTarget::Category(&lonely)).await.unwrap();
        assert_eq!(verdict, Verdict::Allowed);
    }

    #[tokio::test]
    async fn test_counters_follow_attachments() {
        let repo = repo().await;
        let book = id(&book(&repo).await);
        let mut image = Attachment::Image(BookImage { id: None, book, file: "uploads/book_images/a.png".to_string() });
        repo.save_attachment(&mut image).await.unwrap();
        let counters = recompute_counters(&repo, book).await.unwrap();
        assert_eq!(counters.image, 1);
        assert_eq!(counters.total(), 1);
    }
}

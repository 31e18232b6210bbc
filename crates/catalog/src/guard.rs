//! Referential checks run before deleting categories and subcategories.
//!
//! Nothing cascades silently: a category goes only once it has no
//! subcategories left, and a subcategory only once no book is filed under it.

use crate::error::{ErrorKind, Result};
use crate::models::{Category, Subcategory};
use crate::store::CatalogStore;
use derive_more::Display;
use exn::ResultExt;
use tracing::{debug, instrument};

/// Something the guard can be asked about.
#[derive(Debug, Clone, Copy)]
pub enum DeleteTarget<'a> {
    Category(&'a Category),
    Subcategory(&'a Subcategory),
}

/// Why a delete was refused.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// Transitive: one of the category's subcategories still has books.
    #[display("category '{category}' cannot be deleted: its subcategory '{subcategory}' still has books")]
    SubcategoryHasBooks { category: String, subcategory: String },
    /// Direct: the category still has (empty) subcategories.
    #[display("category '{category}' cannot be deleted: remove its subcategories first")]
    CategoryHasSubcategories { category: String },
    #[display("subcategory '{subcategory}' cannot be deleted: books are still filed under it")]
    SubcategoryReferenced { subcategory: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Blocked(BlockReason),
}

/// Decides whether `target` may be deleted right now.
///
/// Unsaved entities have nothing depending on them and are always allowed.
#[instrument(skip_all)]
pub async fn can_delete<S>(store: &S, target: DeleteTarget<'_>) -> Result<Verdict>
where
    S: CatalogStore + ?Sized,
{
    let verdict = match target {
        DeleteTarget::Category(category) => {
            let Some(id) = category.id else { return Ok(Verdict::Allowed) };
            let children = store.subcategories_of(id).await.or_raise(|| ErrorKind::StorageUnavailable)?;
            if children.is_empty() {
                Verdict::Allowed
            } else if let Some(child) = children.iter().find(|child| child.books > 0) {
                Verdict::Blocked(BlockReason::SubcategoryHasBooks {
                    category: category.name.clone(),
                    subcategory: child.name.clone(),
                })
            } else {
                Verdict::Blocked(BlockReason::CategoryHasSubcategories { category: category.name.clone() })
            }
        },
        DeleteTarget::Subcategory(subcategory) => {
            let Some(id) = subcategory.id else { return Ok(Verdict::Allowed) };
            match store.books_in_subcategory(id).await.or_raise(|| ErrorKind::StorageUnavailable)? {
                0 => Verdict::Allowed,
                _ => Verdict::Blocked(BlockReason::SubcategoryReferenced { subcategory: subcategory.name.clone() }),
            }
        },
    };
    debug!(?verdict, "checked delete");
    Ok(verdict)
}

/// [`can_delete`], raising [`ErrorKind::Blocked`] when the delete must not proceed.
pub async fn guard_delete<S>(store: &S, target: DeleteTarget<'_>) -> Result<()>
where
    S: CatalogStore + ?Sized,
{
    match can_delete(store, target).await? {
        Verdict::Allowed => Ok(()),
        Verdict::Blocked(reason) => exn::bail!(ErrorKind::Blocked(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, SubcategoryId};
    use crate::testing::MemoryStore;

    fn detective() -> Category {
        let mut category = Category::new("Детектив");
        category.id = Some(CategoryId(1));
        category
    }

    fn noir() -> Subcategory {
        let mut subcategory = Subcategory::new(CategoryId(1), "Нуар");
        subcategory.id = Some(SubcategoryId(10));
        subcategory
    }

    #[tokio::test]
    async fn test_empty_category_is_allowed() {
        let store = MemoryStore::default();
        let verdict = can_delete(&store, DeleteTarget::Category(&detective())).await.unwrap();
        assert_eq!(verdict, Verdict::Allowed);
    }

    #[tokio::test]
    async fn test_category_with_childless_subcategory_is_blocked_directly() {
        let store = MemoryStore::default().with_subcategory(CategoryId(1), SubcategoryId(10), "Нуар", 0);
        let verdict = can_delete(&store, DeleteTarget::Category(&detective())).await.unwrap();
        assert_eq!(
            verdict,
            Verdict::Blocked(BlockReason::CategoryHasSubcategories { category: "Детектив".to_string() })
        );
    }

    #[tokio::test]
    async fn test_category_names_subcategory_with_books() {
        let store = MemoryStore::default()
            .with_subcategory(CategoryId(1), SubcategoryId(10), "Нуар", 0)
            .with_subcategory(CategoryId(1), SubcategoryId(11), "Шпионский", 3);
        let verdict = can_delete(&store, DeleteTarget::Category(&detective())).await.unwrap();
        assert_eq!(
            verdict,
            Verdict::Blocked(BlockReason::SubcategoryHasBooks {
                category: "Детектив".to_string(),
                subcategory: "Шпионский".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_subcategory_with_books_is_blocked() {
        let store = MemoryStore::default().with_subcategory(CategoryId(1), SubcategoryId(10), "Нуар", 1);
        let err = guard_delete(&store, DeleteTarget::Subcategory(&noir())).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Blocked(BlockReason::SubcategoryReferenced { subcategory: "Нуар".to_string() }));
        assert!((*err).to_string().contains("Нуар"));
    }

    #[tokio::test]
    async fn test_unreferenced_subcategory_is_allowed() {
        let store = MemoryStore::default().with_subcategory(CategoryId(1), SubcategoryId(10), "Нуар", 0);
        guard_delete(&store, DeleteTarget::Subcategory(&noir())).await.unwrap();
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_a_verdict() {
        let store = MemoryStore::default().failing();
        let err = can_delete(&store, DeleteTarget::Category(&detective())).await.unwrap_err();
        assert_eq!(*err, ErrorKind::StorageUnavailable);
    }
}

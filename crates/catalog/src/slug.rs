//! Slug allocation for name-bearing entities.
//!
//! Each entity kind picks one [`SlugPolicy`]:
//!
//! | Entity                         | Policy                            | Source                      |
//! |--------------------------------|-----------------------------------|-----------------------------|
//! | category, subcategory          | [`RecomputeAlways`]               | name                        |
//! | author, reader                 | [`RecomputeAlways`]               | `surname_nick + " " + name` |
//! | cycle                          | [`FillIfEmpty`]                   | name                        |
//! | book                           | [`ProbeOnce`]                     | title                       |
//!
//! Recomputed slugs are never probed for collisions: the datastore owns the
//! unique constraint and reports a violation on save. Books are the only
//! entity that searches for a free slug (`base`, `base-1`, `base-2`, ...).
//!
//! [`RecomputeAlways`]: SlugPolicy::RecomputeAlways
//! [`FillIfEmpty`]: SlugPolicy::FillIfEmpty
//! [`ProbeOnce`]: SlugPolicy::ProbeOnce

use crate::error::{ErrorKind, Result};
use crate::store::CatalogStore;
use crate::translit::{JOINER, SEPARATOR, hyphenate, is_slug_safe, transliterate};
use derive_more::Display;
use exn::ResultExt;
use rslug::slugify;
use tracing::instrument;

/// Extra probes allowed beyond the size of the collection before giving up.
pub const DEFAULT_PROBE_HEADROOM: u64 = 16;

/// The collection a slug must be unique within.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    #[display("categories")]
    Categories,
    #[display("subcategories")]
    Subcategories,
    #[display("authors")]
    Authors,
    #[display("readers")]
    Readers,
    #[display("cycles")]
    Cycles,
    #[display("books")]
    Books,
}

/// When (and how) an entity's slug gets computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugPolicy {
    /// Overwrite the slug from the current name on every save.
    RecomputeAlways,
    /// Compute from the name only while the slug is empty.
    FillIfEmpty,
    /// Compute once while empty, probing numeric suffixes until a free slug is found.
    ProbeOnce,
}

/// An entity carrying a slug derived from its display name.
pub trait Sluggable {
    const COLLECTION: Collection;
    const POLICY: SlugPolicy;
    /// Maximum slug length accepted by the datastore.
    const MAX_LEN: usize;

    /// Current slug; empty when none has been assigned yet.
    fn slug(&self) -> &str;

    fn set_slug(&mut self, slug: String);

    /// Text the slug is derived from. Fails with [`ErrorKind::Validation`]
    /// when the entity has no usable name.
    fn slug_source(&self) -> Result<String>;
}

/// Assigns a slug to `entity` according to its [`SlugPolicy`] and returns it.
///
/// Equivalent to [`allocate_slug_with`] using [`DEFAULT_PROBE_HEADROOM`].
pub async fn allocate_slug<E, S>(store: &S, entity: &mut E) -> Result<String>
where
    E: Sluggable + Send,
    S: CatalogStore + ?Sized,
{
    allocate_slug_with(store, entity, DEFAULT_PROBE_HEADROOM).await
}

/// Assigns a slug to `entity` according to its [`SlugPolicy`] and returns it.
///
/// Probing (books only) gives up after `collection size + headroom` attempts
/// with [`ErrorKind::UniquenessViolation`].
#[instrument(skip_all, fields(collection = %E::COLLECTION))]
pub async fn allocate_slug_with<E, S>(store: &S, entity: &mut E, headroom: u64) -> Result<String>
where
    E: Sluggable + Send,
    S: CatalogStore + ?Sized,
{
    let slug = match E::POLICY {
        SlugPolicy::RecomputeAlways => derive(&entity.slug_source()?, E::MAX_LEN)?,
        SlugPolicy::FillIfEmpty | SlugPolicy::ProbeOnce if !entity.slug().is_empty() => {
            return Ok(entity.slug().to_string());
        },
        SlugPolicy::FillIfEmpty => derive(&entity.slug_source()?, E::MAX_LEN)?,
        SlugPolicy::ProbeOnce => {
            let base = hyphenate(&derive(&entity.slug_source()?, E::MAX_LEN)?);
            probe(store, E::COLLECTION, &base, E::MAX_LEN, headroom).await?
        },
    };
    tracing::debug!(slug = %slug, "Allocated slug");
    entity.set_slug(slug.clone());
    Ok(slug)
}

/// Derives a validated slug from free text.
///
/// Characters the transliteration tables don't cover are folded to ASCII per
/// word, keeping the `_` word boundaries intact.
pub fn derive(source: &str, max_len: usize) -> Result<String> {
    let mut slug = transliterate(source);
    if !is_slug_safe(&slug) {
        slug = slug.split(SEPARATOR).map(|word| slugify!(word)).filter(|w| !w.is_empty()).collect::<Vec<_>>().join("_");
    }
    let slug = truncate(&slug, max_len);
    if slug.is_empty() {
        exn::bail!(ErrorKind::validation(format!("cannot derive a slug from {source:?}")));
    }
    Ok(slug)
}

/// Cuts a slug down to `max_len` bytes without leaving a dangling separator.
fn truncate(slug: &str, max_len: usize) -> String {
    // Slugs are ASCII by the time they get here; the boundary check is for safety only.
    let end = slug.floor_char_boundary(max_len.min(slug.len()));
    slug[..end].trim_matches([SEPARATOR, JOINER]).to_string()
}

/// Finds the first of `base`, `base-1`, `base-2`, ... not present in `collection`.
async fn probe<S>(store: &S, collection: Collection, base: &str, max_len: usize, headroom: u64) -> Result<String>
where
    S: CatalogStore + ?Sized,
{
    let size = store.collection_size(collection).await.or_raise(|| ErrorKind::StorageUnavailable)?;
    let attempts = size.saturating_add(headroom).max(1);
    for n in 0..attempts {
        let candidate = match n {
            0 => base.to_string(),
            n => {
                let suffix = format!("-{n}");
                format!("{}{suffix}", truncate(base, max_len.saturating_sub(suffix.len())))
            },
        };
        if !store.exists_slug(collection, &candidate).await.or_raise(|| ErrorKind::StorageUnavailable)? {
            return Ok(candidate);
        }
        tracing::trace!(candidate = %candidate, "Slug taken; probing next suffix");
    }
    exn::bail!(ErrorKind::UniquenessViolation { collection, slug: base.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Book, Category, CategoryId, Cycle, Reader, Subcategory};
    use crate::testing::MemoryStore;
    use rstest::rstest;

    #[tokio::test]
    async fn test_category_recomputes_on_every_save() {
        let store = MemoryStore::default();
        let mut category = Category::new("Фантастика");
        category.slug = "custom-slug".to_string();
        assert_eq!(allocate_slug(&store, &mut category).await.unwrap(), "fantastika");
        category.name = "Научная фантастика".to_string();
        allocate_slug(&store, &mut category).await.unwrap();
        assert_eq!(category.slug, "nauchnaya_fantastika");
    }

    #[tokio::test]
    async fn test_recompute_does_not_probe() {
        let store = MemoryStore::default().with_slugs(Collection::Subcategories, ["detektiv"]);
        let mut subcategory = Subcategory::new(CategoryId(1), "Детектив");
        // Uniqueness is left to the datastore's constraint.
        assert_eq!(allocate_slug(&store, &mut subcategory).await.unwrap(), "detektiv");
    }

    #[rstest]
    #[case("Пушкин", "Александр", "pushkin_aleksandr")]
    #[case("Пушкин", "", "pushkin")]
    #[case("", "Гомер", "gomer")]
    #[case("  Стругацкий ", " ", "strugatskiy")]
    #[tokio::test]
    async fn test_person_slug(#[case] surname: &str, #[case] name: &str, #[case] expected: &str) {
        let store = MemoryStore::default();
        let mut author = Author::new(surname, name);
        assert_eq!(allocate_slug(&store, &mut author).await.unwrap(), expected);
        let mut reader = Reader::new(surname, name);
        assert_eq!(allocate_slug(&store, &mut reader).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_person_requires_a_name() {
        let store = MemoryStore::default();
        let mut author = Author::new("", "  ");
        let err = allocate_slug(&store, &mut author).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        assert!(author.slug.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_fills_only_when_empty() {
        let store = MemoryStore::default();
        let mut cycle = Cycle::new("Дюна");
        assert_eq!(allocate_slug(&store, &mut cycle).await.unwrap(), "dyuna");
        cycle.name = "Хроники Дюны".to_string();
        assert_eq!(allocate_slug(&store, &mut cycle).await.unwrap(), "dyuna");
    }

    #[tokio::test]
    async fn test_book_probes_for_free_slug() {
        let store = MemoryStore::default().with_slugs(Collection::Books, ["moby-dick", "moby-dick-1"]);
        let mut book = Book::new("Moby Dick");
        assert_eq!(allocate_slug(&store, &mut book).await.unwrap(), "moby-dick-2");
    }

    #[tokio::test]
    async fn test_book_slug_is_computed_once() {
        let store = MemoryStore::default();
        let mut book = Book::new("Пикник на обочине");
        assert_eq!(allocate_slug(&store, &mut book).await.unwrap(), "piknik-na-obochine");
        book.title = "Something else".to_string();
        assert_eq!(allocate_slug(&store, &mut book).await.unwrap(), "piknik-na-obochine");
    }

    #[tokio::test]
    async fn test_book_probing_is_bounded() {
        let store = MemoryStore::default().with_slugs(Collection::Books, ["dune", "dune-1", "dune-2"]);
        let mut book = Book::new("Dune");
        // Three existing books, no headroom: "dune", "dune-1", "dune-2" are the only candidates.
        let err = allocate_slug_with(&store, &mut book, 0).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::UniquenessViolation { collection: Collection::Books, .. }));
        assert_eq!(allocate_slug_with(&store, &mut book, 1).await.unwrap(), "dune-3");
    }

    #[tokio::test]
    async fn test_probe_failure_surfaces_as_storage_unavailable() {
        let store = MemoryStore::default().failing();
        let mut book = Book::new("Dune");
        let err = allocate_slug(&store, &mut book).await.unwrap_err();
        assert_eq!(*err, ErrorKind::StorageUnavailable);
    }

    #[rstest]
    #[case("Ñandú", 60, "nandu")]
    #[case("Señor Ñandú", 60, "senor_nandu")]
    #[case("Война и мир", 5, "voyna")]
    #[case("Война и мир", 6, "voyna")]
    fn test_derive(#[case] source: &str, #[case] max_len: usize, #[case] expected: &str) {
        assert_eq!(derive(source, max_len).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("!!!")]
    #[case("— « » —")]
    fn test_derive_rejects_empty(#[case] source: &str) {
        let err = derive(source, 60).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
    }
}

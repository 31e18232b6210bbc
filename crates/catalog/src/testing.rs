//! In-memory [`CatalogStore`] for unit tests.

use crate::error::{ErrorKind, Result};
use crate::models::{AttachmentKind, BookId, CategoryId, SubcategoryId};
use crate::slug::Collection;
use crate::store::{CatalogStore, SubcategoryDependents};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct MemoryStore {
    slugs: HashMap<Collection, HashSet<String>>,
    counts: Mutex<HashMap<(BookId, AttachmentKind), u64>>,
    subcategories: Vec<(CategoryId, SubcategoryDependents)>,
    failing: bool,
}

impl MemoryStore {
    pub fn with_slugs<const N: usize>(mut self, collection: Collection, slugs: [&str; N]) -> Self {
        self.slugs.entry(collection).or_default().extend(slugs.map(String::from));
        self
    }

    pub fn with_count(self, book: BookId, kind: AttachmentKind, count: u64) -> Self {
        self.counts.lock().unwrap().insert((book, kind), count);
        self
    }

    pub fn with_subcategory(mut self, category: CategoryId, id: SubcategoryId, name: &str, books: u64) -> Self {
        self.subcategories.push((category, SubcategoryDependents { id, name: name.to_string(), books }));
        self
    }

    /// Every query fails.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn attach(&self, book: BookId, kind: AttachmentKind) {
        *self.counts.lock().unwrap().entry((book, kind)).or_default() += 1;
    }

    pub fn detach(&self, book: BookId, kind: AttachmentKind) {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry((book, kind)).or_default();
        *count = count.saturating_sub(1);
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            exn::bail!(ErrorKind::StorageUnavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn exists_slug(&self, collection: Collection, candidate: &str) -> Result<bool> {
        self.check()?;
        Ok(self.slugs.get(&collection).is_some_and(|slugs| slugs.contains(candidate)))
    }

    async fn collection_size(&self, collection: Collection) -> Result<u64> {
        self.check()?;
        Ok(self.slugs.get(&collection).map_or(0, |slugs| slugs.len() as u64))
    }

    async fn count(&self, book: BookId, kind: AttachmentKind) -> Result<u64> {
        self.check()?;
        Ok(self.counts.lock().unwrap().get(&(book, kind)).copied().unwrap_or(0))
    }

    async fn subcategories_of(&self, category: CategoryId) -> Result<Vec<SubcategoryDependents>> {
        self.check()?;
        Ok(self.subcategories.iter().filter(|(parent, _)| *parent == category).map(|(_, s)| s.clone()).collect())
    }

    async fn books_in_subcategory(&self, subcategory: SubcategoryId) -> Result<u64> {
        self.check()?;
        Ok(self.subcategories.iter().find(|(_, s)| s.id == subcategory).map_or(0, |(_, s)| s.books))
    }
}

use super::{CycleId, check_len, check_present};
use crate::error::Result;
use crate::slug::{Collection, SlugPolicy, Sluggable};

/// A named series of books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub id: Option<CycleId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}
impl Cycle {
    pub const NAME_MAX_LEN: usize = 60;

    pub fn new(name: impl Into<String>) -> Self {
        Self { id: None, name: name.into(), slug: String::new(), description: None }
    }

    pub fn validate(&self) -> Result<()> {
        check_present("cycle name", &self.name)?;
        check_len("cycle name", &self.name, Self::NAME_MAX_LEN)
    }
}
impl Sluggable for Cycle {
    const COLLECTION: Collection = Collection::Cycles;
    const POLICY: SlugPolicy = SlugPolicy::FillIfEmpty;
    const MAX_LEN: usize = 60;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }

    fn slug_source(&self) -> Result<String> {
        Ok(self.name.clone())
    }
}

use super::{CategoryId, SubcategoryId, check_len, check_present};
use crate::error::Result;
use crate::slug::{Collection, SlugPolicy, Sluggable};

/// A top-level genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}
impl Category {
    pub const NAME_MAX_LEN: usize = 50;

    pub fn new(name: impl Into<String>) -> Self {
        Self { id: None, name: name.into(), slug: String::new(), description: None }
    }

    pub fn validate(&self) -> Result<()> {
        check_present("category name", &self.name)?;
        check_len("category name", &self.name, Self::NAME_MAX_LEN)
    }
}
impl Sluggable for Category {
    const COLLECTION: Collection = Collection::Categories;
    const POLICY: SlugPolicy = SlugPolicy::RecomputeAlways;
    const MAX_LEN: usize = 50;

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

/// A genre nested under exactly one [`Category`]; removed together with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub id: Option<SubcategoryId>,
    pub category: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}
impl Subcategory {
    pub const NAME_MAX_LEN: usize = 40;

    pub fn new(category: CategoryId, name: impl Into<String>) -> Self {
        Self { id: None, category, name: name.into(), slug: String::new(), description: None }
    }

    pub fn validate(&self) -> Result<()> {
        check_present("subcategory name", &self.name)?;
        check_len("subcategory name", &self.name, Self::NAME_MAX_LEN)
    }
}
impl Sluggable for Subcategory {
    const COLLECTION: Collection = Collection::Subcategories;
    const POLICY: SlugPolicy = SlugPolicy::RecomputeAlways;
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

use super::unsigned;
use crate::error::{Error, Result};
use bookland_catalog::SubcategoryDependents;
use bookland_catalog::models::{
    Author, AuthorId, Category, CategoryId, Cycle, CycleId, PersonName, Reader, ReaderId, Subcategory, SubcategoryId,
};

#[derive(sqlx::FromRow)]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}
impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self { id: Some(CategoryId(row.id)), name: row.name, slug: row.slug, description: row.description }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SubcategoryRow {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}
impl From<SubcategoryRow> for Subcategory {
    fn from(row: SubcategoryRow) -> Self {
        Self {
            id: Some(SubcategoryId(row.id)),
            category: CategoryId(row.category_id),
            name: row.name,
            slug: row.slug,
            description: row.description,
        }
    }
}

/// Authors and readers share a table layout.
#[derive(sqlx::FromRow)]
pub(crate) struct PersonRow {
    pub id: i64,
    pub surname_nick: String,
    pub name: String,
    pub patronymic: String,
    pub slug: String,
    pub description: Option<String>,
}
impl PersonRow {
    fn person(&self) -> PersonName {
        PersonName::new(&self.surname_nick, &self.name).with_patronymic(&self.patronymic)
    }
}
impl From<PersonRow> for Author {
    fn from(row: PersonRow) -> Self {
        Self { id: Some(AuthorId(row.id)), person: row.person(), slug: row.slug, description: row.description }
    }
}
impl From<PersonRow> for Reader {
    fn from(row: PersonRow) -> Self {
        Self { id: Some(ReaderId(row.id)), person: row.person(), slug: row.slug, description: row.description }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CycleRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}
impl From<CycleRow> for Cycle {
    fn from(row: CycleRow) -> Self {
        Self { id: Some(CycleId(row.id)), name: row.name, slug: row.slug, description: row.description }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct DependentsRow {
    pub id: i64,
    pub name: String,
    pub books: i64,
}
impl TryFrom<DependentsRow> for SubcategoryDependents {
    type Error = Error;
    fn try_from(row: DependentsRow) -> Result<Self> {
        Ok(Self { id: SubcategoryId(row.id), name: row.name, books: unsigned(row.books, "book count")? })
    }
}

use super::Repository;
use crate::error::{ErrorKind, Result, write_error};
use crate::models::{CategoryRow, CycleRow, PersonRow, SubcategoryRow};
use bookland_catalog::models::{
    Author, AuthorId, Category, CategoryId, Cycle, CycleId, Reader, ReaderId, Subcategory, SubcategoryId,
};
use exn::ResultExt;

impl Repository {
    // =========================================================================
    // Categories
    // =========================================================================

    /// Insert or update a category, writing the generated id back.
    ///
    /// Returns [`ErrorKind::Conflict`] when the slug is already taken.
    pub async fn save_category(&self, category: &mut Category) -> Result<CategoryId> {
        let id: i64 = sqlx::query_scalar(include_str!("../../queries/save_category.sql"))
            .bind(category.id.map(|id| id.0))
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error("category slug"))?;
        category.id = Some(CategoryId(id));
        Ok(CategoryId(id))
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(include_str!("../../queries/get_category.sql"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Category::from))
    }

    /// All categories, by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(include_str!("../../queries/list_categories.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Delete a category together with its subcategories.
    ///
    /// Does not check for dependents; see [`bookland_catalog::guard_delete`].
    pub async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let result = sqlx::query(include_str!("../../queries/delete_category.sql"))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(write_error("category"))?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Subcategories
    // =========================================================================

    /// Insert or update a subcategory, writing the generated id back.
    ///
    /// Returns [`ErrorKind::Conflict`] when the slug is already taken and
    /// [`ErrorKind::Constraint`] when the category doesn't exist.
    pub async fn save_subcategory(&self, subcategory: &mut Subcategory) -> Result<SubcategoryId> {
        let id: i64 = sqlx::query_scalar(include_str!("../../queries/save_subcategory.sql"))
            .bind(subcategory.id.map(|id| id.0))
            .bind(subcategory.category.0)
            .bind(&subcategory.name)
            .bind(&subcategory.slug)
            .bind(&subcategory.description)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error("subcategory slug"))?;
        subcategory.id = Some(SubcategoryId(id));
        Ok(SubcategoryId(id))
    }

    pub async fn get_subcategory(&self, id: SubcategoryId) -> Result<Option<Subcategory>> {
        let row: Option<SubcategoryRow> = sqlx::query_as(include_str!("../../queries/get_subcategory.sql"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Subcategory::from))
    }

    /// Subcategories of `category`, by name.
    pub async fn list_subcategories(&self, category: CategoryId) -> Result<Vec<Subcategory>> {
        let rows: Vec<SubcategoryRow> = sqlx::query_as(include_str!("../../queries/list_subcategories.sql"))
            .bind(category.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Subcategory::from).collect())
    }

    pub async fn delete_subcategory(&self, id: SubcategoryId) -> Result<bool> {
        let result = sqlx::query(include_str!("../../queries/delete_subcategory.sql"))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(write_error("subcategory"))?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Authors and readers
    // =========================================================================

    /// Insert or update an author, writing the generated id back.
    pub async fn save_author(&self, author: &mut Author) -> Result<AuthorId> {
        let id: i64 = sqlx::query_scalar(include_str!("../../queries/save_author.sql"))
            .bind(author.id.map(|id| id.0))
            .bind(&author.person.surname_nick)
            .bind(&author.person.name)
            .bind(&author.person.patronymic)
            .bind(&author.slug)
            .bind(&author.description)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error("author slug"))?;
        author.id = Some(AuthorId(id));
        Ok(AuthorId(id))
    }

    pub async fn get_author(&self, id: AuthorId) -> Result<Option<Author>> {
        let row: Option<PersonRow> = sqlx::query_as(include_str!("../../queries/get_author.sql"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Author::from))
    }

    /// All authors, by surname (or nick) and name.
    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        let rows: Vec<PersonRow> = sqlx::query_as(include_str!("../../queries/list_authors.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    /// Delete an author; the books they wrote lose the credit.
    pub async fn delete_author(&self, id: AuthorId) -> Result<bool> {
        let result = sqlx::query(include_str!("../../queries/delete_author.sql"))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(write_error("author"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert or update a reader, writing the generated id back.
    pub async fn save_reader(&self, reader: &mut Reader) -> Result<ReaderId> {
        let id: i64 = sqlx::query_scalar(include_str!("../../queries/save_reader.sql"))
            .bind(reader.id.map(|id| id.0))
            .bind(&reader.person.surname_nick)
            .bind(&reader.person.name)
            .bind(&reader.person.patronymic)
            .bind(&reader.slug)
            .bind(&reader.description)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error("reader slug"))?;
        reader.id = Some(ReaderId(id));
        Ok(ReaderId(id))
    }

    pub async fn get_reader(&self, id: ReaderId) -> Result<Option<Reader>> {
        let row: Option<PersonRow> = sqlx::query_as(include_str!("../../queries/get_reader.sql"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Reader::from))
    }

    pub async fn list_readers(&self) -> Result<Vec<Reader>> {
        let rows: Vec<PersonRow> = sqlx::query_as(include_str!("../../queries/list_readers.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Reader::from).collect())
    }

    /// Delete a reader together with their torrent releases.
    pub async fn delete_reader(&self, id: ReaderId) -> Result<bool> {
        let result = sqlx::query(include_str!("../../queries/delete_reader.sql"))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(write_error("reader"))?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Cycles
    // =========================================================================

    /// Insert or update a cycle, writing the generated id back.
    ///
    /// Returns [`ErrorKind::Conflict`] when the name or slug is already taken.
    pub async fn save_cycle(&self, cycle: &mut Cycle) -> Result<CycleId> {
        let id: i64 = sqlx::query_scalar(include_str!("../../queries/save_cycle.sql"))
            .bind(cycle.id.map(|id| id.0))
            .bind(&cycle.name)
            .bind(&cycle.slug)
            .bind(&cycle.description)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error("cycle name or slug"))?;
        cycle.id = Some(CycleId(id));
        Ok(CycleId(id))
    }

    pub async fn get_cycle(&self, id: CycleId) -> Result<Option<Cycle>> {
        let row: Option<CycleRow> = sqlx::query_as(include_str!("../../queries/get_cycle.sql"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Cycle::from))
    }

    pub async fn list_cycles(&self) -> Result<Vec<Cycle>> {
        let rows: Vec<CycleRow> = sqlx::query_as(include_str!("../../queries/list_cycles.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Cycle::from).collect())
    }

    /// Delete a cycle. Its books stay, with the cycle link cleared.
    pub async fn delete_cycle(&self, id: CycleId) -> Result<bool> {
        let result = sqlx::query(include_str!("../../queries/delete_cycle.sql"))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(write_error("cycle"))?;
        Ok(result.rows_affected() > 0)
    }
}

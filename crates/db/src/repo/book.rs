use super::Repository;
use crate::error::{ErrorKind, Result, write_error};
use crate::models::{BookRow, PersonRow, signed, timestamp};
use bookland_catalog::models::{Author, Book, BookId, Counters, CycleId, Reader, SubcategoryId};
use exn::ResultExt;
use sqlx::{Sqlite, Transaction};
use tracing::instrument;

impl Repository {
    // =========================================================================
    // Insert/Update
    // =========================================================================

    /// Insert or update a book's own fields and its relations in one
    /// transaction, writing the generated id and timestamps back.
    ///
    /// Counters are left untouched; they only change through
    /// [`update_counters`](Self::update_counters). Authors and readers keep
    /// the order they have in the model.
    #[instrument(skip_all, fields(slug = %book.slug))]
    pub async fn save_book(&self, book: &mut Book) -> Result<BookId> {
        let row = BookRow::try_from(&*book)?;
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let (id, created_at): (i64, i64) = sqlx::query_as(include_str!("../../queries/save_book.sql"))
            .bind(row.id)
            .bind(&row.title)
            .bind(&row.slug)
            .bind(&row.work_type)
            .bind(row.cycle_id)
            .bind(&row.cycle_number)
            .bind(row.year)
            .bind(row.duration_secs)
            .bind(&row.description)
            .bind(row.is_published)
            .bind(row.created_at)
            .bind(row.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(write_error("book slug"))?;
        Self::replace_relations(&mut tx, id, book).await?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;

        book.id = Some(BookId(id));
        book.created_at = Some(timestamp(created_at, "creation date")?);
        book.updated_at = Some(timestamp(row.updated_at, "modification date")?);
        tracing::debug!(book = id, "Saved book");
        Ok(BookId(id))
    }

    async fn replace_relations(tx: &mut Transaction<'_, Sqlite>, id: i64, book: &Book) -> Result<()> {
        sqlx::query(include_str!("../../queries/clear_book_subcategories.sql"))
            .bind(id)
            .execute(&mut **tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        for subcategory in &book.subcategories {
            sqlx::query(include_str!("../../queries/add_book_subcategory.sql"))
                .bind(id)
                .bind(subcategory.0)
                .execute(&mut **tx)
                .await
                .map_err(write_error("book subcategory"))?;
        }
        sqlx::query(include_str!("../../queries/clear_book_authors.sql"))
            .bind(id)
            .execute(&mut **tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        for (position, author) in book.authors.iter().enumerate() {
            sqlx::query(include_str!("../../queries/add_book_author.sql"))
                .bind(id)
                .bind(author.0)
                .bind(signed(position as u64, "author position")?)
                .execute(&mut **tx)
                .await
                .map_err(write_error("book author"))?;
        }
        sqlx::query(include_str!("../../queries/clear_book_readers.sql"))
            .bind(id)
            .execute(&mut **tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        for (position, reader) in book.readers.iter().enumerate() {
            sqlx::query(include_str!("../../queries/add_book_reader.sql"))
                .bind(id)
                .bind(reader.0)
                .bind(signed(position as u64, "reader position")?)
                .execute(&mut **tx)
                .await
                .map_err(write_error("book reader"))?;
        }
        Ok(())
    }

    /// Persist the derived attachment totals of a book.
    ///
    /// Returns [`ErrorKind::NotFound`] if the book doesn't exist.
    pub async fn update_counters(&self, book: BookId, counters: &Counters) -> Result<()> {
        let result = sqlx::query(include_str!("../../queries/update_counters.sql"))
            .bind(signed(counters.torrent, "torrent count")?)
            .bind(signed(counters.audio, "audio count")?)
            .bind(signed(counters.image, "image count")?)
            .bind(signed(counters.other, "file count")?)
            .bind(book.0)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if result.rows_affected() == 0 {
            exn::bail!(ErrorKind::NotFound { entity: "book", id: book.0 });
        }
        Ok(())
    }

    // =========================================================================
    // Get/List
    // =========================================================================

    /// Get a book with its subcategories, authors and readers.
    pub async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(include_str!("../../queries/get_book.sql"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        match row {
            Some(row) => Ok(Some(self.with_relations(Book::try_from(row)?).await?)),
            None => Ok(None),
        }
    }

    /// Books, newest first. Unpublished books are skipped unless asked for.
    pub async fn list_books(&self, include_unpublished: bool) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../../queries/list_books.sql"))
            .bind(include_unpublished)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.load_all(rows).await
    }

    /// Books of a cycle, by cycle number.
    pub async fn list_books_in_cycle(&self, cycle: CycleId) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../../queries/list_books_in_cycle.sql"))
            .bind(cycle.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.load_all(rows).await
    }

    async fn load_all(&self, rows: Vec<BookRow>) -> Result<Vec<Book>> {
        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            books.push(self.with_relations(Book::try_from(row)?).await?);
        }
        Ok(books)
    }

    async fn with_relations(&self, mut book: Book) -> Result<Book> {
        let Some(id) = book.id else {
            return Ok(book);
        };
        let subcategories: Vec<i64> = sqlx::query_scalar(include_str!("../../queries/list_book_subcategories.sql"))
            .bind(id.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        book.subcategories = subcategories.into_iter().map(SubcategoryId).collect();
        book.authors = self.authors_of(id).await?.into_iter().filter_map(|a| a.id).collect();
        book.readers = self.readers_of(id).await?.into_iter().filter_map(|r| r.id).collect();
        Ok(book)
    }

    /// Authors of a book, in the order they were credited.
    pub async fn authors_of(&self, book: BookId) -> Result<Vec<Author>> {
        let rows: Vec<PersonRow> = sqlx::query_as(include_str!("../../queries/list_book_authors.sql"))
            .bind(book.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    /// Readers of a book, in the order they were credited.
    pub async fn readers_of(&self, book: BookId) -> Result<Vec<Reader>> {
        let rows: Vec<PersonRow> = sqlx::query_as(include_str!("../../queries/list_book_readers.sql"))
            .bind(book.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Reader::from).collect())
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Delete a book; its relations, attachments, links and ratings go with it.
    ///
    /// Stored blobs are not touched.
    pub async fn delete_book(&self, id: BookId) -> Result<bool> {
        let result = sqlx::query(include_str!("../../queries/delete_book.sql"))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(write_error("book"))?;
        Ok(result.rows_affected() > 0)
    }
}

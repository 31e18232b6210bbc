use super::{signed, timestamp, unsigned};
use crate::error::{Error, ErrorKind, Result};
use bookland_catalog::models::{Book, BookId, Counters, CycleId, WorkType};
use exn::ResultExt;
use std::time::Duration;
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct BookRow {
    pub id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub work_type: String,
    pub cycle_id: Option<i64>,
    pub cycle_number: Option<String>,
    pub year: Option<i64>,
    pub duration_secs: Option<i64>,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub total_torrent_files: i64,
    pub total_audio_files: i64,
    pub total_images: i64,
    pub total_files: i64,
}
impl TryFrom<&Book> for BookRow {
    type Error = Error;
    /// Stamps `updated_at` (and `created_at` for new books) with the current time.
    fn try_from(book: &Book) -> Result<Self> {
        let now = UtcDateTime::now();
        Ok(Self {
            id: book.id.map(|id| id.0),
            title: book.title.clone(),
            slug: book.slug.clone(),
            work_type: book.work_type.to_string(),
            cycle_id: book.cycle.map(|id| id.0),
            cycle_number: book.cycle_number.clone(),
            year: book.year.map(i64::from),
            duration_secs: book.duration.map(|d| signed(d.as_secs(), "duration")).transpose()?,
            description: book.description.clone(),
            is_published: book.is_published,
            created_at: book.created_at.unwrap_or(now).unix_timestamp(),
            updated_at: now.unix_timestamp(),
            total_torrent_files: signed(book.counters.torrent, "torrent count")?,
            total_audio_files: signed(book.counters.audio, "audio count")?,
            total_images: signed(book.counters.image, "image count")?,
            total_files: signed(book.counters.other, "file count")?,
        })
    }
}
/// Relations (subcategories, authors, readers) are loaded separately.
impl TryFrom<BookRow> for Book {
    type Error = Error;
    fn try_from(row: BookRow) -> Result<Self> {
        let mut book = Book::new(row.title);
        book.id = row.id.map(BookId);
        book.slug = row.slug;
        book.work_type = row.work_type.parse::<WorkType>().or_raise(|| ErrorKind::InvalidData("work type"))?;
        book.cycle = row.cycle_id.map(CycleId);
        book.cycle_number = row.cycle_number;
        book.year = row.year.map(i32::try_from).transpose().or_raise(|| ErrorKind::InvalidData("year"))?;
        book.duration = row.duration_secs.map(|s| unsigned(s, "duration")).transpose()?.map(Duration::from_secs);
        book.description = row.description;
        book.is_published = row.is_published;
        book.created_at = Some(timestamp(row.created_at, "creation date")?);
        book.updated_at = Some(timestamp(row.updated_at, "modification date")?);
        book.counters = Counters {
            torrent: unsigned(row.total_torrent_files, "torrent count")?,
            audio: unsigned(row.total_audio_files, "audio count")?,
            image: unsigned(row.total_images, "image count")?,
            other: unsigned(row.total_files, "file count")?,
        };
        Ok(book)
    }
}

use super::Repository;
use crate::error::{ErrorKind, Result, write_error};
use crate::models::{AttachmentRow, signed, unsigned};
use bookland_catalog::models::{Attachment, AttachmentId, AttachmentKind, BookId};
use exn::ResultExt;

fn list_query(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::Audio => include_str!("../../queries/list_audio_files.sql"),
        AttachmentKind::Image => include_str!("../../queries/list_book_images.sql"),
        AttachmentKind::Torrent => include_str!("../../queries/list_torrent_files.sql"),
        AttachmentKind::Additional => include_str!("../../queries/list_additional_files.sql"),
    }
}

fn get_query(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::Audio => include_str!("../../queries/get_audio_file.sql"),
        AttachmentKind::Image => include_str!("../../queries/get_book_image.sql"),
        AttachmentKind::Torrent => include_str!("../../queries/get_torrent_file.sql"),
        AttachmentKind::Additional => include_str!("../../queries/get_additional_file.sql"),
    }
}

fn delete_query(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::Audio => include_str!("../../queries/delete_audio_file.sql"),
        AttachmentKind::Image => include_str!("../../queries/delete_book_image.sql"),
        AttachmentKind::Torrent => include_str!("../../queries/delete_torrent_file.sql"),
        AttachmentKind::Additional => include_str!("../../queries/delete_additional_file.sql"),
    }
}

impl Repository {
    /// Insert or update an attachment, writing the generated id back.
    ///
    /// Only the stored path and the kind-specific fields change on update;
    /// an attachment never moves to another book.
    pub async fn save_attachment(&self, attachment: &mut Attachment) -> Result<AttachmentId> {
        let id = attachment.id().map(|id| id.0);
        let book = attachment.book().0;
        let query = match &*attachment {
            Attachment::Audio(audio) => sqlx::query_scalar(include_str!("../../queries/save_audio_file.sql"))
                .bind(id)
                .bind(book)
                .bind(audio.file.clone())
                .bind(i64::from(audio.order))
                .bind(audio.duration.map(|d| signed(d.as_secs(), "duration")).transpose()?),
            Attachment::Image(image) => sqlx::query_scalar(include_str!("../../queries/save_book_image.sql"))
                .bind(id)
                .bind(book)
                .bind(image.file.clone()),
            Attachment::Torrent(torrent) => sqlx::query_scalar(include_str!("../../queries/save_torrent_file.sql"))
                .bind(id)
                .bind(book)
                .bind(torrent.reader.0)
                .bind(torrent.file.clone()),
            Attachment::Additional(file) => sqlx::query_scalar(include_str!("../../queries/save_additional_file.sql"))
                .bind(id)
                .bind(book)
                .bind(file.file.clone())
                .bind(file.file_type.clone()),
        };
        let id: i64 = query.fetch_one(&self.pool).await.map_err(write_error("attachment"))?;
        let id = AttachmentId(id);
        match attachment {
            Attachment::Audio(a) => a.id = Some(id),
            Attachment::Image(i) => i.id = Some(id),
            Attachment::Torrent(t) => t.id = Some(id),
            Attachment::Additional(a) => a.id = Some(id),
        }
        Ok(id)
    }

    pub async fn get_attachment(&self, kind: AttachmentKind, id: AttachmentId) -> Result<Option<Attachment>> {
        let row: Option<AttachmentRow> = sqlx::query_as(get_query(kind))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(|r| r.into_attachment(kind)).transpose()
    }

    /// Attachments of one kind owned by `book`. Audio tracks come in play order.
    pub async fn list_attachments(&self, book: BookId, kind: AttachmentKind) -> Result<Vec<Attachment>> {
        let rows: Vec<AttachmentRow> = sqlx::query_as(list_query(kind))
            .bind(book.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(|r| r.into_attachment(kind)).collect()
    }

    /// Every attachment owned by `book`, grouped by kind.
    pub async fn list_all_attachments(&self, book: BookId) -> Result<Vec<Attachment>> {
        let mut all = Vec::new();
        for kind in AttachmentKind::ALL {
            all.extend(self.list_attachments(book, kind).await?);
        }
        Ok(all)
    }

    pub async fn delete_attachment(&self, kind: AttachmentKind, id: AttachmentId) -> Result<bool> {
        let result = sqlx::query(delete_query(kind))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of attachments of `kind` owned by `book`.
    pub async fn count_attachments(&self, book: BookId, kind: AttachmentKind) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../../queries/count_attachments.sql"))
            .bind(book.0)
            .bind(kind.to_string())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        unsigned(count, "attachment count")
    }

    /// Highest audio track order of `book`; `0` when it has no tracks.
    pub async fn max_audio_order(&self, book: BookId) -> Result<u32> {
        let order: i64 = sqlx::query_scalar(include_str!("../../queries/max_audio_order.sql"))
            .bind(book.0)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u32::try_from(order).or_raise(|| ErrorKind::InvalidData("track order"))
    }
}

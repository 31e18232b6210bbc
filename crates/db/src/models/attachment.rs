use super::unsigned;
use crate::error::{ErrorKind, Result};
use bookland_catalog::models::{
    AdditionalFile, Attachment, AttachmentId, AttachmentKind, AudioFile, BookId, BookImage, ReaderId, TorrentFile,
};
use exn::{OptionExt, ResultExt};
use std::time::Duration;

/// One row of any attachment table; columns a kind doesn't have come back `NULL`.
#[derive(sqlx::FromRow)]
pub(crate) struct AttachmentRow {
    pub id: i64,
    pub book_id: i64,
    pub file: String,
    pub track: Option<i64>,
    pub duration_secs: Option<i64>,
    pub reader_id: Option<i64>,
    pub file_type: Option<String>,
}
impl AttachmentRow {
    pub fn into_attachment(self, kind: AttachmentKind) -> Result<Attachment> {
        let id = Some(AttachmentId(self.id));
        let book = BookId(self.book_id);
        Ok(match kind {
            AttachmentKind::Audio => Attachment::Audio(AudioFile {
                id,
                book,
                file: self.file,
                order: u32::try_from(self.track.unwrap_or(0)).or_raise(|| ErrorKind::InvalidData("track order"))?,
                duration: self.duration_secs.map(|s| unsigned(s, "duration")).transpose()?.map(Duration::from_secs),
            }),
            AttachmentKind::Image => Attachment::Image(BookImage { id, book, file: self.file }),
            AttachmentKind::Torrent => Attachment::Torrent(TorrentFile {
                id,
                book,
                reader: ReaderId(self.reader_id.ok_or_raise(|| ErrorKind::InvalidData("torrent reader"))?),
                file: self.file,
            }),
            AttachmentKind::Additional => {
                Attachment::Additional(AdditionalFile { id, book, file: self.file, file_type: self.file_type })
            },
        })
    }
}

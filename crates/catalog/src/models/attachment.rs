use super::{AttachmentId, Book, BookId, ReaderId};
use crate::error::{ErrorKind, Result};
use crate::filename::extension;
use derive_more::Display;
use std::time::Duration;

/// The four kinds of media a book can own, each with its own naming rule.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    #[display("audio")]
    Audio,
    #[display("image")]
    Image,
    #[display("torrent")]
    Torrent,
    #[display("additional")]
    Additional,
}
impl AttachmentKind {
    pub const ALL: [AttachmentKind; 4] = [Self::Audio, Self::Image, Self::Torrent, Self::Additional];

    /// Lowercase file extensions accepted for this kind.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Audio => &["mp3", "m4b", "aac", "wav"],
            Self::Image => &["jpg", "jpeg", "png"],
            Self::Torrent => &["torrent"],
            Self::Additional => &["txt", "fb2", "pdf", "zip", "7z", "rar"],
        }
    }

    /// Directory (relative to the storage root) files of this kind are stored under.
    pub fn upload_prefix(&self) -> &'static str {
        match self {
            Self::Audio => "uploads/audio_files",
            Self::Image => "uploads/book_images",
            Self::Torrent => "uploads/torrents",
            Self::Additional => "uploads/extra_files",
        }
    }

    /// Checks the extension of `filename` (case-insensitively) and returns it lowercased.
    pub fn validate_extension(&self, filename: &str) -> Result<String> {
        let ext = extension(filename).to_lowercase();
        if !filename.contains('.') || !self.allowed_extensions().contains(&ext.as_str()) {
            exn::bail!(ErrorKind::validation(format!(
                "{self} files must have one of the extensions [{}], got {filename:?}",
                self.allowed_extensions().join(", ")
            )));
        }
        Ok(ext)
    }
}

/// Resolves which book an entity's files are named after.
///
/// Attachments point at their owner; a book is its own owner (and has none
/// until it has been saved).
pub trait OwningBook {
    fn resolve_owning_book(&self) -> Option<BookId>;
}
impl OwningBook for Book {
    fn resolve_owning_book(&self) -> Option<BookId> {
        self.id
    }
}

/// An audio track. Tracks play in ascending `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub id: Option<AttachmentId>,
    pub book: BookId,
    /// Stored path, relative to the storage root.
    pub file: String,
    /// Position in the playlist; `0` means "not assigned yet".
    pub order: u32,
    pub duration: Option<Duration>,
}

/// A cover or illustration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookImage {
    pub id: Option<AttachmentId>,
    pub book: BookId,
    pub file: String,
}

/// A torrent of one reader's recording of the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentFile {
    pub id: Option<AttachmentId>,
    pub book: BookId,
    pub reader: ReaderId,
    pub file: String,
}

/// Any supplementary file (text, archive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalFile {
    pub id: Option<AttachmentId>,
    pub book: BookId,
    pub file: String,
    /// Free-form type label; defaults to the file extension.
    pub file_type: Option<String>,
}

macro_rules! owned_by_book {
    ($($ty:ty),+) => {
        $(
            impl OwningBook for $ty {
                fn resolve_owning_book(&self) -> Option<BookId> {
                    Some(self.book)
                }
            }
        )+
    };
}
owned_by_book!(AudioFile, BookImage, TorrentFile, AdditionalFile);

/// Any attachment, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Audio(AudioFile),
    Image(BookImage),
    Torrent(TorrentFile),
    Additional(AdditionalFile),
}
impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Self::Audio(_) => AttachmentKind::Audio,
            Self::Image(_) => AttachmentKind::Image,
            Self::Torrent(_) => AttachmentKind::Torrent,
            Self::Additional(_) => AttachmentKind::Additional,
        }
    }

    pub fn id(&self) -> Option<AttachmentId> {
        match self {
            Self::Audio(a) => a.id,
            Self::Image(i) => i.id,
            Self::Torrent(t) => t.id,
            Self::Additional(a) => a.id,
        }
    }

    pub fn book(&self) -> BookId {
        match self {
            Self::Audio(a) => a.book,
            Self::Image(i) => i.book,
            Self::Torrent(t) => t.book,
            Self::Additional(a) => a.book,
        }
    }

    /// Stored path, relative to the storage root.
    pub fn file(&self) -> &str {
        match self {
            Self::Audio(a) => &a.file,
            Self::Image(i) => &i.file,
            Self::Torrent(t) => &t.file,
            Self::Additional(a) => &a.file,
        }
    }

    pub fn set_file(&mut self, file: impl Into<String>) {
        let file = file.into();
        match self {
            Self::Audio(a) => a.file = file,
            Self::Image(i) => i.file = file,
            Self::Torrent(t) => t.file = file,
            Self::Additional(a) => a.file = file,
        }
    }
}
impl OwningBook for Attachment {
    fn resolve_owning_book(&self) -> Option<BookId> {
        Some(self.book())
    }
}

//! Catalog entities.
//!
//! Models carry only what the catalog logic reads or writes. Relations are held
//! as identifiers; the datastore resolves them.

mod attachment;
mod book;
mod category;
mod cycle;
mod ids;
mod person;
mod rating;
mod social;

pub use self::attachment::{AdditionalFile, Attachment, AttachmentKind, AudioFile, BookImage, OwningBook, TorrentFile};
pub use self::book::{Book, BookIdentity, Counters, SeriesPosition, WorkType};
pub use self::category::{Category, Subcategory};
pub use self::cycle::Cycle;
pub use self::ids::{
    AttachmentId, AuthorId, BookId, CategoryId, CycleId, LinkId, PlatformId, RatingId, ReaderId, SubcategoryId, UserId,
};
pub use self::person::{Author, PersonName, Reader};
pub use self::rating::{BookRating, LengthFeedback};
pub use self::social::{SocialMediaLink, SocialMediaPlatform};

use crate::error::{ErrorKind, Result};

/// Rejects values longer than `max` characters.
pub(crate) fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        exn::bail!(ErrorKind::validation(format!("{field} must be at most {max} characters (got {len})")));
    }
    Ok(())
}

/// Rejects empty (or whitespace-only) values.
pub(crate) fn check_present(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        exn::bail!(ErrorKind::validation(format!("{field} is required")));
    }
    Ok(())
}

mod attachment;
mod book;
mod catalog;
mod social;

pub(crate) use self::attachment::AttachmentRow;
pub(crate) use self::book::BookRow;
pub(crate) use self::catalog::{CategoryRow, CycleRow, DependentsRow, PersonRow, SubcategoryRow};
pub(crate) use self::social::{LinkRow, PlatformRow, RatingRow};

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use time::UtcDateTime;

/// Reads back a unix timestamp written by this crate.
pub(crate) fn timestamp(value: i64, field: &'static str) -> Result<UtcDateTime> {
    UtcDateTime::from_unix_timestamp(value).or_raise(|| ErrorKind::InvalidData(field))
}

/// SQLite only has signed integers.
pub(crate) fn unsigned(value: i64, field: &'static str) -> Result<u64> {
    u64::try_from(value).or_raise(|| ErrorKind::InvalidData(field))
}

pub(crate) fn signed(value: u64, field: &'static str) -> Result<i64> {
    i64::try_from(value).or_raise(|| ErrorKind::InvalidData(field))
}

//! Errors raised by media storage backends.
//!
//! Every variant that concerns one file carries its path relative to the media
//! root, so the library can report which upload was affected.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("no stored file at {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    #[display("media root refused access to {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Every numbered alternative to this name is taken.
    #[display("no free name left next to {}", _0.display())]
    AlreadyExists(#[error(not(source))] PathBuf),
    #[display("media I/O failed: {_0}")]
    Io(IoError),
    /// Absolute, traversing or otherwise unusable storage path.
    #[display("unusable storage path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A filesystem path that doesn't lie under the media root.
    #[display("{} is outside the media root", _0.display())]
    OutsideRoot(#[error(not(source))] PathBuf),
    #[display("media base URL can't serve files: {_0}")]
    InvalidUrl(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Only raw I/O failures may go away on their own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

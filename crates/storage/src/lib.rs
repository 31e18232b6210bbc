//! Blob storage for uploaded media.
//!
//! Attachments are stored under paths relative to a media root, e.g.
//! `uploads/audio_files/01-dune-herbert.mp3`, and served from a public base URL.

pub mod backend;
pub mod error;
mod models;
mod path;

pub use crate::backend::StorageBackend;
pub use crate::models::FileInfo;
pub use crate::path::{parse_base_url, validate as validate_path};
use std::sync::Arc;

pub type BackendHandle = Arc<dyn StorageBackend + Send + Sync>;

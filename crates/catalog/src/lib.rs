//! Core rules of the audiobook catalog.
//!
//! Everything in this crate is a pure function of its inputs plus a handful of
//! read-only queries through [`CatalogStore`]:
//!
//! - [`transliterate`] turns free text (Cyrillic, accented Latin, punctuation)
//!   into a slug fragment.
//! - [`allocate_slug`] assigns slugs to name-bearing entities.
//! - [`compose_filename`] names attachment files after their owning book.
//! - [`recompute_counters`] reads the per-book attachment totals.
//! - [`guard_delete`] refuses to delete categories that still have dependents.
//!
//! Persisting the results, serializing concurrent uploads and moving blobs are
//! left to the caller.

pub mod counters;
pub mod error;
pub mod filename;
pub mod guard;
pub mod models;
pub mod slug;
mod store;
#[cfg(test)]
mod testing;
mod translit;

pub use crate::counters::recompute_counters;
pub use crate::filename::{Extra, compose, compose_filename, needs_rename};
pub use crate::guard::{BlockReason, DeleteTarget, Verdict, can_delete, guard_delete};
pub use crate::slug::{Collection, SlugPolicy, Sluggable, allocate_slug, allocate_slug_with};
pub use crate::store::{CatalogStore, SubcategoryDependents};
pub use crate::translit::{is_slug_safe, transliterate};

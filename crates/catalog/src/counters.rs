//! Per-book attachment totals, recomputed from the store after every
//! attachment write.

use crate::error::{ErrorKind, Result};
use crate::models::{AttachmentKind, BookId, Counters};
use crate::store::CatalogStore;
use exn::ResultExt;
use tracing::instrument;

/// Reads the live attachment totals of `book`.
///
/// Must run after the attachment write that triggered it has been applied;
/// persisting the result is left to the caller.
#[instrument(skip(store))]
pub async fn recompute_counters<S>(store: &S, book: BookId) -> Result<Counters>
where
    S: CatalogStore + ?Sized,
{
    let mut counters = Counters::default();
    for kind in AttachmentKind::ALL {
        let count = store.count(book, kind).await.or_raise(|| ErrorKind::StorageUnavailable)?;
        match kind {
            AttachmentKind::Audio => counters.audio = count,
            AttachmentKind::Image => counters.image = count,
            AttachmentKind::Torrent => counters.torrent = count,
            AttachmentKind::Additional => counters.other = count,
        }
    }
    Ok(counters)
}

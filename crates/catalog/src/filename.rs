//! Storage filenames for book attachments.
//!
//! Every name starts from a base built from the owning book:
//!
//! ```text
//! {book}-{authors}                          regular books
//! {book}-{cycle}-{cycle number}-{authors}   books of a cycle
//! ```
//!
//! and is then decorated per [`AttachmentKind`]:
//!
//! | Kind         | Name                          |
//! |--------------|-------------------------------|
//! | `audio`      | `{nn}-{base}.{ext}`           |
//! | `image`      | `{nn}-{base}.{ext}`           |
//! | `torrent`    | `{base}-({reader}).{ext}`     |
//! | `additional` | `{base}.{ext}`                |
//!
//! where `nn` is the number of existing attachments of that kind plus one,
//! zero-padded to two digits.
//!
//! Two audio or image uploads for the same book racing through
//! [`compose_filename`] will read the same count and get the same prefix; the
//! caller must serialize attachment creation per book.

use crate::error::{ErrorKind, Result};
use crate::models::{AttachmentKind, BookIdentity};
use crate::store::CatalogStore;
use crate::translit::transliterate;
use exn::ResultExt;
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

/// Stands in for the author list of a book without authors.
pub const UNKNOWN_AUTHOR: &str = "unknown";
/// Stands in for the reader of a torrent without one.
pub const UNKNOWN_READER: &str = "unknown-reader";
/// Stands in for the position of a cycle book without a cycle number.
pub const NO_CYCLE_NUMBER: &str = "00";

/// Kind-specific inputs to [`compose`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extra {
    /// Slug of the reader a torrent belongs to.
    pub reader_slug: Option<String>,
}
impl Extra {
    pub fn reader(slug: impl Into<String>) -> Self {
        Self { reader_slug: Some(slug.into()) }
    }
}

/// Everything after the last `.` of `filename` (the whole name if it has no dot).
pub fn extension(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or(filename)
}

/// The kind-independent part of every attachment name of `book`.
pub fn base_name(book: &BookIdentity) -> String {
    let authors = match book.author_slugs.is_empty() {
        true => UNKNOWN_AUTHOR.to_string(),
        false => book.author_slugs.join("-"),
    };
    match &book.series {
        Some(series) => {
            let number = series.number.as_deref().map(transliterate).filter(|n| !n.is_empty());
            let number = number.as_deref().unwrap_or(NO_CYCLE_NUMBER);
            format!("{}-{}-{number}-{authors}", book.slug, series.cycle_slug)
        },
        None => format!("{}-{authors}", book.slug),
    }
}

/// Builds the storage filename for a new attachment of `kind`.
///
/// `siblings` is the number of attachments of the same kind the book already
/// owns; only audio and image names use it.
pub fn compose(book: &BookIdentity, kind: AttachmentKind, original: &str, extra: &Extra, siblings: u64) -> String {
    let base = base_name(book);
    let ext = extension(original);
    match kind {
        AttachmentKind::Audio | AttachmentKind::Image => format!("{:02}-{base}.{ext}", siblings + 1),
        AttachmentKind::Torrent => {
            let reader = extra.reader_slug.as_deref().unwrap_or(UNKNOWN_READER);
            format!("{base}-({reader}).{ext}")
        },
        AttachmentKind::Additional => format!("{base}.{ext}"),
    }
}

/// [`compose`], reading the sibling count from the datastore when the kind needs it.
#[instrument(skip(store, book, extra), fields(book = %book.id))]
pub async fn compose_filename<S>(
    store: &S,
    book: &BookIdentity,
    kind: AttachmentKind,
    original: &str,
    extra: &Extra,
) -> Result<String>
where
    S: CatalogStore + ?Sized,
{
    let siblings = match kind {
        AttachmentKind::Audio | AttachmentKind::Image => {
            store.count(book.id, kind).await.or_raise(|| ErrorKind::StorageUnavailable)?
        },
        AttachmentKind::Torrent | AttachmentKind::Additional => 0,
    };
    Ok(compose(book, kind, original, extra, siblings))
}

/// Whether re-saving an attachment should regenerate its stored name.
///
/// Images and additional files keep a name that already starts with the book
/// slug (images after their `{nn}-` ordinal); audio and torrent names are
/// regenerated on every save.
/// Only the last path component of `stored` is considered.
pub fn needs_rename(kind: AttachmentKind, stored: &str, book_slug: &str) -> bool {
    let name = stored.rsplit('/').next().unwrap_or(stored);
    match kind {
        AttachmentKind::Audio | AttachmentKind::Torrent => true,
        AttachmentKind::Image => !ORDINAL.replace(name, "").starts_with(book_slug),
        AttachmentKind::Additional => !name.starts_with(book_slug),
    }
}

static ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+-").unwrap());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookId, SeriesPosition};
    use crate::testing::MemoryStore;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dune() -> BookIdentity {
        BookIdentity {
            id: BookId(1),
            slug: "dune".to_string(),
            series: None,
            author_slugs: vec!["herbert".to_string()],
        }
    }

    fn in_cycle(mut book: BookIdentity, number: Option<&str>) -> BookIdentity {
        book.series = Some(SeriesPosition { cycle_slug: "dune-saga".to_string(), number: number.map(String::from) });
        book
    }

    #[rstest]
    #[case(AttachmentKind::Audio, "track.mp3", Extra::default(), 2, "03-dune-herbert.mp3")]
    #[case(AttachmentKind::Image, "Cover.Final.png", Extra::default(), 0, "01-dune-herbert.png")]
    #[case(AttachmentKind::Audio, "track.mp3", Extra::default(), 99, "100-dune-herbert.mp3")]
    #[case(AttachmentKind::Torrent, "x.torrent", Extra::reader("kozy"), 5, "dune-herbert-(kozy).torrent")]
    #[case(AttachmentKind::Torrent, "x.torrent", Extra::default(), 0, "dune-herbert-(unknown-reader).torrent")]
    #[case(AttachmentKind::Additional, "notes.pdf", Extra::default(), 7, "dune-herbert.pdf")]
    #[case(AttachmentKind::Additional, "README", Extra::default(), 0, "dune-herbert.README")]
    fn test_compose(
        dune: BookIdentity,
        #[case] kind: AttachmentKind,
        #[case] original: &str,
        #[case] extra: Extra,
        #[case] siblings: u64,
        #[case] expected: &str,
    ) {
        assert_eq!(compose(&dune, kind, original, &extra, siblings), expected);
    }

    #[rstest]
    #[case(Some("1"), "dune-dune-saga-1-herbert.pdf")]
    #[case(Some("Том 2"), "dune-dune-saga-tom_2-herbert.pdf")]
    #[case(Some(""), "dune-dune-saga-00-herbert.pdf")]
    #[case(None, "dune-dune-saga-00-herbert.pdf")]
    fn test_compose_cycle_book(dune: BookIdentity, #[case] number: Option<&str>, #[case] expected: &str) {
        let book = in_cycle(dune, number);
        assert_eq!(compose(&book, AttachmentKind::Additional, "notes.pdf", &Extra::default(), 0), expected);
    }

    #[rstest]
    fn test_authors_keep_insertion_order(mut dune: BookIdentity) {
        dune.author_slugs = vec!["strugatskiy_arkadiy".to_string(), "strugatskiy_boris".to_string()];
        assert_eq!(base_name(&dune), "dune-strugatskiy_arkadiy-strugatskiy_boris");
        dune.author_slugs.clear();
        assert_eq!(base_name(&dune), "dune-unknown");
    }

    #[rstest]
    #[tokio::test]
    async fn test_compose_filename_counts_siblings(dune: BookIdentity) {
        let store = MemoryStore::default().with_count(BookId(1), AttachmentKind::Audio, 2);
        let name =
            compose_filename(&store, &dune, AttachmentKind::Audio, "track.mp3", &Extra::default()).await.unwrap();
        assert_eq!(name, "03-dune-herbert.mp3");
    }

    #[rstest]
    #[tokio::test]
    async fn test_compose_filename_surfaces_storage_failure(dune: BookIdentity) {
        let store = MemoryStore::default().failing();
        let err =
            compose_filename(&store, &dune, AttachmentKind::Image, "a.png", &Extra::default()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::StorageUnavailable);
        // Kinds that don't count never touch the store.
        let name = compose_filename(&store, &dune, AttachmentKind::Additional, "a.pdf", &Extra::default()).await;
        assert_eq!(name.unwrap(), "dune-herbert.pdf");
    }

    #[rstest]
    #[case(AttachmentKind::Image, "uploads/book_images/01-dune-herbert.png", false)]
    #[case(AttachmentKind::Image, "cover.png", true)]
    #[case(AttachmentKind::Image, "12-dune-herbert.jpg", false)]
    #[case(AttachmentKind::Image, "dune-herbert.png", false)]
    #[case(AttachmentKind::Image, "01-dune.png", false)]
    #[case(AttachmentKind::Image, "01-arrakis-herbert.png", true)]
    #[case(AttachmentKind::Additional, "01-dune-herbert.pdf", true)]
    #[case(AttachmentKind::Additional, "dune-herbert.pdf", false)]
    #[case(AttachmentKind::Additional, "uploads/extra_files/notes.pdf", true)]
    #[case(AttachmentKind::Audio, "uploads/audio_files/01-dune-herbert.mp3", true)]
    #[case(AttachmentKind::Torrent, "uploads/torrents/dune-herbert-(kozy).torrent", true)]
    fn test_needs_rename(#[case] kind: AttachmentKind, #[case] stored: &str, #[case] expected: bool) {
        assert_eq!(needs_rename(kind, stored, "dune"), expected);
    }
}

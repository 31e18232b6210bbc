//! Uploading, renaming and removing the files attached to books.
//!
//! Stored names are derived from the owning book (see
//! [`compose_filename`]), under one directory per attachment kind. A name
//! that is already taken in storage gets a `_n` suffix instead of replacing
//! the existing file.

use crate::Catalog;
use crate::error::{ErrorKind, Result};
use bookland_catalog::models::{
    AdditionalFile, Attachment, AttachmentId, AttachmentKind, AudioFile, Book, BookId, BookImage, ReaderId,
    TorrentFile,
};
use bookland_catalog::{Extra, compose_filename, needs_rename};
use bookland_storage::error::ErrorKind as StorageErrorKind;
use bookland_storage::validate_path;
use exn::{OptionExt, ResultExt};
use futures::TryStreamExt;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// A file handed in for storage: its original name and contents.
///
/// Only the extension of the original name survives; it has to be one the
/// attachment kind accepts.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub filename: &'a str,
    pub data: &'a [u8],
}
impl<'a> Upload<'a> {
    pub fn new(filename: &'a str, data: &'a [u8]) -> Self {
        Self { filename, data }
    }
}

impl Catalog {
    /// Store an audio track. An `order` of `0` appends it after the book's
    /// last track.
    #[instrument(skip(self, upload), fields(filename = upload.filename))]
    pub async fn attach_audio(
        &self,
        book: BookId,
        upload: Upload<'_>,
        order: u32,
        duration: Option<Duration>,
    ) -> Result<Attachment> {
        AttachmentKind::Audio.validate_extension(upload.filename).map_err(ErrorKind::catalog)?;
        let _guard = self.locks.lock(book).await;
        let owner = self.load_book(book).await?;
        let order = self.assign_order(book, order).await?;
        let file = self.store_upload(&owner, AttachmentKind::Audio, upload, &Extra::default()).await?;
        self.insert(Attachment::Audio(AudioFile { id: None, book, file, order, duration })).await
    }

    #[instrument(skip(self, upload), fields(filename = upload.filename))]
    pub async fn attach_image(&self, book: BookId, upload: Upload<'_>) -> Result<Attachment> {
        AttachmentKind::Image.validate_extension(upload.filename).map_err(ErrorKind::catalog)?;
        let _guard = self.locks.lock(book).await;
        let owner = self.load_book(book).await?;
        let file = self.store_upload(&owner, AttachmentKind::Image, upload, &Extra::default()).await?;
        self.insert(Attachment::Image(BookImage { id: None, book, file })).await
    }

    /// Store a torrent of `reader`'s recording. The reader must be one of the
    /// book's readers.
    #[instrument(skip(self, upload), fields(filename = upload.filename))]
    pub async fn attach_torrent(&self, book: BookId, reader: ReaderId, upload: Upload<'_>) -> Result<Attachment> {
        AttachmentKind::Torrent.validate_extension(upload.filename).map_err(ErrorKind::catalog)?;
        let _guard = self.locks.lock(book).await;
        let owner = self.load_book(book).await?;
        let extra = self.torrent_extra(&owner, reader).await?;
        let file = self.store_upload(&owner, AttachmentKind::Torrent, upload, &extra).await?;
        self.insert(Attachment::Torrent(TorrentFile { id: None, book, reader, file })).await
    }

    /// Store a supplementary file. Without a `file_type` the lowercased
    /// extension is used.
    #[instrument(skip(self, upload), fields(filename = upload.filename))]
    pub async fn attach_additional(
        &self,
        book: BookId,
        upload: Upload<'_>,
        file_type: Option<String>,
    ) -> Result<Attachment> {
        let ext = AttachmentKind::Additional.validate_extension(upload.filename).map_err(ErrorKind::catalog)?;
        let file_type = file_type.filter(|t| !t.trim().is_empty()).unwrap_or(ext);
        let _guard = self.locks.lock(book).await;
        let owner = self.load_book(book).await?;
        let file = self.store_upload(&owner, AttachmentKind::Additional, upload, &Extra::default()).await?;
        self.insert(Attachment::Additional(AdditionalFile { id: None, book, file, file_type: Some(file_type) }))
            .await
    }

    /// Save changes to an already stored attachment.
    ///
    /// Audio and torrent names are regenerated on every save; images and
    /// additional files only when their name doesn't start with the book slug.
    /// A regenerated name counts the attachment itself among its siblings, so
    /// a track's number can move up by one. The stored file is moved along
    /// with the name.
    #[instrument(skip_all, fields(kind = %attachment.kind()))]
    pub async fn resave_attachment(&self, attachment: &mut Attachment) -> Result<()> {
        let (kind, book) = (attachment.kind(), attachment.book());
        let id = attachment
            .id()
            .ok_or_raise(|| ErrorKind::Validation("new files are added with the attach methods".to_string()))?;
        let _guard = self.locks.lock(book).await;
        if self.repo.get_attachment(kind, id).await.map_err(ErrorKind::datastore)?.is_none() {
            exn::bail!(ErrorKind::not_found("attachment", id.0));
        }
        let owner = self.load_book(book).await?;
        let extra = match &mut *attachment {
            Attachment::Audio(audio) => {
                audio.order = self.assign_order(book, audio.order).await?;
                Extra::default()
            },
            Attachment::Torrent(torrent) => self.torrent_extra(&owner, torrent.reader).await?,
            Attachment::Image(_) | Attachment::Additional(_) => Extra::default(),
        };
        if needs_rename(kind, attachment.file(), &owner.slug) {
            let identity = self.identity(&owner).await?;
            let name = compose_filename(&self.repo, &identity, kind, attachment.file(), &extra)
                .await
                .map_err(ErrorKind::catalog)?;
            let target = Path::new(kind.upload_prefix()).join(name);
            if Path::new(attachment.file()) != target.as_path() {
                let moved = self.move_blob(attachment.file(), &target).await?;
                attachment.set_file(moved);
            }
        }
        self.repo.save_attachment(attachment).await.map_err(ErrorKind::datastore)?;
        tracing::debug!(%id, file = attachment.file(), "Updated attachment");
        Ok(())
    }

    /// Delete an attachment and its stored file, then recount the book.
    ///
    /// Returns `false` when there was no such attachment.
    #[instrument(skip(self))]
    pub async fn delete_attachment(&self, kind: AttachmentKind, id: AttachmentId) -> Result<bool> {
        let Some(attachment) = self.repo.get_attachment(kind, id).await.map_err(ErrorKind::datastore)? else {
            return Ok(false);
        };
        let _guard = self.locks.lock(attachment.book()).await;
        if !self.repo.delete_attachment(kind, id).await.map_err(ErrorKind::datastore)? {
            return Ok(false);
        }
        self.remove_blob(attachment.file()).await;
        self.refresh_counters(attachment.book()).await?;
        Ok(true)
    }

    /// Attachments of `book` whose stored file is gone.
    ///
    /// Each upload directory the book uses is listed once; a stored name that
    /// isn't a valid storage path counts as missing.
    #[instrument(skip(self))]
    pub async fn missing_files(&self, book: BookId) -> Result<Vec<Attachment>> {
        let attachments = self.repo.list_all_attachments(book).await.map_err(ErrorKind::datastore)?;
        let paths: Vec<Option<PathBuf>> = attachments.iter().map(|a| validate_path(a.file()).ok()).collect();
        let folders: BTreeSet<&Path> = paths.iter().flatten().filter_map(|path| path.parent()).collect();
        let mut present = HashSet::new();
        for folder in folders {
            let prefix = Some(folder).filter(|folder| !folder.as_os_str().is_empty());
            let mut listing = self.media.list_stream(prefix);
            while let Some(info) = listing.try_next().await.or_raise(|| ErrorKind::Media)? {
                present.insert(info.path);
            }
        }
        let missing: Vec<_> = attachments
            .into_iter()
            .zip(paths)
            .filter(|(_, path)| path.as_ref().is_none_or(|path| !present.contains(path)))
            .map(|(attachment, _)| attachment)
            .collect();
        for attachment in &missing {
            tracing::warn!(file = attachment.file(), "Stored file is missing");
        }
        Ok(missing)
    }

    /// Public URL the attachment's file is served under.
    pub fn attachment_url(&self, attachment: &Attachment) -> Result<Url> {
        self.media.url(Path::new(attachment.file())).or_raise(|| ErrorKind::Media)
    }

    async fn assign_order(&self, book: BookId, order: u32) -> Result<u32> {
        if order != 0 {
            return Ok(order);
        }
        let last = self.repo.max_audio_order(book).await.map_err(ErrorKind::datastore)?;
        last.checked_add(1)
            .ok_or_raise(|| ErrorKind::Validation(format!("no track order left after {last}; number this track")))
    }

    async fn torrent_extra(&self, owner: &Book, reader: ReaderId) -> Result<Extra> {
        if !owner.readers.contains(&reader) {
            exn::bail!(ErrorKind::Validation(format!("reader #{reader} is not a reader of '{}'", owner.title)));
        }
        let reader = self
            .repo
            .get_reader(reader)
            .await
            .map_err(ErrorKind::datastore)?
            .ok_or_raise(|| ErrorKind::not_found("reader", reader.0))?;
        Ok(Extra::reader(reader.slug))
    }

    /// Name the upload after its book and write it to the first free path.
    async fn store_upload(
        &self,
        owner: &Book,
        kind: AttachmentKind,
        upload: Upload<'_>,
        extra: &Extra,
    ) -> Result<String> {
        let identity = self.identity(owner).await?;
        let name =
            compose_filename(&self.repo, &identity, kind, upload.filename, extra).await.map_err(ErrorKind::catalog)?;
        let path = self
            .media
            .available_path(&Path::new(kind.upload_prefix()).join(name))
            .await
            .or_raise(|| ErrorKind::Media)?;
        self.media.write(&path, upload.data).await.or_raise(|| ErrorKind::Media)?;
        tracing::debug!(path = %path.display(), bytes = upload.data.len(), "Stored upload");
        Ok(stored_name(&path))
    }

    /// Insert a freshly stored attachment and recount its book.
    ///
    /// The stored file is removed again when the row can't be written.
    async fn insert(&self, mut attachment: Attachment) -> Result<Attachment> {
        if let Err(err) = self.repo.save_attachment(&mut attachment).await {
            self.remove_blob(attachment.file()).await;
            return Err(ErrorKind::datastore(err));
        }
        self.refresh_counters(attachment.book()).await?;
        tracing::info!(book = %attachment.book(), file = attachment.file(), "Attached file");
        Ok(attachment)
    }

    /// Move a stored file to `target` (or the first free alternative) and
    /// return where it ended up.
    ///
    /// A file that is already missing isn't an error; only the name changes.
    pub(crate) async fn move_blob(&self, from: &str, target: &Path) -> Result<String> {
        let source = Path::new(from);
        if !self.media.exists(source).await.or_raise(|| ErrorKind::Media)? {
            tracing::warn!(file = from, "Stored file is missing; renaming the record only");
            return Ok(stored_name(target));
        }
        let target = self.media.available_path(target).await.or_raise(|| ErrorKind::Media)?;
        self.media.rename(source, &target).await.or_raise(|| ErrorKind::Media)?;
        tracing::debug!(from, to = %target.display(), "Moved stored file");
        Ok(stored_name(&target))
    }

    /// Best-effort removal of a stored file.
    pub(crate) async fn remove_blob(&self, file: &str) {
        match self.media.delete(Path::new(file)).await {
            Ok(()) => tracing::debug!(file, "Removed stored file"),
            Err(err) if matches!(&*err, StorageErrorKind::NotFound(_)) => {
                tracing::warn!(file, "Stored file was already gone");
            },
            Err(err) => tracing::warn!(file, error = ?err, "Could not remove stored file"),
        }
    }
}

/// Stored paths use `/` separators regardless of platform.
fn stored_name(path: &Path) -> String {
    let parts: Vec<_> = path.components().map(|c| c.as_os_str().to_string_lossy()).collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, fx};
    use bookland_storage::StorageBackend;
    use rstest::rstest;

    async fn counters(fx: &Fixture, book: BookId) -> bookland_catalog::models::Counters {
        fx.catalog.repository().get_book(book).await.unwrap().unwrap().counters
    }

    #[rstest]
    #[tokio::test]
    async fn test_audio_is_numbered_and_ordered(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        let first = fx.catalog.attach_audio(book, Upload::new("part one.mp3", b"ID3"), 0, None).await.unwrap();
        let second = fx.catalog.attach_audio(book, Upload::new("part two.MP3", b"ID3"), 0, None).await.unwrap();

        assert_eq!(first.file(), "uploads/audio_files/01-dune-herbert.mp3");
        assert_eq!(second.file(), "uploads/audio_files/02-dune-herbert.MP3");
        let orders: Vec<_> = [first, second]
            .into_iter()
            .map(|a| match a {
                Attachment::Audio(audio) => audio.order,
                _ => 0,
            })
            .collect();
        assert_eq!(orders, [1, 2]);
        assert_eq!(counters(&fx, book).await.audio, 2);
        assert_eq!(fx.media.paths().await.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_explicit_order_is_kept(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        let track = fx.catalog.attach_audio(book, Upload::new("a.m4b", b"m4b"), 7, None).await.unwrap();
        assert!(matches!(track, Attachment::Audio(AudioFile { order: 7, .. })));
        let next = fx.catalog.attach_audio(book, Upload::new("b.m4b", b"m4b"), 0, None).await.unwrap();
        assert!(matches!(next, Attachment::Audio(AudioFile { order: 8, .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn test_no_order_after_last_possible_track(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        fx.catalog.attach_audio(book, Upload::new("a.mp3", b"ID3"), u32::MAX, None).await.unwrap();
        let err = fx.catalog.attach_audio(book, Upload::new("b.mp3", b"ID3"), 0, None).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        assert_eq!(fx.media.paths().await.len(), 1);
        // An explicit order still goes through.
        fx.catalog.attach_audio(book, Upload::new("c.mp3", b"ID3"), 3, None).await.unwrap();
    }

    #[rstest]
    #[tokio::test]
    async fn test_concurrent_uploads_get_distinct_names(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        let (a, b) = tokio::join!(
            fx.catalog.attach_audio(book, Upload::new("a.mp3", b"a"), 0, None),
            fx.catalog.attach_audio(book, Upload::new("b.mp3", b"b"), 0, None),
        );
        let mut files = vec![a.unwrap().file().to_string(), b.unwrap().file().to_string()];
        files.sort();
        assert_eq!(files, ["uploads/audio_files/01-dune-herbert.mp3", "uploads/audio_files/02-dune-herbert.mp3"]);
        assert_eq!(counters(&fx, book).await.audio, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_recounts(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        fx.catalog.attach_audio(book, Upload::new("a.mp3", b"a"), 0, None).await.unwrap();
        let second = fx.catalog.attach_audio(book, Upload::new("b.mp3", b"b"), 0, None).await.unwrap();

        let id = second.id().unwrap();
        assert!(fx.catalog.delete_attachment(AttachmentKind::Audio, id).await.unwrap());
        assert_eq!(counters(&fx, book).await.audio, 1);
        assert_eq!(fx.media.paths().await, [PathBuf::from("uploads/audio_files/01-dune-herbert.mp3")]);
        assert!(!fx.catalog.delete_attachment(AttachmentKind::Audio, id).await.unwrap());
    }

    #[rstest]
    #[case(AttachmentKind::Image, "cover.gif")]
    #[case(AttachmentKind::Additional, "notes")]
    #[case(AttachmentKind::Audio, "track.flac")]
    #[tokio::test]
    async fn test_rejected_extensions(
        #[future] fx: Fixture,
        #[case] kind: AttachmentKind,
        #[case] filename: &str,
    ) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        let upload = Upload::new(filename, b"data");
        let err = match kind {
            AttachmentKind::Image => fx.catalog.attach_image(book, upload).await,
            AttachmentKind::Additional => fx.catalog.attach_additional(book, upload, None).await,
            _ => fx.catalog.attach_audio(book, upload, 0, None).await,
        }
        .unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        assert!(fx.media.paths().await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_unknown_book(#[future] fx: Fixture) {
        let fx = fx.await;
        let err = fx.catalog.attach_image(BookId(404), Upload::new("cover.png", b"png")).await.unwrap_err();
        assert_eq!(*err, ErrorKind::not_found("book", 404));
    }

    #[rstest]
    #[tokio::test]
    async fn test_torrent_needs_a_reader_of_the_book(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await;
        let outsider = fx.reader("Stranger").await;
        let id = book.id.unwrap();

        let err = fx.catalog.attach_torrent(id, outsider, Upload::new("dune.torrent", b"d8")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));

        let torrent = fx.catalog.attach_torrent(id, book.readers[0], Upload::new("dune.torrent", b"d8")).await.unwrap();
        assert_eq!(torrent.file(), "uploads/torrents/dune-herbert-(kozy).torrent");
        assert_eq!(counters(&fx, id).await.torrent, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_additional_file_in_series(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.series_book().await.id.unwrap();
        let file = fx.catalog.attach_additional(book, Upload::new("Dune.PDF", b"%PDF"), None).await.unwrap();
        assert_eq!(
            file,
            Attachment::Additional(AdditionalFile {
                id: file.id(),
                book,
                file: "uploads/extra_files/dune-dune-saga-1-herbert.PDF".to_string(),
                file_type: Some("pdf".to_string()),
            })
        );
        assert_eq!(counters(&fx, book).await.other, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_taken_name_gets_suffix(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        let first = fx.catalog.attach_additional(book, Upload::new("a.txt", b"a"), None).await.unwrap();
        let second = fx.catalog.attach_additional(book, Upload::new("b.txt", b"b"), Some("text".into())).await.unwrap();
        assert_eq!(first.file(), "uploads/extra_files/dune-herbert.txt");
        assert_eq!(second.file(), "uploads/extra_files/dune-herbert_1.txt");
        assert!(matches!(second, Attachment::Additional(AdditionalFile { file_type: Some(ref t), .. }) if t == "text"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_resave_keeps_book_named_image(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await;
        let mut image = fx.attach_image(&book).await;
        fx.catalog.resave_attachment(&mut image).await.unwrap();
        fx.catalog.resave_attachment(&mut image).await.unwrap();
        assert_eq!(image.file(), "uploads/book_images/01-dune-herbert.png");
        assert_eq!(fx.stored(&image).await, image);
    }

    #[rstest]
    #[tokio::test]
    async fn test_resave_renames_foreign_image(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        fx.media.write(Path::new("uploads/book_images/scan.png"), b"png").await.unwrap();
        let mut image = Attachment::Image(BookImage { id: None, book, file: "uploads/book_images/scan.png".into() });
        fx.catalog.repository().save_attachment(&mut image).await.unwrap();

        fx.catalog.resave_attachment(&mut image).await.unwrap();
        // The image counts itself as a sibling.
        assert_eq!(image.file(), "uploads/book_images/02-dune-herbert.png");
        assert_eq!(fx.media.paths().await, [PathBuf::from("uploads/book_images/02-dune-herbert.png")]);
        assert_eq!(fx.stored(&image).await.file(), image.file());
    }

    #[rstest]
    #[tokio::test]
    async fn test_resave_follows_reader_change(#[future] fx: Fixture) {
        let fx = fx.await;
        let mut book = fx.book().await;
        let id = book.id.unwrap();
        let upload = Upload::new("x.torrent", b"d8");
        let mut torrent = fx.catalog.attach_torrent(id, book.readers[0], upload).await.unwrap();

        let second = fx.reader("Levashev").await;
        book.readers.push(second);
        fx.catalog.save_book(&mut book).await.unwrap();
        if let Attachment::Torrent(t) = &mut torrent {
            t.reader = second;
        }
        fx.catalog.resave_attachment(&mut torrent).await.unwrap();
        assert_eq!(torrent.file(), "uploads/torrents/dune-herbert-(levashev).torrent");
        assert_eq!(fx.media.paths().await, [PathBuf::from("uploads/torrents/dune-herbert-(levashev).torrent")]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_resave_unsaved(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        let mut image = Attachment::Image(BookImage { id: None, book, file: "x.png".into() });
        let err = fx.catalog.resave_attachment(&mut image).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        let mut image = Attachment::Image(BookImage { id: Some(AttachmentId(99)), book, file: "x.png".into() });
        let err = fx.catalog.resave_attachment(&mut image).await.unwrap_err();
        assert_eq!(*err, ErrorKind::not_found("attachment", 99));
    }

    #[rstest]
    #[tokio::test]
    async fn test_missing_files(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await;
        let image = fx.attach_image(&book).await;
        assert!(fx.catalog.missing_files(book.id.unwrap()).await.unwrap().is_empty());

        fx.media.delete(Path::new(image.file())).await.unwrap();
        let missing = fx.catalog.missing_files(book.id.unwrap()).await.unwrap();
        assert_eq!(missing, [image]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_missing_files_across_folders(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await;
        let id = book.id.unwrap();
        let image = fx.attach_image(&book).await;
        let track = fx.catalog.attach_audio(id, Upload::new("a.mp3", b"ID3"), 0, None).await.unwrap();
        let notes = fx.catalog.attach_additional(id, Upload::new("notes.pdf", b"%PDF"), None).await.unwrap();
        // A file of the same name in another kind's folder doesn't count.
        fx.media.delete(Path::new(track.file())).await.unwrap();
        fx.media.write(Path::new("uploads/extra_files/01-dune-herbert.mp3"), b"ID3").await.unwrap();
        let mut escaped = Attachment::Image(BookImage { id: None, book: id, file: "../cover.png".into() });
        fx.catalog.repository().save_attachment(&mut escaped).await.unwrap();

        let missing = fx.catalog.missing_files(id).await.unwrap();
        let files: BTreeSet<_> = missing.iter().map(Attachment::file).collect();
        assert_eq!(files, BTreeSet::from([track.file(), "../cover.png"]));
        assert!(!files.contains(image.file()) && !files.contains(notes.file()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_attachment_url(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await;
        let image = fx.attach_image(&book).await;
        let url = fx.catalog.attachment_url(&image).unwrap();
        assert_eq!(url.as_str(), "https://media.test/uploads/book_images/01-dune-herbert.png");
    }

    #[test]
    fn test_stored_name() {
        assert_eq!(stored_name(Path::new("uploads/torrents/a.torrent")), "uploads/torrents/a.torrent");
    }
}

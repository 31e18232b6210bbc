use crate::Catalog;
use crate::error::{ErrorKind, Result};
use async_stream::stream;
use bookland_catalog::models::{Attachment, AttachmentId, AttachmentKind, BookId, BookIdentity};
use bookland_catalog::{Extra, compose};
use futures::Stream;
use std::path::{Path, PathBuf};

/// Progress events emitted by [`Catalog::regenerate_filenames`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete), exactly once, with the
///    number of attachments found.
/// 3. [`Renamed`](Self::Renamed) or [`Unchanged`](Self::Unchanged), once per
///    attachment. Unchanged ones come first.
/// 4. [`Complete`](Self::Complete), exactly once.
///
/// An error terminates the stream early, in which case [`Complete`](Self::Complete)
/// is never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameEvent {
    Started,
    DiscoveryComplete(u64),
    Renamed { kind: AttachmentKind, id: AttachmentId, from: String, to: String },
    Unchanged { kind: AttachmentKind, id: AttachmentId },
    Complete,
}

/// An attachment moved aside to a parking name, waiting for its final one.
struct Parked {
    attachment: Attachment,
    from: String,
    target: PathBuf,
}

enum Staged {
    Unchanged(RenameEvent),
    Parked(Parked),
}

impl Catalog {
    /// Rename every attachment of `book` after its current slug, cycle and
    /// authors.
    ///
    /// Unlike a regular save, every kind is renamed, and audio tracks and
    /// images are numbered by position (tracks in play order) rather than by
    /// count. The book stays locked until the stream ends or is dropped.
    ///
    /// Files are moved in two passes: every file that changes name is first
    /// parked under a name no target can take, then moved to its target. Two
    /// tracks that swap places end up with each other's names instead of a
    /// `_1` suffix. A failure in between leaves files parked, with their rows
    /// pointing at them; running the regeneration again finishes the job.
    pub fn regenerate_filenames(&self, book: BookId) -> impl Stream<Item = Result<RenameEvent>> + '_ {
        stream!({
            yield Ok(RenameEvent::Started);
            let _guard = self.locks.lock(book).await;

            let (identity, attachments) = match self.discover(book).await {
                Ok(found) => found,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            yield Ok(RenameEvent::DiscoveryComplete(u64::try_from(attachments.len()).unwrap_or(u64::MAX)));

            let mut parked = Vec::new();
            for (position, extra, attachment) in attachments {
                match self.park(&identity, attachment, position, &extra).await {
                    Ok(Staged::Unchanged(event)) => yield Ok(event),
                    Ok(Staged::Parked(file)) => parked.push(file),
                    Err(e) => {
                        yield Err(e);
                        return;
                    },
                }
            }
            for file in parked {
                let result = self.unpark(file).await;
                let failed = result.is_err();
                yield result;
                if failed {
                    return;
                }
            }
            tracing::info!(%book, "Regenerated file names");
            yield Ok(RenameEvent::Complete);
        })
    }

    /// The book's naming inputs, and its attachments with their position
    /// among their kind and the extra inputs their names need.
    async fn discover(&self, book: BookId) -> Result<(BookIdentity, Vec<(u64, Extra, Attachment)>)> {
        let identity = self.identity(&self.load_book(book).await?).await?;
        let mut found = Vec::new();
        for kind in AttachmentKind::ALL {
            let attachments = self.repo.list_attachments(book, kind).await.map_err(ErrorKind::datastore)?;
            for (position, attachment) in (0..).zip(attachments) {
                let extra = match &attachment {
                    Attachment::Torrent(torrent) => {
                        let reader = self.repo.get_reader(torrent.reader).await.map_err(ErrorKind::datastore)?;
                        reader.map(|r| Extra::reader(r.slug)).unwrap_or_default()
                    },
                    _ => Extra::default(),
                };
                found.push((position, extra, attachment));
            }
        }
        Ok((identity, found))
    }

    /// Work out the attachment's new name and, when it differs, move the file
    /// out of the way under a parking name.
    async fn park(
        &self,
        identity: &BookIdentity,
        mut attachment: Attachment,
        position: u64,
        extra: &Extra,
    ) -> Result<Staged> {
        let (kind, id) = (attachment.kind(), attachment.id().unwrap_or(AttachmentId(0)));
        let target = Path::new(kind.upload_prefix()).join(compose(identity, kind, attachment.file(), extra, position));
        if Path::new(attachment.file()) == target.as_path() {
            return Ok(Staged::Unchanged(RenameEvent::Unchanged { kind, id }));
        }
        let from = attachment.file().to_string();
        let parked = self.move_blob(&from, &parking_path(&target, id)).await?;
        attachment.set_file(parked);
        self.repo.save_attachment(&mut attachment).await.map_err(ErrorKind::datastore)?;
        Ok(Staged::Parked(Parked { attachment, from, target }))
    }

    async fn unpark(&self, parked: Parked) -> Result<RenameEvent> {
        let Parked { mut attachment, from, target } = parked;
        let (kind, id) = (attachment.kind(), attachment.id().unwrap_or(AttachmentId(0)));
        let to = self.move_blob(attachment.file(), &target).await?;
        attachment.set_file(to.clone());
        self.repo.save_attachment(&mut attachment).await.map_err(ErrorKind::datastore)?;
        tracing::debug!(%kind, %id, %from, %to, "Renamed attachment");
        Ok(RenameEvent::Renamed { kind, id, from, to })
    }
}

/// `target` with a leading `.{id}-` on its file name. Generated names never
/// start with a dot.
fn parking_path(target: &Path, id: AttachmentId) -> PathBuf {
    let name = target.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    target.with_file_name(format!(".{id}-{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Upload;
    use crate::testing::{Fixture, fx};
    use bookland_catalog::models::Author;
    use bookland_storage::StorageBackend;
    use futures::{StreamExt, TryStreamExt};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn test_nothing_to_rename(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await;
        let image = fx.attach_image(&book).await;
        let events: Vec<_> = fx.catalog.regenerate_filenames(book.id.unwrap()).try_collect().await.unwrap();
        assert_eq!(
            events,
            [
                RenameEvent::Started,
                RenameEvent::DiscoveryComplete(1),
                RenameEvent::Unchanged { kind: AttachmentKind::Image, id: image.id().unwrap() },
                RenameEvent::Complete,
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_names_follow_new_authors(#[future] fx: Fixture) {
        let fx = fx.await;
        let mut book = fx.book().await;
        let id = book.id.unwrap();
        fx.catalog.attach_audio(id, Upload::new("a.mp3", b"a"), 0, None).await.unwrap();
        fx.catalog.attach_audio(id, Upload::new("b.mp3", b"b"), 0, None).await.unwrap();
        fx.catalog.attach_torrent(id, book.readers[0], Upload::new("t.torrent", b"d8")).await.unwrap();

        let mut coauthor = Author::new("Anderson", "Kevin");
        book.authors.push(fx.catalog.save_author(&mut coauthor).await.unwrap());
        fx.catalog.save_book(&mut book).await.unwrap();

        let events: Vec<_> = fx.catalog.regenerate_filenames(id).try_collect().await.unwrap();
        assert_eq!(events[1], RenameEvent::DiscoveryComplete(3));
        let renamed = events.iter().filter(|e| matches!(e, RenameEvent::Renamed { .. })).count();
        assert_eq!(renamed, 3);
        assert_eq!(events.last(), Some(&RenameEvent::Complete));
        assert_eq!(
            fx.media.paths().await,
            [
                PathBuf::from("uploads/audio_files/01-dune-herbert-anderson_kevin.mp3"),
                PathBuf::from("uploads/audio_files/02-dune-herbert-anderson_kevin.mp3"),
                PathBuf::from("uploads/torrents/dune-herbert-anderson_kevin-(kozy).torrent"),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_gaps_are_closed(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        let first = fx.catalog.attach_audio(book, Upload::new("a.mp3", b"a"), 0, None).await.unwrap();
        fx.catalog.attach_audio(book, Upload::new("b.mp3", b"b"), 0, None).await.unwrap();
        fx.catalog.delete_attachment(AttachmentKind::Audio, first.id().unwrap()).await.unwrap();

        let events: Vec<_> = fx.catalog.regenerate_filenames(book).try_collect().await.unwrap();
        assert!(events.contains(&RenameEvent::Renamed {
            kind: AttachmentKind::Audio,
            id: AttachmentId(2),
            from: "uploads/audio_files/02-dune-herbert.mp3".to_string(),
            to: "uploads/audio_files/01-dune-herbert.mp3".to_string(),
        }));
        let stored = fx.catalog.repository().list_attachments(book, AttachmentKind::Audio).await.unwrap();
        assert_eq!(stored[0].file(), "uploads/audio_files/01-dune-herbert.mp3");
    }

    #[rstest]
    #[tokio::test]
    async fn test_unknown_book_fails_discovery(#[future] fx: Fixture) {
        let fx = fx.await;
        let events: Vec<_> = fx.catalog.regenerate_filenames(BookId(404)).collect::<Vec<_>>().await;
        assert!(matches!(events[0], Ok(RenameEvent::Started)));
        assert_eq!(events.len(), 2);
        let err = events[1].as_ref().unwrap_err();
        assert_eq!(**err, ErrorKind::not_found("book", 404));
    }

    #[rstest]
    #[tokio::test]
    async fn test_swapped_tracks_trade_names(#[future] fx: Fixture) {
        let fx = fx.await;
        let book = fx.book().await.id.unwrap();
        let mut first = fx.catalog.attach_audio(book, Upload::new("a.mp3", b"a"), 0, None).await.unwrap();
        let mut second = fx.catalog.attach_audio(book, Upload::new("b.mp3", b"b"), 0, None).await.unwrap();
        for (track, order) in [(&mut first, 2), (&mut second, 1)] {
            if let Attachment::Audio(audio) = track {
                audio.order = order;
            }
            fx.catalog.repository().save_attachment(track).await.unwrap();
        }

        let events: Vec<_> = fx.catalog.regenerate_filenames(book).try_collect().await.unwrap();
        assert_eq!(
            events[2..4],
            [
                RenameEvent::Renamed {
                    kind: AttachmentKind::Audio,
                    id: second.id().unwrap(),
                    from: "uploads/audio_files/02-dune-herbert.mp3".to_string(),
                    to: "uploads/audio_files/01-dune-herbert.mp3".to_string(),
                },
                RenameEvent::Renamed {
                    kind: AttachmentKind::Audio,
                    id: first.id().unwrap(),
                    from: "uploads/audio_files/01-dune-herbert.mp3".to_string(),
                    to: "uploads/audio_files/02-dune-herbert.mp3".to_string(),
                },
            ]
        );
        assert_eq!(
            fx.media.paths().await,
            [
                PathBuf::from("uploads/audio_files/01-dune-herbert.mp3"),
                PathBuf::from("uploads/audio_files/02-dune-herbert.mp3"),
            ]
        );
        assert_eq!(fx.media.read(Path::new("uploads/audio_files/01-dune-herbert.mp3")).await.unwrap(), b"b");
        assert_eq!(fx.stored(&first).await.file(), "uploads/audio_files/02-dune-herbert.mp3");
    }

    #[test]
    fn test_parking_path() {
        let parked = parking_path(Path::new("uploads/audio_files/01-dune-herbert.mp3"), AttachmentId(7));
        assert_eq!(parked, Path::new("uploads/audio_files/.7-01-dune-herbert.mp3"));
    }
}

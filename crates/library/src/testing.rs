//! Shared test setup: an in-memory catalog over a mock media backend.

use crate::attachments::Upload;
use crate::{Catalog, Settings};
use bookland_catalog::models::{Attachment, Author, Book, Category, Cycle, Reader, ReaderId, Subcategory, WorkType};
use bookland_db::{Database, Repository};
use bookland_storage::BackendHandle;
use bookland_storage::backend::MockBackend;
use rstest::fixture;
use std::sync::Arc;

pub(crate) struct Fixture {
    pub(crate) catalog: Catalog,
    pub(crate) media: Arc<MockBackend>,
}

#[fixture]
pub(crate) async fn fx() -> Fixture {
    let db = Database::connect_in_memory().await.unwrap();
    let media = Arc::new(MockBackend::default());
    let handle: BackendHandle = media.clone();
    Fixture { catalog: Catalog::new(Repository::from(&db), handle, Settings::default()), media }
}

impl Fixture {
    /// "Dune" by Herbert, read by Kozy.
    pub(crate) async fn book(&self) -> Book {
        let mut category = Category::new("Фантастика");
        let category = self.catalog.save_category(&mut category).await.unwrap();
        let mut subcategory = Subcategory::new(category, "Космос");
        let subcategory = self.catalog.save_subcategory(&mut subcategory).await.unwrap();
        let mut author = Author::new("Herbert", "");
        let author = self.catalog.save_author(&mut author).await.unwrap();
        let reader = self.reader("Kozy").await;

        let mut book = Book::new("Dune");
        book.subcategories = vec![subcategory];
        book.authors = vec![author];
        book.readers = vec![reader];
        self.catalog.save_book(&mut book).await.unwrap();
        book
    }

    /// [`book`](Self::book) as the first part of the "dune-saga" cycle.
    pub(crate) async fn series_book(&self) -> Book {
        let mut book = self.book().await;
        let mut cycle = Cycle::new("Хроники Дюны");
        cycle.slug = "dune-saga".to_string();
        book.work_type = WorkType::Cycle;
        book.cycle = Some(self.catalog.save_cycle(&mut cycle).await.unwrap());
        book.cycle_number = Some("1".to_string());
        self.catalog.save_book(&mut book).await.unwrap();
        book
    }

    pub(crate) async fn reader(&self, surname: &str) -> ReaderId {
        let mut reader = Reader::new(surname, "");
        self.catalog.save_reader(&mut reader).await.unwrap()
    }

    pub(crate) async fn attach_image(&self, book: &Book) -> Attachment {
        self.catalog.attach_image(book.id.unwrap(), Upload::new("cover.png", b"png")).await.unwrap()
    }

    pub(crate) async fn stored(&self, attachment: &Attachment) -> Attachment {
        let (kind, id) = (attachment.kind(), attachment.id().unwrap());
        self.catalog.repository().get_attachment(kind, id).await.unwrap().unwrap()
    }
}

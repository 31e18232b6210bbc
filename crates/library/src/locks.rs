use bookland_catalog::models::BookId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per book.
///
/// Holding a book's guard is what makes "count the siblings, pick a name,
/// insert, recount" atomic with respect to other writers of the same book.
/// Entries nobody holds or waits on are dropped on the next [`lock`](Self::lock),
/// so the map only grows with the number of books busy at once.
#[derive(Debug, Default)]
pub(crate) struct BookLocks {
    books: Mutex<HashMap<BookId, Arc<Mutex<()>>>>,
}

impl BookLocks {
    pub(crate) async fn lock(&self, book: BookId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut books = self.books.lock().await;
            // Clones are only handed out under the map lock, so a count of one
            // means no guard or waiter exists for that book.
            books.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(books.entry(book).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the entry of a deleted book. A guard still held elsewhere stays valid.
    pub(crate) async fn forget(&self, book: BookId) {
        self.books.lock().await.remove(&book);
    }
}

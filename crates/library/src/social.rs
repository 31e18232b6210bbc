//! Social media cross-posts and reader ratings.

use crate::Catalog;
use crate::error::{ErrorKind, Result};
use bookland_catalog::models::{BookId, BookRating, LinkId, PlatformId, RatingId, SocialMediaLink, SocialMediaPlatform};
use tracing::instrument;

impl Catalog {
    #[instrument(skip_all, fields(name = %platform.name))]
    pub async fn save_platform(&self, platform: &mut SocialMediaPlatform) -> Result<PlatformId> {
        platform.validate().map_err(ErrorKind::catalog)?;
        self.repo.save_platform(platform).await.map_err(ErrorKind::datastore)
    }

    pub async fn platforms(&self) -> Result<Vec<SocialMediaPlatform>> {
        self.repo.list_platforms().await.map_err(ErrorKind::datastore)
    }

    /// Delete a platform along with every link posted on it.
    pub async fn delete_platform(&self, id: PlatformId) -> Result<bool> {
        self.repo.delete_platform(id).await.map_err(ErrorKind::datastore)
    }

    /// Record a post announcing a book.
    #[instrument(skip_all, fields(book = %link.book, url = %link.url))]
    pub async fn add_social_link(&self, link: &mut SocialMediaLink) -> Result<LinkId> {
        link.validate().map_err(ErrorKind::catalog)?;
        self.repo.save_social_link(link).await.map_err(ErrorKind::datastore)
    }

    /// Links of `book`, most recent post first.
    pub async fn social_links(&self, book: BookId) -> Result<Vec<SocialMediaLink>> {
        self.repo.list_social_links(book).await.map_err(ErrorKind::datastore)
    }

    pub async fn delete_social_link(&self, id: LinkId) -> Result<bool> {
        self.repo.delete_social_link(id).await.map_err(ErrorKind::datastore)
    }

    /// Save a user's rating of a book. Each user rates a book once; saving the
    /// returned rating again updates it.
    #[instrument(skip_all, fields(user = %rating.user, book = %rating.book))]
    pub async fn rate_book(&self, rating: &mut BookRating) -> Result<RatingId> {
        rating.validate().map_err(ErrorKind::catalog)?;
        self.repo.save_rating(rating).await.map_err(ErrorKind::datastore)
    }

    /// Mean overall score of `book`, ignoring ratings that left it unscored.
    pub async fn average_rating(&self, book: BookId) -> Result<Option<f64>> {
        self.repo.average_rating(book).await.map_err(ErrorKind::datastore)
    }
}

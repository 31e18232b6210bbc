use super::Repository;
use crate::error::{ErrorKind, Result, write_error};
use crate::models::{LinkRow, PlatformRow, RatingRow, timestamp};
use bookland_catalog::models::{
    BookId, BookRating, LinkId, PlatformId, RatingId, SocialMediaLink, SocialMediaPlatform, UserId,
};
use exn::ResultExt;
use time::UtcDateTime;

impl Repository {
    // =========================================================================
    // Social media
    // =========================================================================

    /// Insert or update a platform. Platform names are unique.
    pub async fn save_platform(&self, platform: &mut SocialMediaPlatform) -> Result<PlatformId> {
        let id: i64 = sqlx::query_scalar(include_str!("../../queries/save_platform.sql"))
            .bind(platform.id.map(|id| id.0))
            .bind(&platform.name)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error("platform name"))?;
        platform.id = Some(PlatformId(id));
        Ok(PlatformId(id))
    }

    /// All platforms, by name.
    pub async fn list_platforms(&self) -> Result<Vec<SocialMediaPlatform>> {
        let rows: Vec<PlatformRow> = sqlx::query_as(include_str!("../../queries/list_platforms.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(SocialMediaPlatform::from).collect())
    }

    /// Delete a platform together with every link posted to it.
    pub async fn delete_platform(&self, id: PlatformId) -> Result<bool> {
        let result = sqlx::query(include_str!("../../queries/delete_platform.sql"))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(write_error("platform"))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn save_social_link(&self, link: &mut SocialMediaLink) -> Result<LinkId> {
        let row = LinkRow::from(&*link);
        let id: i64 = sqlx::query_scalar(include_str!("../../queries/save_social_link.sql"))
            .bind(row.id)
            .bind(row.book_id)
            .bind(row.platform_id)
            .bind(row.url)
            .bind(row.description)
            .bind(row.post_date)
            .bind(row.video_url)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error("social media link"))?;
        link.id = Some(LinkId(id));
        Ok(LinkId(id))
    }

    /// Links announcing `book`, most recent post first.
    pub async fn list_social_links(&self, book: BookId) -> Result<Vec<SocialMediaLink>> {
        let rows: Vec<LinkRow> = sqlx::query_as(include_str!("../../queries/list_social_links.sql"))
            .bind(book.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(SocialMediaLink::try_from).collect()
    }

    pub async fn delete_social_link(&self, id: LinkId) -> Result<bool> {
        let result = sqlx::query(include_str!("../../queries/delete_social_link.sql"))
            .bind(id.0)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Ratings
    // =========================================================================

    /// Insert or update a rating, writing the generated id and creation date back.
    ///
    /// Returns [`ErrorKind::Conflict`] when inserting a second rating of the
    /// same book by the same user.
    pub async fn save_rating(&self, rating: &mut BookRating) -> Result<RatingId> {
        let created_at = rating.created_at.unwrap_or_else(UtcDateTime::now);
        let (id, created_at): (i64, i64) = sqlx::query_as(include_str!("../../queries/save_rating.sql"))
            .bind(rating.id.map(|id| id.0))
            .bind(rating.user.0)
            .bind(rating.book.0)
            .bind(i64::from(rating.overall))
            .bind(i64::from(rating.narration))
            .bind(i64::from(rating.quality))
            .bind(i64::from(rating.plot))
            .bind(rating.length_feedback.as_str())
            .bind(rating.would_recommend)
            .bind(created_at.unix_timestamp())
            .fetch_one(&self.pool)
            .await
            .map_err(write_error("rating"))?;
        rating.id = Some(RatingId(id));
        rating.created_at = Some(timestamp(created_at, "rating date")?);
        Ok(RatingId(id))
    }

    /// The rating `user` gave `book`, if any.
    pub async fn get_rating(&self, user: UserId, book: BookId) -> Result<Option<BookRating>> {
        let row: Option<RatingRow> = sqlx::query_as(include_str!("../../queries/get_rating.sql"))
            .bind(user.0)
            .bind(book.0)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(BookRating::try_from).transpose()
    }

    /// Ratings of `book`, newest first.
    pub async fn list_ratings(&self, book: BookId) -> Result<Vec<BookRating>> {
        let rows: Vec<RatingRow> = sqlx::query_as(include_str!("../../queries/list_ratings.sql"))
            .bind(book.0)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(BookRating::try_from).collect()
    }

    /// Mean overall score of `book` across the ratings that scored it.
    pub async fn average_rating(&self, book: BookId) -> Result<Option<f64>> {
        sqlx::query_scalar(include_str!("../../queries/average_rating.sql"))
            .bind(book.0)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }
}

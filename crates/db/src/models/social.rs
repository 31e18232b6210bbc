use super::timestamp;
use crate::error::{Error, ErrorKind, Result};
use bookland_catalog::models::{
    BookId, BookRating, LengthFeedback, LinkId, PlatformId, RatingId, SocialMediaLink, SocialMediaPlatform, UserId,
};
use exn::ResultExt;
use time::Date;

#[derive(sqlx::FromRow)]
pub(crate) struct PlatformRow {
    pub id: i64,
    pub name: String,
}
impl From<PlatformRow> for SocialMediaPlatform {
    fn from(row: PlatformRow) -> Self {
        Self { id: Some(PlatformId(row.id)), name: row.name }
    }
}

/// Post dates are stored as the unix timestamp of midnight UTC.
#[derive(sqlx::FromRow)]
pub(crate) struct LinkRow {
    pub id: Option<i64>,
    pub book_id: i64,
    pub platform_id: i64,
    pub url: String,
    pub description: String,
    pub post_date: Option<i64>,
    pub video_url: Option<String>,
}
impl From<&SocialMediaLink> for LinkRow {
    fn from(link: &SocialMediaLink) -> Self {
        Self {
            id: link.id.map(|id| id.0),
            book_id: link.book.0,
            platform_id: link.platform.0,
            url: link.url.clone(),
            description: link.description.clone(),
            post_date: link.post_date.map(|date| date.midnight().assume_utc().unix_timestamp()),
            video_url: link.video_url.clone(),
        }
    }
}
impl TryFrom<LinkRow> for SocialMediaLink {
    type Error = Error;
    fn try_from(row: LinkRow) -> Result<Self> {
        let post_date: Option<Date> =
            row.post_date.map(|ts| timestamp(ts, "post date").map(|dt| dt.date())).transpose()?;
        Ok(Self {
            id: row.id.map(LinkId),
            book: BookId(row.book_id),
            platform: PlatformId(row.platform_id),
            url: row.url,
            description: row.description,
            post_date,
            video_url: row.video_url,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RatingRow {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub overall_score: i64,
    pub narration_score: i64,
    pub quality_score: i64,
    pub plot_score: i64,
    pub length_feedback: String,
    pub would_recommend: bool,
    pub created_at: i64,
}
impl TryFrom<RatingRow> for BookRating {
    type Error = Error;
    fn try_from(row: RatingRow) -> Result<Self> {
        let score = |value: i64| u8::try_from(value).or_raise(|| ErrorKind::InvalidData("score"));
        Ok(Self {
            id: Some(RatingId(row.id)),
            user: UserId(row.user_id),
            book: BookId(row.book_id),
            overall: score(row.overall_score)?,
            narration: score(row.narration_score)?,
            quality: score(row.quality_score)?,
            plot: score(row.plot_score)?,
            length_feedback: row
                .length_feedback
                .parse::<LengthFeedback>()
                .or_raise(|| ErrorKind::InvalidData("length feedback"))?,
            would_recommend: row.would_recommend,
            created_at: Some(timestamp(row.created_at, "rating date")?),
        })
    }
}

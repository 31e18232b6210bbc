use super::{BookId, RatingId, UserId};
use crate::error::{Error, ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use time::UtcDateTime;

/// Listener's opinion on the length of a book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthFeedback {
    TooShort,
    #[default]
    Perfect,
    TooLong,
}
impl LengthFeedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::Perfect => "perfect",
            Self::TooLong => "too_long",
        }
    }
}
impl FromStr for LengthFeedback {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "too_short" => Self::TooShort,
            "perfect" => Self::Perfect,
            "too_long" => Self::TooLong,
            _ => exn::bail!(ErrorKind::validation(format!("unknown length feedback: {s}"))),
        })
    }
}
impl Display for LengthFeedback {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// One user's rating of one book. A user rates each book at most once.
///
/// Scores go from 1 to 5; `0` means the criterion was left unscored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRating {
    pub id: Option<RatingId>,
    pub user: UserId,
    pub book: BookId,
    pub overall: u8,
    pub narration: u8,
    pub quality: u8,
    pub plot: u8,
    pub length_feedback: LengthFeedback,
    pub would_recommend: bool,
    pub created_at: Option<UtcDateTime>,
}
impl BookRating {
    pub const MAX_SCORE: u8 = 5;

    pub fn new(user: UserId, book: BookId) -> Self {
        Self {
            id: None,
            user,
            book,
            overall: 0,
            narration: 0,
            quality: 0,
            plot: 0,
            length_feedback: LengthFeedback::default(),
            would_recommend: false,
            created_at: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let scores = [
            ("overall", self.overall),
            ("narration", self.narration),
            ("quality", self.quality),
            ("plot", self.plot),
        ];
        for (field, score) in scores {
            if score > Self::MAX_SCORE {
                exn::bail!(ErrorKind::validation(format!(
                    "{field} score must be between 0 and {} (got {score})",
                    Self::MAX_SCORE
                )));
            }
        }
        Ok(())
    }

    /// Mean overall score across ratings that scored it, if any did.
    pub fn average<'a>(ratings: impl IntoIterator<Item = &'a BookRating>) -> Option<f64> {
        let (sum, count) = ratings
            .into_iter()
            .filter(|r| r.overall > 0)
            .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r.overall), count + 1));
        (count > 0).then(|| sum as f64 / count as f64)
    }
}

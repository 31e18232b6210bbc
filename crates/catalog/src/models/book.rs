use super::{
    AttachmentKind, Author, AuthorId, BookId, Cycle, CycleId, ReaderId, SubcategoryId, check_len, check_present,
};
use crate::error::{Error, ErrorKind, Result};
use crate::slug::{Collection, SlugPolicy, Sluggable};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;
use time::UtcDateTime;

/// Literary form of a book. Only [`WorkType::Cycle`] may carry series linkage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WorkType {
    ShortStory,
    Story,
    #[default]
    Novel,
    Cycle,
    Poem,
}
impl WorkType {
    pub const ALL: [WorkType; 5] = [Self::ShortStory, Self::Story, Self::Novel, Self::Cycle, Self::Poem];

    /// Stored tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortStory => "short-story",
            Self::Story => "story",
            Self::Novel => "novel",
            Self::Cycle => "cycle",
            Self::Poem => "poem",
        }
    }
}
impl FromStr for WorkType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s.trim())
            .ok_or_else(|| Error::from(ErrorKind::validation(format!("unknown work type: {s}"))))
    }
}
impl Display for WorkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Derived per-book attachment totals.
///
/// Never edited directly; see [`recompute_counters`](crate::recompute_counters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub torrent: u64,
    pub audio: u64,
    pub image: u64,
    /// Supplementary (additional) files.
    pub other: u64,
}
impl Counters {
    pub fn get(&self, kind: AttachmentKind) -> u64 {
        match kind {
            AttachmentKind::Audio => self.audio,
            AttachmentKind::Image => self.image,
            AttachmentKind::Torrent => self.torrent,
            AttachmentKind::Additional => self.other,
        }
    }

    pub fn total(&self) -> u64 {
        self.torrent + self.audio + self.image + self.other
    }
}

/// An audiobook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Option<BookId>,
    pub title: String,
    /// Assigned on first save and kept afterwards.
    pub slug: String,
    pub subcategories: Vec<SubcategoryId>,
    pub work_type: WorkType,
    pub cycle: Option<CycleId>,
    /// Position within the cycle, free text ("1", "2a", "II").
    pub cycle_number: Option<String>,
    /// In insertion order; the order shows up in attachment filenames.
    pub authors: Vec<AuthorId>,
    pub readers: Vec<ReaderId>,
    pub year: Option<i32>,
    pub duration: Option<Duration>,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: Option<UtcDateTime>,
    pub updated_at: Option<UtcDateTime>,
    pub counters: Counters,
}
impl Book {
    pub const TITLE_MAX_LEN: usize = 200;
    pub const CYCLE_NUMBER_MAX_LEN: usize = 10;
    pub const EARLIEST_YEAR: i32 = 1800;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            slug: String::new(),
            subcategories: Vec::new(),
            work_type: WorkType::default(),
            cycle: None,
            cycle_number: None,
            authors: Vec::new(),
            readers: Vec::new(),
            year: None,
            duration: None,
            description: None,
            is_published: true,
            created_at: None,
            updated_at: None,
            counters: Counters::default(),
        }
    }

    /// Drops the cycle link and position unless the book is a [`WorkType::Cycle`].
    pub fn normalize_series(&mut self) {
        if self.work_type != WorkType::Cycle {
            self.cycle = None;
            self.cycle_number = None;
        }
    }

    /// Field-level validation performed before every save.
    pub fn validate(&self) -> Result<()> {
        check_present("title", &self.title)?;
        check_len("title", &self.title, Self::TITLE_MAX_LEN)?;
        check_len("slug", &self.slug, <Self as Sluggable>::MAX_LEN)?;
        if let Some(number) = &self.cycle_number {
            check_len("cycle number", number, Self::CYCLE_NUMBER_MAX_LEN)?;
        }
        if let Some(year) = self.year {
            let current = UtcDateTime::now().year();
            if !(Self::EARLIEST_YEAR..=current).contains(&year) {
                exn::bail!(ErrorKind::validation(format!(
                    "year must be between {} and {current} (got {year})",
                    Self::EARLIEST_YEAR
                )));
            }
        }
        Ok(())
    }

    /// Duration rendered as `HH:MM:SS`.
    pub fn formatted_duration(&self) -> Option<String> {
        let seconds = self.duration?.as_secs();
        let (hours, remainder) = (seconds / 3600, seconds % 3600);
        let (minutes, seconds) = (remainder / 60, remainder % 60);
        Some(format!("{hours:02}:{minutes:02}:{seconds:02}"))
    }
}
impl Sluggable for Book {
    const COLLECTION: Collection = Collection::Books;
    const POLICY: SlugPolicy = SlugPolicy::ProbeOnce;
    const MAX_LEN: usize = 120;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }

    fn slug_source(&self) -> Result<String> {
        check_present("title", &self.title)?;
        Ok(self.title.clone())
    }
}

/// Position of a book within its cycle, as it appears in filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPosition {
    pub cycle_slug: String,
    pub number: Option<String>,
}

/// Everything needed to name a book's attachments, with relations resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookIdentity {
    pub id: BookId,
    pub slug: String,
    /// Present only for [`WorkType::Cycle`] books linked to a cycle.
    pub series: Option<SeriesPosition>,
    pub author_slugs: Vec<String>,
}
impl BookIdentity {
    /// Builds the identity of a saved book from its resolved relations.
    ///
    /// `authors` must be in the book's insertion order.
    pub fn resolve(book: &Book, cycle: Option<&Cycle>, authors: &[Author]) -> Result<Self> {
        let id = book.id.ok_or_else(|| Error::from(ErrorKind::validation("book must be saved before naming files")))?;
        let series = match (book.work_type, cycle) {
            (WorkType::Cycle, Some(cycle)) => Some(SeriesPosition {
                cycle_slug: cycle.slug.clone(),
                number: book.cycle_number.clone(),
            }),
            _ => None,
        };
        Ok(Self {
            id,
            slug: book.slug.clone(),
            series,
            author_slugs: authors.iter().map(|a| a.slug.clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("short-story", WorkType::ShortStory)]
    #[case("story", WorkType::Story)]
    #[case("novel", WorkType::Novel)]
    #[case(" cycle ", WorkType::Cycle)]
    #[case("poem", WorkType::Poem)]
    fn test_parse_work_type(#[case] input: &str, #[case] expected: WorkType) {
        let parsed: WorkType = input.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), input.trim());
    }

    #[test]
    fn test_unknown_work_type() {
        assert!(matches!(&*"epic".parse::<WorkType>().unwrap_err(), ErrorKind::Validation(_)));
    }

    #[rstest]
    #[case(WorkType::Novel, None, None)]
    #[case(WorkType::Poem, None, None)]
    #[case(WorkType::Cycle, Some(CycleId(7)), Some("3".to_string()))]
    fn test_normalize_series(
        #[case] work_type: WorkType,
        #[case] cycle: Option<CycleId>,
        #[case] number: Option<String>,
    ) {
        let mut book = Book::new("Title");
        book.work_type = work_type;
        book.cycle = Some(CycleId(7));
        book.cycle_number = Some("3".to_string());
        book.normalize_series();
        assert_eq!(book.cycle, cycle);
        assert_eq!(book.cycle_number, number);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(Duration::from_secs(59)), Some("00:00:59"))]
    #[case(Some(Duration::from_secs(3 * 3600 + 25 * 60 + 7)), Some("03:25:07"))]
    #[case(Some(Duration::from_secs(125 * 3600)), Some("125:00:00"))]
    fn test_formatted_duration(#[case] duration: Option<Duration>, #[case] expected: Option<&str>) {
        let mut book = Book::new("Title");
        book.duration = duration;
        assert_eq!(book.formatted_duration().as_deref(), expected);
    }

    #[rstest]
    #[case(Some(1799), false)]
    #[case(Some(1800), true)]
    #[case(Some(1965), true)]
    #[case(Some(9999), false)]
    #[case(None, true)]
    fn test_validate_year(#[case] year: Option<i32>, #[case] valid: bool) {
        let mut book = Book::new("Title");
        book.year = year;
        assert_eq!(book.validate().is_ok(), valid);
    }

    #[test]
    fn test_validate_cycle_number_length() {
        let mut book = Book::new("Title");
        book.cycle_number = Some("12345678901".to_string());
        assert!(book.validate().is_err());
    }

    #[test]
    fn test_identity_drops_series_for_non_cycle_books() {
        let mut cycle = Cycle::new("Дюна");
        cycle.slug = "dyuna".to_string();
        let mut book = Book::new("Dune");
        book.id = Some(BookId(1));
        book.slug = "dune".to_string();
        book.cycle_number = Some("1".to_string());

        let identity = BookIdentity::resolve(&book, Some(&cycle), &[]).unwrap();
        assert_eq!(identity.series, None);

        book.work_type = WorkType::Cycle;
        let identity = BookIdentity::resolve(&book, Some(&cycle), &[]).unwrap();
        assert_eq!(identity.series.unwrap().cycle_slug, "dyuna");
    }

    #[test]
    fn test_identity_requires_saved_book() {
        let book = Book::new("Dune");
        assert!(BookIdentity::resolve(&book, None, &[]).is_err());
    }
}

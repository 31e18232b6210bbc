use super::{AuthorId, ReaderId, check_len};
use crate::error::{ErrorKind, Result};
use crate::slug::{Collection, SlugPolicy, Sluggable};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Name parts shared by authors and readers.
///
/// At least one of `surname_nick` and `name` must be filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    /// Surname, or the nickname of someone known by one.
    pub surname_nick: String,
    pub name: String,
    pub patronymic: String,
}
impl PersonName {
    pub const PART_MAX_LEN: usize = 60;

    pub fn new(surname_nick: impl Into<String>, name: impl Into<String>) -> Self {
        Self { surname_nick: surname_nick.into(), name: name.into(), patronymic: String::new() }
    }

    pub fn with_patronymic(mut self, patronymic: impl Into<String>) -> Self {
        self.patronymic = patronymic.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.surname_nick.trim().is_empty() && self.name.trim().is_empty() {
            exn::bail!(ErrorKind::validation("at least one of surname (nick) or name must be filled in"));
        }
        check_len("surname (nick)", &self.surname_nick, Self::PART_MAX_LEN)?;
        check_len("name", &self.name, Self::PART_MAX_LEN)?;
        check_len("patronymic", &self.patronymic, Self::PART_MAX_LEN)
    }

    /// `"{surname_nick} {name}"`, trimmed. The patronymic never takes part.
    fn slug_source(&self) -> Result<String> {
        self.validate()?;
        Ok(format!("{} {}", self.surname_nick.trim(), self.name.trim()).trim().to_string())
    }
}
impl Display for PersonName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let full = format!("{} {} {}", self.surname_nick, self.name, self.patronymic);
        write!(f, "{}", full.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

macro_rules! person {
    ($(#[$meta:meta])* $ty:ident, $id:ident, $collection:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $ty {
            pub id: Option<$id>,
            pub person: PersonName,
            pub slug: String,
            pub description: Option<String>,
        }
        impl $ty {
            pub fn new(surname_nick: impl Into<String>, name: impl Into<String>) -> Self {
                Self::from(PersonName::new(surname_nick, name))
            }

            pub fn validate(&self) -> Result<()> {
                self.person.validate()
            }
        }
        impl From<PersonName> for $ty {
            fn from(person: PersonName) -> Self {
                Self { id: None, person, slug: String::new(), description: None }
            }
        }
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                Display::fmt(&self.person, f)
            }
        }
        impl Sluggable for $ty {
            const COLLECTION: Collection = $collection;
            const POLICY: SlugPolicy = SlugPolicy::RecomputeAlways;
            const MAX_LEN: usize = 60;

            fn slug(&self) -> &str {
                &self.slug
            }

            fn set_slug(&mut self, slug: String) {
                self.slug = slug;
            }

            fn slug_source(&self) -> Result<String> {
                self.person.slug_source()
            }
        }
    };
}

person!(
    /// A writer credited on books.
    Author,
    AuthorId,
    Collection::Authors
);
person!(
    /// A narrator credited on books and their torrent releases.
    Reader,
    ReaderId,
    Collection::Readers
);

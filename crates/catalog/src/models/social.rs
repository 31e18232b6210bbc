use super::{BookId, LinkId, PlatformId, check_len, check_present};
use crate::error::{ErrorKind, Result};
use time::Date;

/// A social network books get cross-posted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialMediaPlatform {
    pub id: Option<PlatformId>,
    pub name: String,
}
impl SocialMediaPlatform {
    pub const NAME_MAX_LEN: usize = 50;

    pub fn new(name: impl Into<String>) -> Self {
        Self { id: None, name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        check_present("platform name", &self.name)?;
        check_len("platform name", &self.name, Self::NAME_MAX_LEN)
    }
}

/// A post announcing a book on some platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialMediaLink {
    pub id: Option<LinkId>,
    pub book: BookId,
    pub platform: PlatformId,
    pub url: String,
    /// Announcement text, hashtags and the like.
    pub description: String,
    pub post_date: Option<Date>,
    pub video_url: Option<String>,
}
impl SocialMediaLink {
    pub fn new(book: BookId, platform: PlatformId, url: impl Into<String>) -> Self {
        Self {
            id: None,
            book,
            platform,
            url: url.into(),
            description: String::new(),
            post_date: None,
            video_url: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_url("url", &self.url)?;
        match &self.video_url {
            Some(video) => check_url("video url", video),
            None => Ok(()),
        }
    }
}

fn check_url(field: &'static str, url: &str) -> Result<()> {
    let rest = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') && !url.contains(char::is_whitespace) => Ok(()),
        _ => exn::bail!(ErrorKind::validation(format!("{field} must be an http(s) URL, got {url:?}"))),
    }
}

//! Configuration for the bookland catalog.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults (platform data directory, see [`directories`]),
//! 2. a config file (`toml`, `yaml`/`yml` or `json`, picked by extension),
//!    by default `config.toml` in the platform config directory,
//! 3. environment variables prefixed with `BOOKLAND_`, with `__` separating
//!    nested keys (`BOOKLAND_MEDIA__BASE_URL`).

pub mod error;

use crate::error::{ErrorKind, Result};
use bookland_catalog::slug::DEFAULT_PROBE_HEADROOM;
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const ENV_PREFIX: &str = "BOOKLAND_";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path of the SQLite catalog database.
    pub database: PathBuf,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub slugs: SlugConfig,
}

/// Where uploaded files are stored and served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Absolute directory uploads are written under.
    pub root: PathBuf,
    /// Public URL the media root is served at.
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugConfig {
    /// Extra book slug probes allowed beyond the number of books.
    pub probe_headroom: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: data_dir().join("catalog.sqlite3"),
            media: MediaConfig::default(),
            slugs: SlugConfig::default(),
        }
    }
}
impl Default for MediaConfig {
    fn default() -> Self {
        Self { root: data_dir().join("media"), base_url: "http://localhost:8000/media/".to_string() }
    }
}
impl Default for SlugConfig {
    fn default() -> Self {
        Self { probe_headroom: DEFAULT_PROBE_HEADROOM }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "bookland", "bookland")
}

fn data_dir() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        // Fallback to current directory if we can't determine project dirs
        None => PathBuf::from(".bookland").join("data"),
    }
}

/// Default location of the config file, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Config {
    /// Load the configuration from defaults, `path` (or the default config
    /// file, when it exists) and the environment, then validate it.
    ///
    /// An explicit `path` must exist; the default one is optional.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => figment = merge_file(figment, path)?,
            None => {
                if let Some(path) = default_config_path().filter(|p| p.is_file()) {
                    figment = merge_file(figment, &path)?;
                }
            },
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract and validate a configuration from an already layered [`Figment`].
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Extract)?;
        config.validate()?;
        tracing::debug!(
            database = %config.database.display(),
            media = %config.media.root.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Rejects values the catalog can't run with.
    pub fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("database path is empty".to_string()));
        }
        if !self.media.root.is_absolute() {
            exn::bail!(ErrorKind::Invalid(format!("media root must be absolute, got {}", self.media.root.display())));
        }
        bookland_storage::parse_base_url(&self.media.base_url)
            .or_raise(|| ErrorKind::Invalid(format!("media base URL must be http(s), got {:?}", self.media.base_url)))?;
        Ok(())
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    tracing::debug!(path = %path.display(), "Reading config file");
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

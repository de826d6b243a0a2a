mod file_config;

pub use file_config::{FeedConfig, FileConfig, OmdbConfig, TmdbConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "/data/movierater.db";
pub const DEFAULT_FEED_URL: &str = "https://mediathekviewweb.de/feed";
/// TMDB host. The API version segment is appended during resolution.
pub const DEFAULT_TMDB_API_URL: &str = "https://api.themoviedb.org";
pub const TMDB_API_VERSION: &str = "3";
pub const MAX_UPDATE_INTERVAL_HOURS: u64 = 24 * 366;
pub const DEFAULT_OMDB_API_URL: &str = "http://www.omdbapi.com";
pub const DEFAULT_LANGUAGE: &str = "de";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub feed_url: String,
    pub tmdb_api_url: String,
    pub tmdb_api_key: Option<String>,
    pub omdb_api_url: String,
    pub omdb_api_key: Option<String>,
    pub language: String,
    pub update_interval_hours: u64,
    pub http_timeout_sec: u64,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            feed_url: DEFAULT_FEED_URL.to_string(),
            tmdb_api_url: DEFAULT_TMDB_API_URL.to_string(),
            tmdb_api_key: None,
            omdb_api_url: DEFAULT_OMDB_API_URL.to_string(),
            omdb_api_key: None,
            language: DEFAULT_LANGUAGE.to_string(),
            update_interval_hours: 24,
            http_timeout_sec: 30,
            port: 5000,
            logging_level: RequestsLoggingLevel::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub update_interval_hours: u64,

    pub feed: FeedSettings,
    pub tmdb: TmdbSettings,
    pub omdb: OmdbSettings,
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct TmdbSettings {
    pub api_url: String,
    /// Bearer token (TMDB "API read access token").
    pub api_key: Option<String>,
    pub language: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct OmdbSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let feed_file = file.feed.unwrap_or_default();
        let tmdb_file = file.tmdb.unwrap_or_default();
        let omdb_file = file.omdb.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let update_interval_hours = file
            .update_interval_hours
            .unwrap_or(cli.update_interval_hours);
        if update_interval_hours == 0 {
            bail!("update_interval_hours must be greater than zero");
        }
        if update_interval_hours > MAX_UPDATE_INTERVAL_HOURS {
            bail!(
                "update_interval_hours must be at most {}, got {}",
                MAX_UPDATE_INTERVAL_HOURS,
                update_interval_hours
            );
        }

        let http_timeout_sec = file.http_timeout_sec.unwrap_or(cli.http_timeout_sec);
        if http_timeout_sec == 0 {
            bail!("http_timeout_sec must be greater than zero");
        }
        let timeout = Duration::from_secs(http_timeout_sec);

        let feed = FeedSettings {
            url: non_empty("feed url", feed_file.url.unwrap_or_else(|| cli.feed_url.clone()))?,
            timeout,
        };

        let tmdb = TmdbSettings {
            api_url: with_tmdb_version(non_empty(
                "tmdb api_url",
                tmdb_file.api_url.unwrap_or_else(|| cli.tmdb_api_url.clone()),
            )?),
            api_key: tmdb_file.api_key.or_else(|| cli.tmdb_api_key.clone()),
            language: tmdb_file.language.unwrap_or_else(|| cli.language.clone()),
            timeout,
        };

        let omdb = OmdbSettings {
            api_url: non_empty(
                "omdb api_url",
                omdb_file.api_url.unwrap_or_else(|| cli.omdb_api_url.clone()),
            )?,
            api_key: omdb_file.api_key.or_else(|| cli.omdb_api_key.clone()),
            timeout,
        };

        Ok(Self {
            db_path,
            port,
            logging_level,
            update_interval_hours,
            feed,
            tmdb,
            omdb,
        })
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_hours.saturating_mul(60 * 60))
    }
}

/// `https://api.themoviedb.org` becomes `https://api.themoviedb.org/3`.
/// A URL already ending in the version segment is kept as is.
fn with_tmdb_version(base: String) -> String {
    let suffix = format!("/{}", TMDB_API_VERSION);
    if base.ends_with(&suffix) {
        base
    } else {
        base + &suffix
    }
}

fn non_empty(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{} must not be empty", field);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub update_interval_hours: Option<u64>,
    pub http_timeout_sec: Option<u64>,

    pub feed: Option<FeedConfig>,
    pub tmdb: Option<TmdbConfig>,
    pub omdb: Option<OmdbConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    /// ISO 639-1 code passed to searches, e.g. "de".
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OmdbConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

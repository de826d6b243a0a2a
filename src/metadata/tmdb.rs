//! TMDB API client for title search and IMDb id resolution.
//!
//! Rate limited client-side to stay well under TMDB's ~50 requests per second.

use super::{LookupError, MetadataService};
use crate::config::TmdbSettings;
use crate::media::{MediaType, PrimaryMetadata};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(50);

pub struct TmdbClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    language: String,
    last_request: Mutex<Instant>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    id: i64,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    media_type: Option<String>,
    /// Movies carry `title`, series carry `name`.
    title: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct ExternalIdsResponse {
    imdb_id: Option<String>,
}

impl SearchResult {
    fn into_metadata(self, queried: MediaType) -> PrimaryMetadata {
        PrimaryMetadata {
            tmdb_id: self.id,
            popularity: self.popularity,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            media_type: self
                .media_type
                .as_deref()
                .and_then(MediaType::from_str)
                .unwrap_or(queried),
            title: self.title.or(self.name),
        }
    }
}

impl TmdbClient {
    pub fn new(settings: &TmdbSettings) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            last_request: Mutex::new(Instant::now() - RATE_LIMIT_INTERVAL),
        })
    }

    fn rate_limit(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let elapsed = last.elapsed();
        if elapsed < RATE_LIMIT_INTERVAL {
            std::thread::sleep(RATE_LIMIT_INTERVAL - elapsed);
        }
        *last = Instant::now();
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url).header(ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

impl MetadataService for TmdbClient {
    fn search(
        &self,
        query: &str,
        media_type: MediaType,
    ) -> Result<Option<PrimaryMetadata>, LookupError> {
        self.rate_limit();

        let url = format!("{}/search/{}", self.api_url, media_type);
        debug!("TMDB search '{}' at {}", query, url);

        let response = self
            .get(&url)
            .query(&[
                ("query", query),
                ("include_adult", "false"),
                ("language", self.language.as_str()),
                ("page", "1"),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: SearchResponse = response.json()?;

        // First result wins, the rest are ignored
        Ok(body
            .results
            .into_iter()
            .next()
            .map(|result| result.into_metadata(media_type)))
    }

    fn imdb_id(&self, tmdb_id: i64, media_type: MediaType) -> Result<Option<String>, LookupError> {
        self.rate_limit();

        let url = format!("{}/{}/{}/external_ids", self.api_url, media_type, tmdb_id);
        debug!("TMDB external ids at {}", url);

        let response = self.get(&url).send()?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: ExternalIdsResponse = response.json()?;
        Ok(body.imdb_id.filter(|id| !id.trim().is_empty()))
    }
}

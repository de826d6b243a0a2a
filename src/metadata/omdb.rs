//! OMDb API client for ratings by IMDb id.

use super::{LookupError, RatingService};
use crate::config::OmdbSettings;
use crate::media::RatingData;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(100);

pub const ROTTEN_TOMATOES_SOURCE: &str = "Rotten Tomatoes";
pub const METACRITIC_SOURCE: &str = "Metacritic";

/// OMDb's placeholder for missing values.
const NOT_AVAILABLE: &str = "N/A";

pub struct OmdbClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    last_request: Mutex<Instant>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub ratings: Vec<OmdbRating>,
    pub awards: Option<String>,
    pub box_office: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbRating {
    pub source: String,
    pub value: String,
}

impl OmdbResponse {
    pub fn into_rating_data(self) -> RatingData {
        let mut by_source: HashMap<String, String> = self
            .ratings
            .into_iter()
            .map(|r| (r.source, r.value))
            .collect();

        RatingData {
            imdb_rating: self
                .imdb_rating
                .as_deref()
                .map(str::trim)
                .filter(|s| *s != NOT_AVAILABLE)
                .and_then(|s| s.parse().ok()),
            rotten_tomatoes: by_source.remove(ROTTEN_TOMATOES_SOURCE),
            metacritic: by_source.remove(METACRITIC_SOURCE),
            awards: self.awards,
            box_office: self.box_office,
            resolved_type: self.kind,
        }
    }
}

impl OmdbClient {
    pub fn new(settings: &OmdbSettings) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
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
}

impl RatingService for OmdbClient {
    fn ratings(&self, imdb_id: &str) -> Result<RatingData, LookupError> {
        self.rate_limit();

        let url = format!("{}/", self.api_url);
        debug!("OMDb lookup {} at {}", imdb_id, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.as_deref().unwrap_or_default()),
                ("i", imdb_id),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: OmdbResponse = response.json()?;
        Ok(body.into_rating_data())
    }
}

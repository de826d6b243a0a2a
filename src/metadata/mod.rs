//! Metadata enrichment via TMDB and OMDb.
//!
//! - TMDB: title/category search, then TMDB id → IMDb id resolution
//! - OMDb: ratings, awards and box office by IMDb id
//!
//! Lookups are chained by [`MetadataResolver`], which never fails: every
//! miss or HTTP error only leaves the corresponding fields empty.

pub mod omdb;
pub mod resolver;
pub mod tmdb;

pub use omdb::OmdbClient;
pub use resolver::MetadataResolver;
pub use tmdb::TmdbClient;

use crate::media::{MediaType, PrimaryMetadata, RatingData};
use thiserror::Error;

/// A single external request that did not produce usable data.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {0}")]
    Status(u16),
}

/// Primary metadata service (TMDB).
#[cfg_attr(test, mockall::automock)]
pub trait MetadataService: Send + Sync {
    /// Search titles of `media_type`. Only the first result is returned.
    fn search(
        &self,
        query: &str,
        media_type: MediaType,
    ) -> Result<Option<PrimaryMetadata>, LookupError>;

    /// IMDb id registered for a TMDB id. `Ok(None)` when the service knows the
    /// title but has no (or an empty) IMDb id for it.
    fn imdb_id(&self, tmdb_id: i64, media_type: MediaType) -> Result<Option<String>, LookupError>;
}

/// Rating service (OMDb).
#[cfg_attr(test, mockall::automock)]
pub trait RatingService: Send + Sync {
    fn ratings(&self, imdb_id: &str) -> Result<RatingData, LookupError>;
}

//! Persistent catalog of enriched media records.

pub mod schema;
pub mod store;

pub use store::SqliteCatalogStore;

use crate::media::{EnrichedRecord, StoredRecord};
use thiserror::Error;

/// Failure to reach or write the backing store. Fatal for an ingestion run.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] anyhow::Error),
}

pub trait CatalogStore: Send + Sync {
    /// Create the media table if it does not exist yet. Idempotent.
    fn init_schema(&self) -> Result<(), CatalogError>;

    /// True if any stored record has the given title OR the given link.
    fn exists(&self, title: &str, link: &str) -> Result<bool, CatalogError>;

    /// Append one record with `downloaded = false` and the current time as
    /// `created_at`. Returns the new row id.
    fn insert(&self, record: &EnrichedRecord) -> Result<i64, CatalogError>;

    /// All records ordered by `sort`, rows without a value in that column last.
    fn list(&self, sort: SortColumn, order: SortOrder) -> Result<Vec<StoredRecord>, CatalogError>;

    fn count(&self) -> Result<usize, CatalogError>;
}

/// Columns the read view may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Creator,
    Title,
    Category,
    Duration,
    VoteAverage,
    ImdbId,
    #[default]
    ImdbRating,
    RottenTomatoes,
    Metacritic,
    MediaType,
    Downloaded,
    CreatedAt,
}

impl SortColumn {
    pub const ALL: [SortColumn; 12] = [
        SortColumn::Creator,
        SortColumn::Title,
        SortColumn::Category,
        SortColumn::Duration,
        SortColumn::VoteAverage,
        SortColumn::ImdbId,
        SortColumn::ImdbRating,
        SortColumn::RottenTomatoes,
        SortColumn::Metacritic,
        SortColumn::MediaType,
        SortColumn::Downloaded,
        SortColumn::CreatedAt,
    ];

    /// Query parameter name, identical to the SQL column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Creator => "creator",
            SortColumn::Title => "title",
            SortColumn::Category => "category",
            SortColumn::Duration => "duration",
            SortColumn::VoteAverage => "vote_average",
            SortColumn::ImdbId => "imdb_id",
            SortColumn::ImdbRating => "imdb_rating",
            SortColumn::RottenTomatoes => "rotten_tomatoes",
            SortColumn::Metacritic => "metacritic",
            SortColumn::MediaType => "media_type",
            SortColumn::Downloaded => "downloaded",
            SortColumn::CreatedAt => "created_at",
        }
    }

    /// SQL expression ordered on. The media type shown is the TMDB-resolved
    /// one when a search matched, the duration classification otherwise.
    pub fn sql_expr(&self) -> &'static str {
        match self {
            SortColumn::MediaType => "COALESCE(resolved_media_type, media_type)",
            other => other.as_str(),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Header label, e.g. "Vote Average".
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

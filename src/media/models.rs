//! Value types flowing through an ingestion run.

use serde::{Deserialize, Serialize};

/// Entries of at least this many minutes are classified as movies.
pub const MOVIE_MIN_DURATION_MINUTES: i64 = 90;

/// Entries shorter than this are not ingested at all.
pub const TV_MIN_DURATION_MINUTES: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            MediaType::Movie => MediaType::Tv,
            MediaType::Tv => MediaType::Movie,
        }
    }

    /// Classify a feed entry by its running time.
    ///
    /// Returns `None` for entries too short to be either a movie or an episode.
    pub fn classify(duration_minutes: i64) -> Option<Self> {
        if duration_minutes >= MOVIE_MIN_DURATION_MINUTES {
            Some(MediaType::Movie)
        } else if duration_minutes >= TV_MIN_DURATION_MINUTES {
            Some(MediaType::Tv)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feed entry that passed duration classification.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub title: String,
    pub category: String,
    pub description: String,
    /// Raw publication timestamp as found in the feed.
    pub pubdate: String,
    pub link: String,
    pub creator: String,
    pub duration_minutes: i64,
    pub media_type: MediaType,
}

/// First hit of a TMDB search.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryMetadata {
    pub tmdb_id: i64,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    /// Type reported by TMDB, or the type the search was issued for.
    pub media_type: MediaType,
    pub title: Option<String>,
}

/// Ratings and box office data from OMDb. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingData {
    pub imdb_rating: Option<f64>,
    pub rotten_tomatoes: Option<String>,
    pub metacritic: Option<String>,
    pub awards: Option<String>,
    pub box_office: Option<String>,
    pub resolved_type: Option<String>,
}

/// Everything the resolver could find out about one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMetadata {
    pub primary: Option<PrimaryMetadata>,
    pub imdb_id: Option<String>,
    pub ratings: RatingData,
}

/// A feed entry merged with its metadata, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub title: String,
    pub category: String,
    pub description: String,
    pub pubdate: String,
    pub link: String,
    pub creator: String,
    pub duration: i64,
    pub media_type: MediaType,
    pub resolved_media_type: Option<MediaType>,
    pub resolved_title: Option<String>,
    pub tmdb_id: Option<i64>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub imdb_id: Option<String>,
    pub imdb_rating: Option<f64>,
    pub rotten_tomatoes: Option<String>,
    pub metacritic: Option<String>,
    pub awards: Option<String>,
    pub boxoffice: Option<String>,
    pub resolved_type: Option<String>,
}

impl EnrichedRecord {
    /// Combine a feed entry with whatever metadata was resolved for it.
    pub fn merge(item: MediaItem, metadata: ResolvedMetadata) -> Self {
        let ResolvedMetadata {
            primary,
            imdb_id,
            ratings,
        } = metadata;

        let (resolved_media_type, resolved_title, tmdb_id, popularity, vote_average, vote_count) =
            match primary {
                Some(p) => (
                    Some(p.media_type),
                    p.title,
                    Some(p.tmdb_id),
                    p.popularity,
                    p.vote_average,
                    p.vote_count,
                ),
                None => (None, None, None, None, None, None),
            };

        Self {
            title: item.title,
            category: item.category,
            description: item.description,
            pubdate: item.pubdate,
            link: item.link,
            creator: item.creator,
            duration: item.duration_minutes,
            media_type: item.media_type,
            resolved_media_type,
            resolved_title,
            tmdb_id,
            popularity,
            vote_average,
            vote_count,
            imdb_id,
            imdb_rating: ratings.imdb_rating,
            rotten_tomatoes: ratings.rotten_tomatoes,
            metacritic: ratings.metacritic,
            awards: ratings.awards,
            boxoffice: ratings.box_office,
            resolved_type: ratings.resolved_type,
        }
    }

    /// A record carrying only the feed fields.
    pub fn unresolved(item: MediaItem) -> Self {
        Self::merge(item, ResolvedMetadata::default())
    }
}

/// A row read back from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: i64,
    #[serde(flatten)]
    pub record: EnrichedRecord,
    pub downloaded: bool,
    /// RFC 3339 insertion timestamp.
    pub created_at: String,
}

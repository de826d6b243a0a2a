//! Three-stage metadata resolution for one feed item.

use super::{LookupError, MetadataService, RatingService};
use crate::media::{MediaItem, MediaType, PrimaryMetadata, RatingData, ResolvedMetadata};
use crate::metrics::{record_lookup, LookupOutcome};
use tracing::{debug, info, warn};

const STAGE_PRIMARY: &str = "primary";
const STAGE_EXTERNAL_REF: &str = "external_ref";
const STAGE_RATINGS: &str = "ratings";

/// Chains the primary search, IMDb id resolution and rating fetch for one item.
///
/// Never fails. Misses and lookup errors leave the affected fields empty and
/// only short-circuit the stages that depend on them.
pub struct MetadataResolver {
    metadata: Box<dyn MetadataService>,
    ratings: Box<dyn RatingService>,
}

/// Search string for a type: movies are matched by title, series by category.
fn query_for<'a>(title: &'a str, category: &'a str, media_type: MediaType) -> &'a str {
    match media_type {
        MediaType::Movie => title,
        MediaType::Tv => category,
    }
}

impl MetadataResolver {
    pub fn new(metadata: Box<dyn MetadataService>, ratings: Box<dyn RatingService>) -> Self {
        Self { metadata, ratings }
    }

    pub fn resolve(&self, item: &MediaItem) -> ResolvedMetadata {
        let primary = self.resolve_primary(&item.title, &item.category, item.media_type);

        let imdb_id = match &primary {
            Some(found) => self.resolve_external_ref(Some(found.tmdb_id), found.media_type),
            None => {
                debug!("No primary metadata for '{}', skipping IMDb id", item.title);
                None
            }
        };

        let ratings = self.resolve_ratings(imdb_id.as_deref());

        ResolvedMetadata {
            primary,
            imdb_id,
            ratings,
        }
    }

    fn search(&self, query: &str, media_type: MediaType) -> Option<PrimaryMetadata> {
        if query.trim().is_empty() {
            debug!("Empty {} query, not searching", media_type);
            record_lookup(STAGE_PRIMARY, LookupOutcome::Miss);
            return None;
        }

        match self.metadata.search(query, media_type) {
            Ok(Some(found)) => {
                record_lookup(STAGE_PRIMARY, LookupOutcome::Hit);
                Some(found)
            }
            Ok(None) => {
                debug!("No {} result for '{}'", media_type, query);
                record_lookup(STAGE_PRIMARY, LookupOutcome::Miss);
                None
            }
            Err(err) => {
                warn!("Search for {} '{}' failed: {}", media_type, query, err);
                record_lookup(STAGE_PRIMARY, LookupOutcome::Error);
                None
            }
        }
    }

    /// Search by the query matching `media_type`, then once more as the
    /// opposite type. A fallback hit is reported as the fallback type.
    pub fn resolve_primary(
        &self,
        title: &str,
        category: &str,
        media_type: MediaType,
    ) -> Option<PrimaryMetadata> {
        if let Some(found) = self.search(query_for(title, category, media_type), media_type) {
            return Some(found);
        }

        let alt_type = media_type.opposite();
        let alt_query = query_for(title, category, alt_type);
        info!("Retrying '{}' as {} with '{}'", title, alt_type, alt_query);

        self.search(alt_query, alt_type).map(|found| PrimaryMetadata {
            media_type: alt_type,
            ..found
        })
    }

    fn lookup_imdb_id(&self, tmdb_id: i64, media_type: MediaType) -> Result<Option<String>, LookupError> {
        let result = self.metadata.imdb_id(tmdb_id, media_type);
        let outcome = match &result {
            Ok(Some(_)) => LookupOutcome::Hit,
            Ok(None) => LookupOutcome::Miss,
            Err(_) => LookupOutcome::Error,
        };
        record_lookup(STAGE_EXTERNAL_REF, outcome);
        result
    }

    /// IMDb id for a TMDB id. An empty answer is retried once under the
    /// opposite type; a failed request is not.
    pub fn resolve_external_ref(
        &self,
        tmdb_id: Option<i64>,
        media_type: MediaType,
    ) -> Option<String> {
        let Some(tmdb_id) = tmdb_id else {
            info!("No TMDB id, skipping IMDb id lookup");
            return None;
        };

        match self.lookup_imdb_id(tmdb_id, media_type) {
            Ok(Some(imdb_id)) => return Some(imdb_id),
            Ok(None) => {}
            Err(err) => {
                warn!("External ids for {} {} failed: {}", media_type, tmdb_id, err);
                return None;
            }
        }

        let alt_type = media_type.opposite();
        debug!("Empty IMDb id for {} {}, retrying as {}", media_type, tmdb_id, alt_type);

        match self.lookup_imdb_id(tmdb_id, alt_type) {
            Ok(found) => {
                if found.is_none() {
                    info!("No IMDb id for TMDB id {}", tmdb_id);
                }
                found
            }
            Err(err) => {
                warn!("External ids for {} {} failed: {}", alt_type, tmdb_id, err);
                None
            }
        }
    }

    pub fn resolve_ratings(&self, imdb_id: Option<&str>) -> RatingData {
        let Some(imdb_id) = imdb_id else {
            return RatingData::default();
        };

        match self.ratings.ratings(imdb_id) {
            Ok(data) => {
                let outcome = if data == RatingData::default() {
                    LookupOutcome::Miss
                } else {
                    LookupOutcome::Hit
                };
                record_lookup(STAGE_RATINGS, outcome);
                data
            }
            Err(err) => {
                warn!("Ratings for {} failed: {}", imdb_id, err);
                record_lookup(STAGE_RATINGS, LookupOutcome::Error);
                RatingData::default()
            }
        }
    }
}

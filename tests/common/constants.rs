//! Shared constants for end-to-end tests
//!
//! The stub upstream answers only for the titles, ids and keys below. When
//! the fixture feed changes, update this file together with `upstream.rs`.

// ============================================================================
// Credentials
// ============================================================================

pub const TMDB_TOKEN: &str = "tmdb-test-token";
pub const OMDB_KEY: &str = "omdb-test-key";
pub const LANGUAGE: &str = "de";

// ============================================================================
// Feed entries
// ============================================================================

/// 120 minutes, found by title as a movie, fully rated.
pub const FOO_TITLE: &str = "Foo";
pub const FOO_CATEGORY: &str = "Spielfilm";
pub const FOO_TMDB_ID: i64 = 42;
pub const FOO_IMDB_ID: &str = "tt0001";

/// 90 minutes (movie) but only found through its category as a series.
/// Its IMDb id is only registered under the movie type.
pub const TATORT_TITLE: &str = "Tatort: Schatten";
pub const TATORT_CATEGORY: &str = "Tatort";
pub const TATORT_TMDB_ID: i64 = 7;
pub const TATORT_IMDB_ID: &str = "tt0007";

/// 45 minutes (tv) without category; the movie fallback search fails with 500.
pub const DOKU_TITLE: &str = "Doku: Der Wald";

/// 50 minutes (tv); the rating service is down for its IMDb id.
pub const OUTAGE_TITLE: &str = "Ausfall";
pub const OUTAGE_CATEGORY: &str = "Ratings Down";
pub const OUTAGE_TMDB_ID: i64 = 99;
pub const OUTAGE_IMDB_ID: &str = "tt0099";

/// 10 minutes, never ingested.
pub const CLIP_TITLE: &str = "Kurz notiert";

/// Entries in the fixture feed that pass duration classification.
pub const INGESTIBLE_ITEMS: usize = 4;

// ============================================================================
// Timing
// ============================================================================

/// Maximum time to wait for the read view to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

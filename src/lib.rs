//! MovieRater
//!
//! Periodically ingests a media RSS feed, enriches each entry with TMDB and
//! OMDb metadata, stores the result in SQLite and serves it as a sortable table.

pub mod catalog;
pub mod config;
pub mod feed;
pub mod ingestion;
pub mod media;
pub mod metadata;
pub mod metrics;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog::{CatalogStore, SqliteCatalogStore};
pub use ingestion::{IngestionPipeline, RunSummary};
pub use server::{run_server, RequestsLoggingLevel};

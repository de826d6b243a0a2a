//! Ingestion runs: feed → dedup → enrichment → catalog.
//!
//! ```text
//! FeedSource::fetch → Catalog::exists? → MetadataResolver::resolve
//!                   → EnrichedRecord::merge → Catalog::insert
//! ```

mod pipeline;
mod scheduler;

pub use pipeline::{IngestionPipeline, RunSummary};
pub use scheduler::PeriodicIngestion;

use crate::catalog::CatalogError;
use crate::feed::FeedError;
use thiserror::Error;

/// Errors that abort a whole run. Per-item lookup failures never surface here.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Feed fetch failed: {0}")]
    Fetch(#[from] FeedError),

    #[error("Catalog failure: {0}")]
    Persistence(#[from] CatalogError),
}

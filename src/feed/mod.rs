//! Source of candidate media items.

pub mod rss;

pub use rss::{parse_feed, RssFeedSource};

use crate::media::MediaItem;
use thiserror::Error;

/// The feed could not be fetched or understood. Fatal for an ingestion run.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed request failed with status {0}")]
    Status(u16),

    #[error("Malformed feed: {0}")]
    Parse(#[from] quick_xml::DeError),
}

#[cfg_attr(test, mockall::automock)]
pub trait FeedSource: Send + Sync {
    /// Download and parse the feed once, returning the classified entries in feed order.
    fn fetch(&self) -> Result<Vec<MediaItem>, FeedError>;
}

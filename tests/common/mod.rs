//! Common test infrastructure
//!
//! - [`StubUpstream`]: feed, TMDB and OMDb stand-ins on a random local port,
//!   answered from the fixtures in `constants.rs`
//! - [`TestServer`]: the read view over a temporary catalog
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{ingestion_config, StubUpstream};
//!
//! #[test]
//! fn test_ingest() {
//!     let upstream = StubUpstream::spawn();
//!     let (_dir, config) = ingestion_config(&upstream);
//!     // build a pipeline from `config` and run it
//! }
//! ```
#![allow(dead_code)]

mod constants;
mod fixtures;
mod server;
mod upstream;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::{feed_document, fixture_feed, ingestion_config, rss_item, sample_record};
pub use server::TestServer;
pub use upstream::{RecordedRequest, StubUpstream};

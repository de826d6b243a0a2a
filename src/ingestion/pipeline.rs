use super::IngestionError;
use crate::catalog::CatalogStore;
use crate::config::AppConfig;
use crate::feed::{FeedSource, RssFeedSource};
use crate::media::EnrichedRecord;
use crate::metadata::{MetadataResolver, OmdbClient, TmdbClient};
use crate::metrics;
use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub inserted: usize,
    pub skipped: usize,
}

pub struct IngestionPipeline {
    feed: Box<dyn FeedSource>,
    catalog: Arc<dyn CatalogStore>,
    resolver: MetadataResolver,
}

impl IngestionPipeline {
    pub fn new(
        feed: Box<dyn FeedSource>,
        catalog: Arc<dyn CatalogStore>,
        resolver: MetadataResolver,
    ) -> Self {
        Self {
            feed,
            catalog,
            resolver,
        }
    }

    /// Wire the RSS, TMDB and OMDb clients from resolved configuration.
    pub fn from_config(
        config: &AppConfig,
        catalog: Arc<dyn CatalogStore>,
    ) -> anyhow::Result<Self> {
        if config.tmdb.api_key.is_none() {
            warn!("No TMDB API key configured, searches will fail");
        }
        if config.omdb.api_key.is_none() {
            warn!("No OMDb API key configured, rating lookups will fail");
        }

        let feed = RssFeedSource::new(&config.feed).context("Failed to create feed client")?;
        let tmdb = TmdbClient::new(&config.tmdb).context("Failed to create TMDB client")?;
        let omdb = OmdbClient::new(&config.omdb).context("Failed to create OMDb client")?;

        Ok(Self::new(
            Box::new(feed),
            catalog,
            MetadataResolver::new(Box::new(tmdb), Box::new(omdb)),
        ))
    }

    /// Run one ingestion pass over the feed.
    ///
    /// Items are handled one at a time in feed order. At most one run may be
    /// active against a catalog, otherwise dedup checks race.
    pub fn run(&self) -> Result<RunSummary, IngestionError> {
        let started = Instant::now();
        let result = self.run_inner();

        let status = match &result {
            Ok(summary) => {
                info!(
                    "Ingestion finished in {:.1}s: {} fetched, {} inserted, {} skipped",
                    started.elapsed().as_secs_f64(),
                    summary.fetched,
                    summary.inserted,
                    summary.skipped
                );
                "success"
            }
            Err(err) => {
                error!("Ingestion aborted: {}", err);
                "failed"
            }
        };
        metrics::record_ingestion_run(status, started.elapsed());

        if let Ok(count) = self.catalog.count() {
            metrics::set_catalog_rows(count);
        }

        result
    }

    fn run_inner(&self) -> Result<RunSummary, IngestionError> {
        self.catalog.init_schema()?;

        let items = self.feed.fetch()?;
        info!("Fetched {} feed items", items.len());

        let mut summary = RunSummary {
            fetched: items.len(),
            ..Default::default()
        };

        for (index, item) in items.into_iter().enumerate() {
            if self.catalog.exists(&item.title, &item.link)? {
                debug!(
                    "[{}/{}] Skipping known '{}'",
                    index + 1,
                    summary.fetched,
                    item.title
                );
                metrics::record_ingestion_item("skipped");
                summary.skipped += 1;
                continue;
            }

            let metadata = self.resolver.resolve(&item);
            let record = EnrichedRecord::merge(item, metadata);

            match self.catalog.insert(&record) {
                Ok(id) => {
                    info!(
                        "[{}/{}] Stored '{}' as #{} (tmdb: {:?}, imdb: {:?})",
                        index + 1,
                        summary.fetched,
                        record.title,
                        id,
                        record.tmdb_id,
                        record.imdb_id
                    );
                    metrics::record_ingestion_item("inserted");
                    summary.inserted += 1;
                }
                Err(err) => {
                    metrics::record_ingestion_item("failed");
                    return Err(err.into());
                }
            }
        }

        Ok(summary)
    }
}

//! RSS 2.0 feed client.

use super::{FeedError, FeedSource};
use crate::config::FeedSettings;
use crate::media::{MediaItem, MediaType};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssEntry>,
}

#[derive(Deserialize)]
struct RssEntry {
    title: Option<String>,
    #[serde(rename = "category", default)]
    categories: Vec<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    link: Option<String>,
    #[serde(rename = "dc:creator", alias = "creator")]
    creator: Option<String>,
    /// Running time in seconds.
    duration: Option<String>,
}

impl RssEntry {
    fn duration_seconds(&self) -> i64 {
        let Some(raw) = self.duration.as_deref().map(str::trim) else {
            return 0;
        };
        if raw.is_empty() {
            return 0;
        }
        match raw.parse::<i64>() {
            Ok(seconds) => seconds,
            Err(_) => {
                warn!(
                    "Ignoring unparseable duration '{}' for '{}'",
                    raw,
                    self.title.as_deref().unwrap_or_default()
                );
                0
            }
        }
    }

    fn into_media_item(self) -> Option<MediaItem> {
        let duration_minutes = self.duration_seconds() / 60;
        let media_type = MediaType::classify(duration_minutes)?;

        Some(MediaItem {
            title: self.title.unwrap_or_default(),
            category: self.categories.into_iter().next().unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            pubdate: self.pub_date.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            creator: self.creator.unwrap_or_default(),
            duration_minutes,
            media_type,
        })
    }
}

/// Parse an RSS document into the entries worth ingesting, in feed order.
///
/// Entries shorter than an episode are dropped here.
pub fn parse_feed(xml: &str) -> Result<Vec<MediaItem>, FeedError> {
    let document: RssDocument = quick_xml::de::from_str(xml)?;
    let total = document.channel.items.len();

    let items: Vec<MediaItem> = document
        .channel
        .items
        .into_iter()
        .filter_map(RssEntry::into_media_item)
        .collect();

    debug!("Feed had {} entries, {} long enough to ingest", total, items.len());
    Ok(items)
}

pub struct RssFeedSource {
    client: Client,
    url: String,
}

impl RssFeedSource {
    pub fn new(settings: &FeedSettings) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            url: settings.url.clone(),
        })
    }
}

impl FeedSource for RssFeedSource {
    fn fetch(&self) -> Result<Vec<MediaItem>, FeedError> {
        info!("Fetching feed {}", self.url);
        let response = self.client.get(&self.url).send()?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.text()?;
        parse_feed(&body)
    }
}

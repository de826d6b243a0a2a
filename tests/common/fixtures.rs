//! Fixture feed and configuration builders

use super::constants::*;
use super::upstream::StubUpstream;
use movierater::config::{AppConfig, CliConfig};
use movierater::media::{EnrichedRecord, MediaItem, MediaType};
use movierater::RequestsLoggingLevel;
use tempfile::TempDir;

/// One RSS `<item>`. An empty category omits the element.
pub fn rss_item(title: &str, category: &str, duration_sec: u64) -> String {
    let category = if category.is_empty() {
        String::new()
    } else {
        format!("<category>{}</category>", category)
    };
    let slug = title.replace([' ', ':'], "-");
    format!(
        r#"<item>
      <title>{title}</title>
      <link>https://mediathek.example/{slug}</link>
      <description>Sendung {title}</description>
      {category}
      <dc:creator>ARD</dc:creator>
      <pubDate>Sat, 06 Jan 2024 20:15:00 GMT</pubDate>
      <duration>{duration_sec}</duration>
    </item>"#
    )
}

pub fn feed_document(items: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>MediathekViewWeb</title>
    <link>https://mediathekviewweb.de/</link>
    <description>Neue Sendungen</description>
    {}
  </channel>
</rss>"#,
        items.join("\n    ")
    )
}

/// The feed served by a default [`StubUpstream`].
pub fn fixture_feed() -> String {
    feed_document(&[
        rss_item(FOO_TITLE, FOO_CATEGORY, 7200),
        rss_item(CLIP_TITLE, "Nachrichten", 600),
        rss_item(TATORT_TITLE, TATORT_CATEGORY, 5400),
        rss_item(DOKU_TITLE, "", 2700),
        rss_item(OUTAGE_TITLE, OUTAGE_CATEGORY, 3000),
    ])
}

/// Resolved configuration pointing every client at `upstream`, with the
/// database in a fresh temporary directory.
pub fn ingestion_config(upstream: &StubUpstream) -> (TempDir, AppConfig) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cli = CliConfig {
        db_path: dir.path().join("movierater.db"),
        feed_url: upstream.feed_url(),
        tmdb_api_url: upstream.tmdb_url(),
        tmdb_api_key: Some(TMDB_TOKEN.to_string()),
        omdb_api_url: upstream.omdb_url(),
        omdb_api_key: Some(OMDB_KEY.to_string()),
        language: LANGUAGE.to_string(),
        update_interval_hours: 24,
        http_timeout_sec: 5,
        port: 0,
        logging_level: RequestsLoggingLevel::None,
    };
    let config = AppConfig::resolve(&cli, None).expect("Failed to resolve test config");
    (dir, config)
}

/// A stored-ready record with optional ratings, for read view tests.
pub fn sample_record(
    title: &str,
    media_type: MediaType,
    imdb_rating: Option<f64>,
    metacritic: Option<&str>,
) -> EnrichedRecord {
    let mut record = EnrichedRecord::unresolved(MediaItem {
        title: title.to_string(),
        category: "Spielfilm".to_string(),
        description: String::new(),
        pubdate: "Sat, 06 Jan 2024 20:15:00 GMT".to_string(),
        link: format!("https://mediathek.example/{}", title.replace(' ', "-")),
        creator: "ZDF".to_string(),
        duration_minutes: match media_type {
            MediaType::Movie => 100,
            MediaType::Tv => 45,
        },
        media_type,
    });
    record.imdb_rating = imdb_rating;
    record.metacritic = metacritic.map(str::to_string);
    if imdb_rating.is_some() {
        record.imdb_id = Some(format!("tt{:07}", title.len()));
    }
    record
}

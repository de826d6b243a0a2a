//! Stub feed, TMDB and OMDb services
//!
//! Runs an axum app on its own thread and runtime so that tests can drive it
//! with the blocking clients from plain `#[test]` functions.

use super::constants::*;
use super::fixtures::fixture_feed;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tokio::net::TcpListener;

/// A request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct StubState {
    feed: Arc<String>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubState {
    fn record(&self, uri: &Uri, query: &HashMap<String, String>, headers: &HeaderMap) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            path: uri.path().to_string(),
            query: query.clone(),
            authorization,
        });
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TMDB_TOKEN))
        .unwrap_or(false)
}

async fn feed(
    State(state): State<StubState>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &query, &headers);
    (
        [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        state.feed.as_str().to_string(),
    )
        .into_response()
}

fn search_hit(id: i64, name: &str, media_type: &str) -> Value {
    match media_type {
        "movie" => json!({
            "id": id,
            "title": name,
            "popularity": 12.5,
            "vote_average": 7.8,
            "vote_count": 1520,
        }),
        _ => json!({
            "id": id,
            "name": name,
            "popularity": 33.1,
            "vote_average": 7.1,
            "vote_count": 412,
        }),
    }
}

async fn tmdb_search(
    State(state): State<StubState>,
    Path(media_type): Path<String>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &query, &headers);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let text = query.get("query").map(String::as_str).unwrap_or_default();
    let results: Vec<Value> = match (media_type.as_str(), text) {
        ("movie", FOO_TITLE) => vec![
            search_hit(FOO_TMDB_ID, FOO_TITLE, "movie"),
            search_hit(FOO_TMDB_ID + 1, "Foo 2", "movie"),
        ],
        ("tv", TATORT_CATEGORY) => vec![search_hit(TATORT_TMDB_ID, TATORT_CATEGORY, "tv")],
        ("tv", OUTAGE_CATEGORY) => vec![search_hit(OUTAGE_TMDB_ID, OUTAGE_CATEGORY, "tv")],
        ("movie", DOKU_TITLE) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => vec![],
    };

    let total = results.len();
    Json(json!({ "page": 1, "results": results, "total_results": total })).into_response()
}

async fn tmdb_external_ids(
    State(state): State<StubState>,
    Path((media_type, id)): Path<(String, i64)>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &query, &headers);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let imdb_id = match (media_type.as_str(), id) {
        ("movie", FOO_TMDB_ID) => Some(FOO_IMDB_ID),
        ("tv", TATORT_TMDB_ID) => Some(""),
        ("movie", TATORT_TMDB_ID) => Some(TATORT_IMDB_ID),
        ("tv", OUTAGE_TMDB_ID) => Some(OUTAGE_IMDB_ID),
        _ => None,
    };

    match imdb_id {
        Some(imdb_id) => Json(json!({ "id": id, "imdb_id": imdb_id })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn omdb(
    State(state): State<StubState>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &query, &headers);
    if query.get("apikey").map(String::as_str) != Some(OMDB_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "Response": "False", "Error": "Invalid API key!" })),
        )
            .into_response();
    }

    let body = match query.get("i").map(String::as_str).unwrap_or_default() {
        FOO_IMDB_ID => json!({
            "Title": FOO_TITLE,
            "imdbRating": "8.1",
            "Ratings": [
                { "Source": "Internet Movie Database", "Value": "8.1/10" },
                { "Source": "Rotten Tomatoes", "Value": "88%" },
                { "Source": "Metacritic", "Value": "70/100" }
            ],
            "Awards": "Won 1 Oscar. 12 wins & 30 nominations total",
            "BoxOffice": "$1,234,567",
            "Type": "movie",
            "Response": "True"
        }),
        TATORT_IMDB_ID => json!({
            "Title": TATORT_CATEGORY,
            "imdbRating": "N/A",
            "Ratings": [],
            "Awards": "N/A",
            "Type": "series",
            "Response": "True"
        }),
        OUTAGE_IMDB_ID => return StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => json!({ "Response": "False", "Error": "Incorrect IMDb ID." }),
    };

    Json(body).into_response()
}

/// Stub upstream services on `127.0.0.1:<random port>`.
///
/// Shuts down when dropped.
pub struct StubUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl StubUpstream {
    /// Serves [`fixture_feed`].
    pub fn spawn() -> Self {
        Self::spawn_with_feed(fixture_feed())
    }

    pub fn spawn_with_feed(feed_xml: String) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            feed: Arc::new(feed_xml),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/feed", get(feed))
            .route("/tmdb/3/search/{media_type}", get(tmdb_search))
            .route("/tmdb/3/{media_type}/{id}/external_ids", get(tmdb_external_ids))
            .route("/omdb/", get(omdb))
            .with_state(state);

        let (addr_tx, addr_rx) = std::sync::mpsc::channel::<SocketAddr>();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build stub runtime");

            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("Failed to bind to random port");
                addr_tx
                    .send(listener.local_addr().expect("Failed to get local address"))
                    .expect("Failed to report stub address");

                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        shutdown_rx.await.ok();
                    })
                    .await
                    .expect("Stub upstream failed");
            });
        });

        let addr = addr_rx.recv().expect("Stub upstream did not start");

        Self {
            base_url: format!("http://{}", addr),
            requests,
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        }
    }

    pub fn feed_url(&self) -> String {
        format!("{}/feed", self.base_url)
    }

    /// Host-style TMDB URL, the client adds the `/3` version segment.
    pub fn tmdb_url(&self) -> String {
        format!("{}/tmdb", self.base_url)
    }

    pub fn omdb_url(&self) -> String {
        format!("{}/omdb", self.base_url)
    }

    /// Requests received so far whose path starts with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

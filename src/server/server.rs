use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, info};

use super::state::{GuardedCatalogStore, ServerState};
use super::table_view::render_table;
use super::{log_requests, RequestsLoggingLevel, ServerConfig};
use crate::catalog::{CatalogStore, SortColumn, SortOrder};
use crate::media::StoredRecord;
use crate::metrics::metrics_handler;

#[derive(Deserialize, Debug, Default)]
struct ListQuery {
    sort: Option<String>,
    order: Option<String>,
}

impl ListQuery {
    /// Unknown columns or directions fall back to the defaults.
    fn resolve(&self) -> (SortColumn, SortOrder) {
        let sort = self
            .sort
            .as_deref()
            .and_then(SortColumn::from_str)
            .unwrap_or_default();
        let order = self
            .order
            .as_deref()
            .and_then(SortOrder::from_str)
            .unwrap_or_default();
        (sort, order)
    }
}

fn list_records(
    catalog: &GuardedCatalogStore,
    sort: SortColumn,
    order: SortOrder,
) -> Result<Vec<StoredRecord>, Response> {
    catalog.list(sort, order).map_err(|err| {
        error!("Failed to list media: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response()
    })
}

async fn home(
    State(catalog): State<GuardedCatalogStore>,
    Query(query): Query<ListQuery>,
) -> Response {
    let (sort, order) = query.resolve();
    match list_records(&catalog, sort, order) {
        Ok(rows) => Html(render_table(&rows, sort, order)).into_response(),
        Err(response) => response,
    }
}

async fn get_media(
    State(catalog): State<GuardedCatalogStore>,
    Query(query): Query<ListQuery>,
) -> Response {
    let (sort, order) = query.resolve();
    match list_records(&catalog, sort, order) {
        Ok(rows) => Json(rows).into_response(),
        Err(response) => response,
    }
}

pub fn make_app(config: ServerConfig, catalog_store: GuardedCatalogStore) -> Router {
    let state = ServerState::new(config, catalog_store);

    Router::new()
        .route("/", get(home))
        .route("/api/media", get(get_media))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    catalog_store: GuardedCatalogStore,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
    };
    let app = make_app(config, catalog_store);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Serving media table on port {}", port);

    Ok(axum::serve(listener, app).await?)
}

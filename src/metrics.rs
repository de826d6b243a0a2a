use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all movierater metrics
const PREFIX: &str = "movierater";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Ingestion Metrics
    pub static ref INGESTION_RUNS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_ingestion_runs_total"), "Total ingestion runs by status"),
        &["status"]
    ).expect("Failed to create ingestion_runs_total metric");

    pub static ref INGESTION_RUN_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_ingestion_run_duration_seconds"),
            "Ingestion run duration in seconds"
        )
        .buckets(vec![1.0, 10.0, 30.0, 60.0, 300.0, 900.0, 3600.0])
    ).expect("Failed to create ingestion_run_duration_seconds metric");

    pub static ref INGESTION_ITEMS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_ingestion_items_total"), "Feed items processed by outcome"),
        &["outcome"]
    ).expect("Failed to create ingestion_items_total metric");

    pub static ref LOOKUP_RESULTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_lookup_results_total"), "Metadata lookups by stage and outcome"),
        &["stage", "outcome"]
    ).expect("Failed to create lookup_results_total metric");

    pub static ref CATALOG_ROWS: Gauge = Gauge::new(
        format!("{PREFIX}_catalog_rows"),
        "Number of stored media records"
    ).expect("Failed to create catalog_rows metric");

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Already-registered errors are expected when tests call this repeatedly
    let _ = REGISTRY.register(Box::new(INGESTION_RUNS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(INGESTION_RUN_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(INGESTION_ITEMS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(LOOKUP_RESULTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_ROWS.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Outcome of a single metadata lookup stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Hit,
    Miss,
    Error,
}

impl LookupOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            LookupOutcome::Hit => "hit",
            LookupOutcome::Miss => "miss",
            LookupOutcome::Error => "error",
        }
    }
}

/// Record a finished ingestion run
pub fn record_ingestion_run(status: &str, duration: Duration) {
    INGESTION_RUNS_TOTAL.with_label_values(&[status]).inc();
    INGESTION_RUN_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record one feed item being inserted, skipped or failed
pub fn record_ingestion_item(outcome: &str) {
    INGESTION_ITEMS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record the outcome of a metadata lookup stage
pub fn record_lookup(stage: &str, outcome: LookupOutcome) {
    LOOKUP_RESULTS_TOTAL
        .with_label_values(&[stage, outcome.as_str()])
        .inc();
}

pub fn set_catalog_rows(count: usize) {
    CATALOG_ROWS.set(count as f64);
}

/// Record an HTTP request. `route` is the matched route template.
pub fn record_http_request(method: &str, route: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, route, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, route])
        .observe(duration.as_secs_f64());
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

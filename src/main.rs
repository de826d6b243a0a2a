use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movierater::catalog::{CatalogStore, SqliteCatalogStore};
use movierater::config::{self, AppConfig, DEFAULT_FEED_URL, DEFAULT_LANGUAGE};
use movierater::config::{DEFAULT_OMDB_API_URL, DEFAULT_TMDB_API_URL};
use movierater::ingestion::{IngestionPipeline, PeriodicIngestion};
use movierater::metrics;
use movierater::server::{run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite media database file.
    #[clap(long, env = "DB_PATH", value_parser = parse_path, default_value = config::DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// URL of the RSS feed to ingest.
    #[clap(long, env = "RSS_FEED_URL", default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// TMDB host, without the API version path.
    #[clap(long, env = "TMDB_API_URL", default_value = DEFAULT_TMDB_API_URL)]
    pub tmdb_api_url: String,

    /// TMDB API read access token.
    #[clap(long, env = "TMDB_API_KEY", hide_env_values = true)]
    pub tmdb_api_key: Option<String>,

    /// Base URL of the OMDb API.
    #[clap(long, env = "OMDB_API_URL", default_value = DEFAULT_OMDB_API_URL)]
    pub omdb_api_url: String,

    /// OMDb API key.
    #[clap(long, env = "OMDB_API_KEY", hide_env_values = true)]
    pub omdb_api_key: Option<String>,

    /// Language for TMDB searches.
    #[clap(long, env = "LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Hours between ingestion runs.
    #[clap(long, env = "UPDATE_INTERVAL", default_value_t = 24)]
    pub update_interval_hours: u64,

    /// Timeout in seconds for every outgoing HTTP request.
    #[clap(long, default_value_t = 30)]
    pub http_timeout_sec: u64,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Run a single ingestion and exit without serving the table.
    #[clap(long)]
    pub run_once: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_path: args.db_path.clone(),
            feed_url: args.feed_url.clone(),
            tmdb_api_url: args.tmdb_api_url.clone(),
            tmdb_api_key: args.tmdb_api_key.clone(),
            omdb_api_url: args.omdb_api_url.clone(),
            omdb_api_key: args.omdb_api_key.clone(),
            language: args.language.clone(),
            update_interval_hours: args.update_interval_hours,
            http_timeout_sec: args.http_timeout_sec,
            port: args.port,
            logging_level: args.logging_level.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_path: {:?}", app_config.db_path);
    info!("  feed: {}", app_config.feed.url);
    info!("  tmdb: {} ({})", app_config.tmdb.api_url, app_config.tmdb.language);
    info!("  omdb: {}", app_config.omdb.api_url);
    info!("  update interval: {}h", app_config.update_interval_hours);

    info!("Initializing metrics...");
    metrics::init_metrics();

    let catalog_store: Arc<dyn CatalogStore> =
        Arc::new(SqliteCatalogStore::new(&app_config.db_path));
    let pipeline = IngestionPipeline::from_config(&app_config, catalog_store.clone())?;

    if cli_args.run_once {
        let summary = pipeline.run()?;
        info!(
            "Single run done: {} fetched, {} inserted, {} skipped",
            summary.fetched, summary.inserted, summary.skipped
        );
        return Ok(());
    }

    // The table must exist before the first request, even if the first run fails
    catalog_store
        .init_schema()
        .context("Failed to initialize media database")?;

    let worker = PeriodicIngestion::spawn(pipeline, app_config.update_interval())?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let served = runtime.block_on(run_server(
        catalog_store,
        app_config.logging_level.clone(),
        app_config.port,
    ));

    if let Err(err) = &served {
        error!("Server stopped: {:#}", err);
    }
    worker.shutdown();
    served
}

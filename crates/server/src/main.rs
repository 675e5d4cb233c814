use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moviescout_core::{
    load_config, load_config_from_env, validate_config, AppwriteTrendingStore, Config,
    MovieCatalog, SqliteTrendingStore, TmdbClient, TrendingBackend, TrendingStore,
};
use moviescout_server::api::{create_router, create_router_with_static};
use moviescout_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_logging();

    // Determine config path; the file itself is optional
    let config_path = std::env::var("MOVIESCOUT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!(
            "No config file at {:?}, using defaults and environment",
            config_path
        );
        load_config_from_env().context("Failed to load config from environment")?
    };

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Trending backend: {:?}", config.trending.backend);
    info!("Debounce delay: {}ms", config.search.debounce_ms);

    let catalog: Arc<dyn MovieCatalog> =
        Arc::new(TmdbClient::new(&config.catalog).context("Failed to create catalog client")?);
    info!("Catalog client initialized ({})", config.catalog.base_url);

    let trending = create_trending_store(&config)?;

    let state = Arc::new(AppState::new(config.clone(), catalog, trending));

    let app = match std::env::var("MOVIESCOUT_STATIC_DIR") {
        Ok(dir) => {
            info!("Serving static client from {}", dir);
            create_router_with_static(state, &PathBuf::from(dir))
        }
        Err(_) => create_router(state),
    };

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// `RUST_LOG` filter, JSON output when `MOVIESCOUT_LOG_FORMAT=json`.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into());
    let json = std::env::var("MOVIESCOUT_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn create_trending_store(config: &Config) -> Result<Arc<dyn TrendingStore>> {
    let image_base_url = &config.catalog.image_base_url;
    match config.trending.backend {
        TrendingBackend::Sqlite => {
            let path = &config.trending.sqlite.path;
            let store = SqliteTrendingStore::new(path, image_base_url)
                .with_context(|| format!("Failed to open trending database {:?}", path))?;
            info!("Trending store initialized (sqlite at {:?})", path);
            Ok(Arc::new(store))
        }
        TrendingBackend::Appwrite => {
            let appwrite = config
                .trending
                .appwrite
                .as_ref()
                .context("Appwrite backend selected but no appwrite config provided")?;
            if appwrite.api_key.is_empty() {
                warn!("Appwrite API key is empty; trending requests will be rejected");
            }
            let store = AppwriteTrendingStore::new(appwrite)
                .context("Failed to create Appwrite trending store")?;
            info!("Trending store initialized (appwrite at {})", appwrite.endpoint);
            Ok(Arc::new(store))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

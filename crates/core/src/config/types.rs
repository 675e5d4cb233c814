use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub trending: TrendingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Movie catalog (TMDB) configuration.
///
/// The API key is injected into the client at construction; an empty key is
/// accepted and simply makes every request fail at the HTTP layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Bearer token sent with every catalog request.
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3)
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Image base URL for posters (default: https://image.tmdb.org/t/p/w500)
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Search behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Quiet period before a typed term turns into a query.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Drop responses that resolve after a newer search was issued.
    #[serde(default = "default_true")]
    pub discard_stale_responses: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            discard_stale_responses: true,
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

/// Trending store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrendingConfig {
    /// Store backend type
    #[serde(default)]
    pub backend: TrendingBackend,
    /// Number of entries in the leaderboard (default: 5)
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// SQLite-specific configuration
    #[serde(default)]
    pub sqlite: SqliteTrendingConfig,
    /// Appwrite-specific configuration (required when backend = "appwrite")
    #[serde(default)]
    pub appwrite: Option<AppwriteConfig>,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            backend: TrendingBackend::default(),
            limit: default_limit(),
            sqlite: SqliteTrendingConfig::default(),
            appwrite: None,
        }
    }
}

fn default_limit() -> u32 {
    5
}

/// Available trending store backends
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendingBackend {
    #[default]
    Sqlite,
    Appwrite,
}

/// SQLite trending store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteTrendingConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for SqliteTrendingConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("moviescout.db")
}

/// Appwrite document database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppwriteConfig {
    /// API endpoint (e.g., "https://cloud.appwrite.io/v1")
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    /// Server API key
    #[serde(default)]
    pub api_key: String,
    /// Image base URL used to build stored poster URLs
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: SanitizedCatalogConfig,
    pub search: SearchConfig,
    pub trending: SanitizedTrendingConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTrendingConfig {
    pub backend: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appwrite: Option<SanitizedAppwriteConfig>,
}

/// Sanitized Appwrite config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let trending = &config.trending;
        Self {
            server: config.server.clone(),
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                image_base_url: config.catalog.image_base_url.clone(),
                api_key_configured: !config.catalog.api_key.is_empty(),
                timeout_secs: config.catalog.timeout_secs,
            },
            search: config.search.clone(),
            trending: SanitizedTrendingConfig {
                backend: match trending.backend {
                    TrendingBackend::Sqlite => "sqlite".to_string(),
                    TrendingBackend::Appwrite => "appwrite".to_string(),
                },
                limit: trending.limit,
                sqlite_path: match trending.backend {
                    TrendingBackend::Sqlite => Some(trending.sqlite.path.clone()),
                    TrendingBackend::Appwrite => None,
                },
                appwrite: trending.appwrite.as_ref().map(|a| SanitizedAppwriteConfig {
                    endpoint: a.endpoint.clone(),
                    project_id: a.project_id.clone(),
                    database_id: a.database_id.clone(),
                    collection_id: a.collection_id.clone(),
                    api_key_configured: !a.api_key.is_empty(),
                }),
            },
        }
    }
}

pub mod config;
pub mod discovery;
pub mod external_catalog;
pub mod metrics;
pub mod render;
pub mod testing;
pub mod trending;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig, TrendingBackend,
};
pub use discovery::{
    DiscoverySession, PageHandle, PageState, SearchController, SearchOutcome, SessionOptions,
    TrendingLoader,
};
pub use external_catalog::{CatalogError, Movie, MovieCatalog, MovieQuery, TmdbClient};
pub use render::{render_page, PageView, RenderOptions, SectionView};
pub use trending::{
    AppwriteTrendingStore, SqliteTrendingStore, TrendingEntry, TrendingError, TrendingStore,
};

use std::sync::Arc;

use moviescout_core::{
    Config, MovieCatalog, RenderOptions, SanitizedConfig, SessionOptions, TrendingStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn MovieCatalog>,
    trending: Arc<dyn TrendingStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn MovieCatalog>,
        trending: Arc<dyn TrendingStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            trending,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> Arc<dyn MovieCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn trending(&self) -> Arc<dyn TrendingStore> {
        Arc::clone(&self.trending)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::from(&self.config)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from(&self.config)
    }
}

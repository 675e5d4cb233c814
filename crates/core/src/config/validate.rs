use super::{
    types::{Config, TrendingBackend},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Debounce delay and trending limit are non-zero
/// - The selected trending backend has its section
///
/// A missing catalog API key is deliberately not an error; requests fail at
/// the HTTP layer instead.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.search.debounce_ms == 0 {
        return Err(ConfigError::ValidationError(
            "search.debounce_ms cannot be 0".to_string(),
        ));
    }

    if config.trending.limit == 0 {
        return Err(ConfigError::ValidationError(
            "trending.limit cannot be 0".to_string(),
        ));
    }

    if config.trending.backend == TrendingBackend::Appwrite {
        let Some(appwrite) = &config.trending.appwrite else {
            return Err(ConfigError::ValidationError(
                "trending.backend = \"appwrite\" requires a [trending.appwrite] section"
                    .to_string(),
            ));
        };
        if appwrite.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(
                "trending.appwrite.endpoint cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

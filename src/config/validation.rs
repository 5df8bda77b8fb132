use crate::config::types::{ApiConfig, Config, CrawlerConfig, OutputConfig, SeedEntry};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates upstream API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.api_key_env.is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    validate_base_url("account_base", &config.account_base)?;

    if config.regional_bases.is_empty() {
        return Err(ConfigError::Validation(
            "regional_bases must list at least one endpoint".to_string(),
        ));
    }

    for base in &config.regional_bases {
        validate_base_url("regional_bases", base)?;
    }

    if config.requests_per_window < 1 {
        return Err(ConfigError::Validation(format!(
            "requests_per_window must be >= 1, got {}",
            config.requests_per_window
        )));
    }

    if config.window_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "window_seconds must be >= 1, got {}",
            config.window_seconds
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 120, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.matches_per_player < 1 || config.matches_per_player > 100 {
        return Err(ConfigError::Validation(format!(
            "matches_per_player must be between 1 and 100, got {}",
            config.matches_per_player
        )));
    }

    if config.target_inserted_players < 1 {
        return Err(ConfigError::Validation(format!(
            "target_inserted_players must be >= 1, got {}",
            config.target_inserted_players
        )));
    }

    if config.max_processed_players < 1 {
        return Err(ConfigError::Validation(format!(
            "max_processed_players must be >= 1, got {}",
            config.max_processed_players
        )));
    }

    if config.region_cap < 1 {
        return Err(ConfigError::Validation(format!(
            "region_cap must be >= 1, got {}",
            config.region_cap
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.leaderboard_path.is_empty() {
        return Err(ConfigError::Validation(
            "leaderboard_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates seed players
fn validate_seeds(seeds: &[SeedEntry]) -> Result<(), ConfigError> {
    for seed in seeds {
        if seed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "seed name cannot be empty".to_string(),
            ));
        }

        if seed.tag.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "seed '{}' must have a tag",
                seed.name
            )));
        }

        if seed.tag.contains('#') {
            return Err(ConfigError::Validation(format!(
                "seed tag '{}' must not include the '#' separator",
                seed.tag
            )));
        }
    }

    Ok(())
}

/// Validates an API base URL: HTTPS, a host, and no path
fn validate_base_url(field: &str, base: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, base, e)))?;

    if url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use HTTPS scheme",
            field, base
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, base
        )));
    }

    if url.path() != "/" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must not include a path",
            field, base
        )));
    }

    Ok(())
}

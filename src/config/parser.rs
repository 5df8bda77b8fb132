use crate::config::types::{ApiConfig, Config};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use rift_ripple::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Region cap: {}", config.crawler.region_cap);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Recorded on every crawl run so runs made with different settings can be told apart.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Reads the API key from the environment variable named in the config
///
/// A missing or blank key is fatal: nothing can be fetched without it.
pub fn resolve_api_key(config: &ApiConfig) -> Result<String, ConfigError> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ConfigError::MissingApiKey(config.api_key_env.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CapPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[api]
account-base = "https://americas.api.riotgames.com"
regional-bases = [
    "https://americas.api.riotgames.com",
    "https://europe.api.riotgames.com",
]

[crawler]
target-inserted-players = 1000
max-processed-players = 2000
region-cap = 200
on-cap-exhausted = "continue"

[output]
database-path = "./test.db"
leaderboard-path = "./leaderboard.md"

[[seed]]
name = "Kasboy"
tag = "EUW"

[[seed]]
name = "Westie"
tag = "KR001"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.api.regional_bases.len(), 2);
        assert_eq!(config.api.requests_per_window, 190);
        assert_eq!(config.api.window_seconds, 120);
        assert_eq!(config.api.api_key_env, "RIOT_API_KEY");
        assert_eq!(config.crawler.matches_per_player, 5);
        assert_eq!(config.crawler.region_cap, 200);
        assert_eq!(config.crawler.on_cap_exhausted, CapPolicy::Continue);
        assert_eq!(config.seeds.len(), 2);
        assert_eq!(config.seeds[1].tag, "KR001");
    }

    #[test]
    fn test_min_spacing_from_defaults() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        let spacing = config.api.min_spacing().as_secs_f64();
        assert!((spacing - 120.0 / 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = VALID_CONFIG.replace("region-cap = 200", "region-cap = 0");
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let file = create_temp_config(VALID_CONFIG);
        let mut config = load_config(file.path()).unwrap();
        config.api.api_key_env = "RIFT_RIPPLE_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let result = resolve_api_key(&config.api);
        assert!(matches!(result, Err(ConfigError::MissingApiKey(_))));
    }
}

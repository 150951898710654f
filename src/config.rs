//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::ClientConfig;

/// Catalog service used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://bff-analyse.vercel.app";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog service connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means no client-side timeout; scraping calls can run for a while
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Dashboard controller behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Reviews fetched when an app is selected
    #[serde(default = "default_review_limit")]
    pub review_limit: u32,

    /// Reviews the service is asked to scrape per collect action
    #[serde(default = "default_collect_limit")]
    pub collect_limit: u32,

    /// Reviews the service is asked to classify per analyze action
    #[serde(default = "default_analyze_limit")]
    pub analyze_limit: u32,

    /// Skip refetching the category vocabulary once loaded
    #[serde(default)]
    pub cache_categories: bool,
}

fn default_review_limit() -> u32 {
    20
}

fn default_collect_limit() -> u32 {
    50
}

fn default_analyze_limit() -> u32 {
    100
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            review_limit: default_review_limit(),
            collect_limit: default_collect_limit(),
            analyze_limit: default_analyze_limit(),
            cache_categories: false,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, or the first default location that exists
    ///
    /// An explicit path that fails to load is an error; default locations
    /// that fail are skipped with a warning.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_with_env(path);
        }

        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::from_env())
    }

    /// Default config file locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("appsight").join("config.toml")),
            Some(PathBuf::from("./appsight.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("APPSIGHT_API_URL") {
            self.service.base_url = url;
        }
        if let Ok(timeout) = std::env::var("APPSIGHT_REQUEST_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.service.request_timeout_secs = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid APPSIGHT_REQUEST_TIMEOUT_SECS: {}", timeout),
            }
        }

        if let Ok(level) = std::env::var("APPSIGHT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("APPSIGHT_LOG_FORMAT") {
            match format.parse() {
                Ok(f) => self.logging.format = f,
                Err(e) => tracing::warn!("Ignoring APPSIGHT_LOG_FORMAT: {}", e),
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Appsight Configuration
#
# Environment variables override these settings:
# - APPSIGHT_API_URL
# - APPSIGHT_REQUEST_TIMEOUT_SECS
# - APPSIGHT_LOG_LEVEL
# - APPSIGHT_LOG_FORMAT

[service]
# Catalog service base URL
base_url = "{}"

# Client-side request timeout in seconds (unset = wait as long as needed)
# request_timeout_secs = 60

[dashboard]
# Reviews loaded when an app is selected
review_limit = 20

# Reviews scraped per "collect" action
collect_limit = 50

# Reviews classified per "analyze" action
analyze_limit = 100

# Reuse the category list once loaded
cache_categories = false

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/appsight/appsight.log"
"#,
        DEFAULT_API_URL
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.service.base_url, DEFAULT_API_URL);
        assert!(config.service.request_timeout_secs.is_none());
        assert_eq!(config.dashboard.review_limit, 20);
        assert_eq!(config.dashboard.collect_limit, 50);
        assert_eq!(config.dashboard.analyze_limit, 100);
        assert!(!config.dashboard.cache_categories);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.service.base_url, DEFAULT_API_URL);
        assert_eq!(config.dashboard.review_limit, 20);
        assert_eq!(config.dashboard.analyze_limit, 100);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
base_url = "http://localhost:5000"
request_timeout_secs = 90

[dashboard]
review_limit = 5
cache_categories = true

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.service.base_url, "http://localhost:5000");
        assert_eq!(
            config.service.client_config().request_timeout,
            Some(Duration::from_secs(90))
        );
        assert_eq!(config.dashboard.review_limit, 5);
        assert_eq!(config.dashboard.collect_limit, 50);
        assert!(config.dashboard.cache_categories);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[dashboard]\nreview_limit = \"many\"\n").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}

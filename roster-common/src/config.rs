//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (highest priority, with `ROSTER_*` env fallbacks)
//! 2. TOML config file
//! 3. Compiled defaults (fallback)
//!
//! A missing TOML file is not an error: a warning is logged and defaults
//! are used. A TOML file that exists but does not parse is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "ROSTER_CONFIG";

/// Bootstrap configuration as read from the TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Image URL stored when a submission carries no profile picture
    #[serde(default = "default_placeholder_image_url")]
    pub placeholder_image_url: String,

    /// Timeout applied to every outbound HTTP request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosted data backend (rows + object storage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    #[serde(default)]
    pub url: String,

    /// Anon/service key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,
}

/// External semantic-search service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_url")]
    pub url: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_placeholder_image_url() -> String {
    "https://placehold.co/400x400?text=Profile".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_table() -> String {
    "attendees".to_string()
}

fn default_bucket() -> String {
    "profiles".to_string()
}

fn default_search_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            placeholder_image_url: default_placeholder_image_url(),
            http_timeout_secs: default_http_timeout_secs(),
            backend: BackendConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
            bucket: default_bucket(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: default_search_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Command-line overrides applied on top of the TOML file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backend_url: Option<String>,
    pub backend_api_key: Option<String>,
    pub search_url: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub placeholder_image_url: String,
    pub http_timeout: Duration,
    pub backend: BackendConfig,
    pub search: SearchConfig,
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge TOML values with CLI overrides and validate the result
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the backend URL or API key is empty
    /// after merging.
    pub fn resolve(toml_config: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let mut backend = toml_config.backend;
        if let Some(url) = overrides.backend_url {
            backend.url = url;
        }
        if let Some(key) = overrides.backend_api_key {
            backend.api_key = key;
        }
        backend.url = backend.url.trim_end_matches('/').to_string();

        if backend.url.trim().is_empty() {
            return Err(Error::Config(
                "Data backend URL not configured. Set --backend-url, ROSTER_BACKEND_URL \
                 or [backend] url in the config file"
                    .to_string(),
            ));
        }
        if backend.api_key.trim().is_empty() {
            return Err(Error::Config(
                "Data backend API key not configured. Set --backend-key, ROSTER_BACKEND_KEY \
                 or [backend] api_key in the config file"
                    .to_string(),
            ));
        }

        let mut search = toml_config.search;
        if let Some(url) = overrides.search_url {
            search.url = url;
        }
        search.url = search.url.trim_end_matches('/').to_string();

        Ok(Self {
            host: overrides.host.unwrap_or(toml_config.host),
            port: overrides.port.unwrap_or(toml_config.port),
            placeholder_image_url: toml_config.placeholder_image_url,
            http_timeout: Duration::from_secs(toml_config.http_timeout_secs),
            backend,
            search,
            log_level: overrides.log_level.unwrap_or(toml_config.logging.level),
        })
    }

    /// `host:port` string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Config file resolution:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Platform config dir: `<config_dir>/roster/config.toml`
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("roster").join("config.toml"))
}

/// Load the TOML config, falling back to defaults when the file is missing
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        warn!("No config directory on this platform, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

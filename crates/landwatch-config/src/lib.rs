//! Configuration management for landwatch
//!
//! This module handles loading, validation, and management of
//! landwatch configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
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

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Session provider settings
///
/// Sign-in is handled by an external provider sitting in front of the
/// server. It forwards the signed-in user's email in a trusted header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header carrying the authenticated email
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
    /// Where the sign-in form posts to
    #[serde(default = "default_sign_in_url")]
    pub sign_in_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            identity_header: default_identity_header(),
            sign_in_url: default_sign_in_url(),
        }
    }
}

fn default_identity_header() -> String {
    "x-auth-request-email".to_string()
}

fn default_sign_in_url() -> String {
    "/oauth2/sign_in".to_string()
}

/// Upstream transaction API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Scheme and host of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the price-change ranking endpoint
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Request timeout in seconds; unset leaves it to the network stack
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.kbland.kr".to_string()
}

fn default_search_path() -> String {
    "/land-extra/hub/v1/api/rank/upDownPriceList".to_string()
}

impl UpstreamConfig {
    /// Full URL of the search endpoint
    pub fn search_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.search_path.trim_start_matches('/')
        )
    }
}

/// Keyword store backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted REST table
    Rest,
    /// Process-local map, lost on restart
    Memory,
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Rest
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" => Ok(StoreBackend::Rest),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Rest => write!(f, "rest"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Keyword store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Base URL of the REST endpoint (e.g. `https://<project>.supabase.co/rest/v1`)
    #[serde(default)]
    pub url: String,
    /// Anonymous API key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: String,
    /// Table holding (user_id, keyword) rows
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
        }
    }
}

fn default_table() -> String {
    "user_keywords".to_string()
}

/// Region code reference dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionsConfig {
    /// Path to the legal-dong code CSV
    #[serde(default = "default_regions_path")]
    pub path: PathBuf,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            path: default_regions_path(),
        }
    }
}

fn default_regions_path() -> PathBuf {
    PathBuf::from("./data/location-code.csv")
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Session provider settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Transaction API settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Keyword store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Region dataset settings
    #[serde(default)]
    pub regions: RegionsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError,
        })?;

        let config = Self::from_yaml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.auth.identity_header.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "auth.identity_header".to_string(),
            });
        }

        if !self.upstream.base_url.starts_with("http://")
            && !self.upstream.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "upstream.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.upstream.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "upstream.timeout_secs".to_string(),
                reason: "Timeout must be greater than 0 when set".to_string(),
            });
        }

        if self.store.backend == StoreBackend::Rest {
            if self.store.url.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "store.url".to_string(),
                });
            }
            if self.store.table.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "store.table".to_string(),
                });
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

//! Configuration loading

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Production mode: session cookies get the Secure flag
    #[serde(default)]
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            production: false,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite:./data/postgate.db?mode=rwc`
    #[serde(default)]
    pub url: Option<String>,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens; no default
    #[serde(default)]
    pub token_secret: Option<String>,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

/// Longest accepted token lifetime (one year)
const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 3600;

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_token_ttl_secs() -> i64 {
    3600 // 1 hour
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

/// Values that can override the file, usually from flags or the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub token_secret: Option<String>,
    pub production: Option<bool>,
}

impl Config {
    /// Load configuration from a file, falling back to defaults if it is absent
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Apply flag/environment overrides on top of the file values
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(bind) = overrides.bind {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(production) = overrides.production {
            self.server.production = production;
        }
        if overrides.database_url.is_some() {
            self.database.url = overrides.database_url;
        }
        if overrides.token_secret.is_some() {
            self.auth.token_secret = overrides.token_secret;
        }
    }

    /// Database connection string; startup fails without one
    pub fn database_url(&self) -> Result<&str> {
        match self.database.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => bail!("DATABASE_URL is not set; refusing to start"),
        }
    }

    /// Token signing secret; startup fails without one
    pub fn token_secret(&self) -> Result<&str> {
        match self.auth.token_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => bail!("ACCESS_TOKEN_SECRET is not set; refusing to start"),
        }
    }

    /// Check every required setting before anything is started
    pub fn validate(&self) -> Result<()> {
        self.database_url()?;
        self.token_secret()?;
        if self.auth.token_ttl_secs <= 0 || self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            bail!(
                "auth.token_ttl_secs must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECS,
                self.auth.token_ttl_secs
            );
        }
        Ok(())
    }
}

use config::{Config, ConfigError, Environment, File};
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::core::geolocation::LocationOptions;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid upstream base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub cache: CacheSettings,
    pub site: SiteSettings,
    #[serde(default)]
    pub geolocation: GeolocationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    pub base_url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationSettings {
    #[serde(default = "default_location_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_location_max_age")]
    pub maximum_age_secs: u64,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_location_timeout(),
            maximum_age_secs: default_location_max_age(),
        }
    }
}

impl GeolocationSettings {
    pub fn options(&self) -> LocationOptions {
        LocationOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            maximum_age: Duration::from_secs(self.maximum_age_secs),
        }
    }
}

fn default_upstream_timeout() -> u64 { 30 }
fn default_cache_ttl() -> u64 { 3600 }
fn default_cache_entries() -> u64 { 1000 }
fn default_location_timeout() -> u64 { 10 }
fn default_location_max_age() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with THIRD_PLACES)
    /// 5. `API_URL`, `LOG_LEVEL` and `LOG_FORMAT`
    pub fn load() -> Result<Self, SettingsError> {
        let builder = with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., THIRD_PLACES__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("THIRD_PLACES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let builder = env_override(builder, "API_URL", "upstream.base_url")?;
        let builder = env_override(builder, "LOG_LEVEL", "logging.level")?;
        let builder = env_override(builder, "LOG_FORMAT", "logging.format")?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings: Settings = with_defaults(Config::builder())?
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("THIRD_PLACES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check the upstream base URL once, before anything uses it
    pub fn validate(&self) -> Result<(), SettingsError> {
        let url = &self.upstream.base_url;
        let parsed = Url::parse(url).map_err(|e| SettingsError::InvalidBaseUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::InvalidBaseUrl {
                url: url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs)
    }
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

/// Let a bare environment variable override one config key
fn env_override(builder: Builder, var: &str, key: &str) -> Result<Builder, ConfigError> {
    match std::env::var(var) {
        Ok(value) => builder.set_override(key, value),
        Err(_) => Ok(builder),
    }
}

fn with_defaults(builder: Builder) -> Result<Builder, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("upstream.base_url", "http://localhost:8000")?
        .set_default("upstream.timeout_secs", default_upstream_timeout())?
        .set_default("cache.ttl_secs", default_cache_ttl())?
        .set_default("cache.max_entries", default_cache_entries())?
        .set_default("site.base_url", "http://localhost:3000")
}

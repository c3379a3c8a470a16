//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record dataset configuration.
    #[serde(default)]
    pub data: DataConfig,
    /// Organization-wide settings.
    #[serde(default)]
    pub organization: OrganizationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
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
    8080
}

/// Record dataset configuration.
///
/// Entries, plans, real-consumption records and contracts are owned by an
/// external store; the server loads a JSON snapshot of them when a path is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// Path to a JSON dataset. Starts with an empty store when unset.
    pub dataset_path: Option<String>,
}

/// Organization-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// IANA timezone used to decide calendar-day boundaries.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

impl OrganizationConfig {
    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the name is not a known IANA zone.
    pub fn timezone(&self) -> AppResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| {
            AppError::Configuration(format!("invalid timezone '{}': {e}", self.timezone))
        })
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GASCON").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

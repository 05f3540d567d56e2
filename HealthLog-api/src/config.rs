use std::path::PathBuf;

use anyhow::Context;
use health_log_domain::database::DatabaseConfig;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default location of the client configuration document
pub const DEFAULT_CONFIG_FILE: &str = "config/configuration.json";

/// Server settings read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to listen on (`PORT`)
    pub port: u16,

    /// JSON document served by `GET /api/config` (`APP_CONFIG_FILE`)
    pub config_file: PathBuf,

    /// Database settings (`DB_*`)
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", value))?,
            Err(_) => DEFAULT_PORT,
        };

        let config_file = std::env::var("APP_CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Ok(Self {
            port,
            config_file,
            database: DatabaseConfig::from_env(),
        })
    }
}

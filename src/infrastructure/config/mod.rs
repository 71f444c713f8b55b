use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::contact::ImportConfig;
use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "contact-import.toml";
pub const ENV_PREFIX: &str = "CONTACT_IMPORT_";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upload size limit enforced at the HTTP boundary
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://contacts.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub import: ImportConfig,
}

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    /// Defaults, then `contact-import.toml` if present, then `CONTACT_IMPORT_*` env vars
    pub fn new() -> Self {
        Self::from_figment(
            Figment::from(Serialized::defaults(AppConfig::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = self.figment.extract()?;

        config.import.validate().map_err(|e| {
            AppError::ConfigError(format!("Invalid import config: {}", e))
        })?;
        if config.database.max_connections == 0 {
            return Err(AppError::ConfigError(
                "database.max_connections must be > 0".to_string(),
            ));
        }

        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

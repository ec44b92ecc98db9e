//! Configuration for the relief backend.
//!
//! Sources are layered: built-in defaults, then an optional file (path taken
//! from `RELIEF_CONFIG`), then `RELIEF_*` environment variables with `__` as
//! the nesting separator (`RELIEF_SERVER__PORT=9000`).

use common::model::response::ResponseStatus;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the optional configuration file.
pub const CONFIG_PATH_VAR: &str = "RELIEF_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReliefConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum JSON body size in bytes
    #[serde(default = "default_json_limit")]
    pub json_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            json_limit: default_json_limit(),
        }
    }
}

/// Where the catalog, venues, responses and need statuses live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    #[default]
    Memory,

    Sqlite {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Status given to new volunteer responses
    #[serde(default = "default_response_status")]
    pub default_response_status: ResponseStatus,

    /// Seed the predefined category tree at startup
    #[serde(default = "default_true")]
    pub seed_catalog: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_response_status: default_response_status(),
            seed_catalog: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `env_logger` filter used when `RUST_LOG` is not set
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

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_json_limit() -> usize {
    1024 * 1024
}

fn default_response_status() -> ResponseStatus {
    ResponseStatus::Pending
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ReliefConfig {
    /// Loads the layered configuration. A missing file is not an error.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ReliefConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RELIEF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let loaded: ReliefConfig = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Loads using the file named by `RELIEF_CONFIG`, if any.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).ok();
        Self::load(path.as_deref())
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if !matches!(
            self.engine.default_response_status,
            ResponseStatus::Pending | ResponseStatus::Confirmed
        ) {
            return Err(config::ConfigError::Message(format!(
                "engine.default_response_status must be pending or confirmed, got {}",
                self.engine.default_response_status
            )));
        }
        if let StorageConfig::Sqlite { path } = &self.storage {
            if path.as_os_str().is_empty() {
                return Err(config::ConfigError::Message(
                    "storage.path must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Environment variable missing: {name}")]
    MissingEnvironmentVariable { name: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Connection settings for the hosted data store's REST API.
///
/// `store_url` and `store_key` have no defaults: the process refuses to
/// start without them.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub store_url: String,
    pub store_key: String,
    #[serde(default = "default_cart_table")]
    pub cart_table_name: String,
    #[serde(default = "default_store_timeout")]
    pub store_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

impl Config {
    pub fn from_environment() -> Result<Self, ConfigError> {
        let server = ServerConfig::from_env()?;
        let store = StoreConfig::from_env()?;
        let observability = ObservabilityConfig::from_env()?;

        let config = Config {
            server,
            store,
            observability,
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if !self.store.store_url.starts_with("http://")
            && !self.store.store_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError {
                message: "Store URL must be an http(s) endpoint".to_string(),
            });
        }

        if self.store.cart_table_name.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Cart table name cannot be empty".to_string(),
            });
        }

        if self.store.store_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Store request timeout cannot be 0".to_string(),
            });
        }

        Ok(())
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("CART"))
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load server config: {}", e),
            })?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to deserialize server config: {}", e),
            })
    }
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        // The store endpoint and access key are required; everything
        // else has a default.
        for name in ["CART_STORE_URL", "CART_STORE_KEY"] {
            let present = std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false);
            if !present {
                return Err(ConfigError::MissingEnvironmentVariable {
                    name: name.to_string(),
                });
            }
        }

        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("CART"))
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load store config: {}", e),
            })?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to deserialize store config: {}", e),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("CART"))
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load observability config: {}", e),
            })?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to deserialize observability config: {}", e),
            })
    }
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    5001
}

pub(crate) fn default_cart_table() -> String {
    "cart_items".to_string()
}

pub(crate) fn default_store_timeout() -> u64 {
    10
}

pub(crate) fn default_service_name() -> String {
    "cart-rs".to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_enable_json_logging() -> bool {
    false
}

//! Server configuration
//!
//! Layered configuration: built-in defaults, an optional `config.toml`,
//! `HTTP_STREAMING_*` environment variables, and finally the Azure Functions
//! custom handler port.

use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const ENV_PREFIX: &str = "HTTP_STREAMING";
const CUSTOM_HANDLER_PORT_VAR: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";
const CONFIG_FILE: &str = "config";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

/// Server configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// Listening port, 0 for an OS-assigned port
    /// Environment: FUNCTIONS_CUSTOMHANDLER_PORT, then HTTP_STREAMING_PORT
    pub port: u16,

    /// Storage Root directory; a per-process temp directory when unset
    /// Environment: HTTP_STREAMING_STORAGE
    #[serde(default)]
    pub storage: Option<String>,

    /// How long `stop` waits for in-flight requests
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            storage: None,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from ./config.toml (optional) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE, std::env::vars().collect())
    }

    /// Load configuration from the given config file base name and environment map
    pub fn load_from(config_path: &str, env: Map<String, String>) -> Result<Self, ConfigError> {
        let handler_port = env.get(CUSTOM_HANDLER_PORT_VAR).cloned();

        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("shutdown_grace_secs", DEFAULT_SHUTDOWN_GRACE_SECS as i64)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(Some(env)),
            )
            .set_override_option("port", handler_port)?
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if let Some(storage) = &self.storage {
            if storage.trim().is_empty() {
                return Err(ConfigError::Message("storage cannot be blank".into()));
            }
        }

        Ok(())
    }

    /// Get bind address and port as socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Storage Root as configured, or a per-process directory under the temp dir
    pub fn storage_path(&self) -> PathBuf {
        match &self.storage {
            Some(storage) => PathBuf::from(storage),
            None => std::env::temp_dir().join(format!(
                "http-streaming-storage-{}",
                std::process::id()
            )),
        }
    }

    /// Get shutdown grace period as Duration
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

//! Configuration management for volbridge
//!
//! Settings are read once at startup and never change afterwards. Sources,
//! highest priority first:
//!
//! 1. command-line overrides ([`Overrides`])
//! 2. `PACTL_*` environment variables (`PACTL_HTTP_PORT`, `PACTL_SINK`, ...)
//! 3. a config file, `/etc/volbridge/config.toml` unless another is given
//! 4. built-in defaults

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Prefix shared by all environment variables
pub const ENV_PREFIX: &str = "PACTL";

/// System-wide configuration file, optional
pub const SYSTEM_CONFIG_FILE: &str = "/etc/volbridge/config.toml";

pub const DEFAULT_PORT: u16 = 8990;
pub const DEFAULT_SINK: &str = "@DEFAULT_SINK@";
pub const DEFAULT_BINARY: &str = "pactl";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 5;

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Loopback port to listen on
    pub http_port: u16,

    /// Sink passed to every pactl call
    pub sink: String,

    /// pactl binary, looked up on `PATH` when not absolute
    pub binary: String,

    /// Deadline for a single pactl invocation
    pub command_timeout_secs: u64,

    /// Log filter directive; falls back to `RUST_LOG`, then `info`
    pub log_level: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_PORT,
            sink: DEFAULT_SINK.to_string(),
            binary: DEFAULT_BINARY.to_string(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            log_level: None,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub http_port: Option<u16>,
    pub sink: Option<String>,
}

impl BridgeConfig {
    /// Load configuration from all sources
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::load_with_env(overrides, Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration reading variables from `env` instead of the process environment
    pub fn load_with_env(overrides: &Overrides, env: Environment) -> Result<Self, ConfigError> {
        let file = match &overrides.config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Path::new(SYSTEM_CONFIG_FILE)).required(false),
        };

        let config: Self = Config::builder()
            .add_source(file)
            .add_source(env.try_parsing(true))
            .set_override_option("http_port", overrides.http_port.map(i64::from))?
            .set_override_option("sink", overrides.sink.clone())?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Reject settings no request could succeed with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sink.trim().is_empty() {
            return Err(ConfigError::Invalid("sink must not be empty".into()));
        }
        if self.binary.trim().is_empty() {
            return Err(ConfigError::Invalid("binary must not be empty".into()));
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "command_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Address to bind; always loopback
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.http_port))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

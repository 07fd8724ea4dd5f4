//! # Game Configuration
//!
//! Runtime settings loaded from a TOML file. Every field has a default, so
//! an empty file (or no file) is a valid configuration.
//!
//! ```toml
//! [server]
//! tick_interval_ms = 50
//! join_timeout_ms = 5000
//!
//! [client]
//! frame_limit = 300
//! target_fps = 60
//!
//! [log]
//! filter = "info"
//! ```
//!
//! ECS capacities are compile-time constants and not configurable here.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use voxelgame_shared::SERVER_JOIN_TIMEOUT_MS;

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Server thread settings.
    pub server: ServerConfig,
    /// Client frame loop settings.
    pub client: ClientConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// Server thread settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Time between two world updates.
    pub tick_interval_ms: u64,
    /// How long shutdown waits for the thread before detaching it.
    pub join_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            join_timeout_ms: SERVER_JOIN_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    /// Tick interval as a duration.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Join timeout as a duration.
    #[must_use]
    pub const fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }
}

/// Client frame loop settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Number of frames the game runs before it returns.
    pub frame_limit: u64,
    /// Target frames per second.
    pub target_fps: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            frame_limit: 300,
            target_fps: 60,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing_subscriber` filter used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

impl GameConfig {
    /// Loads and validates the config file at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise see
    /// [`GameConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML or unknown keys,
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "server.tick_interval_ms",
                reason: "must be greater than zero",
            });
        }
        if self.client.target_fps == 0 {
            return Err(ConfigError::Invalid {
                field: "client.target_fps",
                reason: "must be greater than zero",
            });
        }
        if self.client.frame_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "client.frame_limit",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

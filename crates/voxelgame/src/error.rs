//! # Engine Error Types
//!
//! Failures of the engine glue. ECS failures are wrapped unchanged.

use std::path::PathBuf;

use thiserror::Error;
use voxelgame_core::EcsError;

/// Errors that can occur while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::GameConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Errors that can occur in the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// ECS operation failed.
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The OS refused to spawn the server thread.
    #[error("failed to spawn server thread: {0}")]
    ServerSpawn(#[source] std::io::Error),

    /// The server thread reported a failed start.
    #[error("the server failed to start: {reason}")]
    ServerStartFailed {
        /// Reason reported by the server thread.
        reason: String,
    },

    /// `start` was called on a running server.
    #[error("the server is already running")]
    ServerAlreadyRunning,

    /// The game was used before `initialize`.
    #[error("the game is not initialized")]
    NotInitialized,

    /// The log subscriber could not be installed.
    #[error("failed to install logging: {0}")]
    Logging(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

//! # Logging
//!
//! Installs the global `tracing` subscriber. Events carry the thread name,
//! so everything logged by the server thread shows up as `server`.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{EngineError, EngineResult};

/// Installs a formatting subscriber.
///
/// `RUST_LOG` wins over the configured filter when set.
///
/// # Errors
///
/// [`EngineError::Logging`] if the filter does not parse or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> EngineResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|err| EngineError::Logging(err.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .try_init()
        .map_err(|err| EngineError::Logging(err.to_string()))
}

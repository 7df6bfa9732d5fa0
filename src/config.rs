//! Instance configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// How writes to the shared slot behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Unconditional overwrite; concurrent saves silently lose updates.
    /// The baseline behavior.
    LastWriteWins,
    /// Versioned write: a save against a slot that moved is rejected and
    /// the next poll adopts the winning state instead.
    CompareAndSwap,
}

/// Sync loop and persistence settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Polling period of the sync loop, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Conflict policy for slot writes.
    #[serde(default = "default_write_mode")]
    write_mode: WriteMode,
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_write_mode() -> WriteMode {
    WriteMode::LastWriteWins
}

impl SyncConfig {
    /// Creates a configuration with an explicit period and write mode.
    pub fn new(poll_interval_ms: u64, write_mode: WriteMode) -> Self {
        Self {
            poll_interval_ms,
            write_mode,
        }
    }

    /// Loads configuration from a TOML file. Missing fields take their
    /// defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!(path = %path.as_ref().display(), "loading sync config");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("failed to parse config: {}", e)))?;

        info!(
            poll_interval_ms = config.poll_interval_ms,
            write_mode = ?config.write_mode,
            "sync config loaded"
        );
        Ok(config)
    }

    /// The polling period as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            write_mode: default_write_mode(),
        }
    }
}

/// Configuration error with caller location.
#[derive(Debug, Clone, Display, Error)]
#[display("config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

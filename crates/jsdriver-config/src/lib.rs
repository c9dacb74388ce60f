//! Shared configuration for the JavaScript driver.
//!
//! Values are layered by `ortho_config`: built-in defaults, then an optional
//! TOML file (`--config-path` or `JSDRIVER_CONFIG_PATH`), then `JSDRIVER_*`
//! environment variables, then command-line flags. Later layers win.
//!
//! | Key                 | Flag                  | Default  |
//! |---------------------|-----------------------|----------|
//! | `log_filter`        | `--log-filter`        | `info`   |
//! | `log_format`        | `--log-format`        | `json`   |
//! | `mode`              | `--mode`              | `stream` |
//! | `workers`           | `--workers`           | `1`      |
//! | `max_request_bytes` | `--max-request-bytes` | 1 MiB    |

mod defaults;
mod logging;
mod mode;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_MAX_REQUEST_BYTES, DEFAULT_WORKERS, default_log_filter,
    default_log_filter_string, default_log_format, default_max_request_bytes, default_mode,
    default_workers,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use mode::{RunMode, RunModeParseError};

/// Resolved driver configuration.
///
/// Loading goes through [`OrthoConfig`](trait@OrthoConfig), which callers
/// bring into scope: `Config::load()` reads the process arguments and
/// `Config::load_from_iter` takes an explicit argument list whose first item
/// is the program name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "JSDRIVER_")]
pub struct Config {
    /// `tracing` filter expression, for example `info` or `jsdriverd=debug`.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// Input framing.
    #[serde(default = "defaults::default_mode")]
    pub mode: RunMode,
    /// Number of threads parsing requests concurrently in stream mode.
    #[serde(default = "defaults::default_workers")]
    pub workers: usize,
    /// Largest accepted request line, in bytes.
    #[serde(default = "defaults::default_max_request_bytes")]
    pub max_request_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            mode: default_mode(),
            workers: default_workers(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

impl Config {
    /// Checks values the loader cannot express as types.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.max_request_bytes == 0 {
            return Err(ConfigError::ZeroRequestLimit);
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        Ok(())
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Input framing.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Worker thread count.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Request size limit in bytes.
    #[must_use]
    pub const fn max_request_bytes(&self) -> usize {
        self.max_request_bytes
    }
}

/// Settings that loaded but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `workers` was zero.
    #[error("workers must be at least 1")]
    ZeroWorkers,
    /// `max_request_bytes` was zero.
    #[error("max_request_bytes must be at least 1")]
    ZeroRequestLimit,
    /// `log_filter` was blank.
    #[error("log_filter must not be empty")]
    EmptyLogFilter,
}

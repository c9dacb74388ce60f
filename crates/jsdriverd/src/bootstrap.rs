//! Driver bootstrap orchestration.

use std::io::{BufRead, Write};
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use jsdriver_config::{Config, ConfigError, RunMode};

use crate::dispatch::{DispatchError, RequestHandler};
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{ServeOptions, ServiceStats, serve, single_shot};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the driver configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader error when a configuration layer cannot be read.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to `Config::load`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that always returns the same, already resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Configuration loaded but holds unusable values.
    #[error("invalid configuration: {source}")]
    InvalidConfiguration {
        /// Validation failure.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// A bootstrapped driver, ready to answer requests.
pub struct Driver {
    config: Config,
    handler: RequestHandler,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Driver {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the request handler.
    #[must_use]
    pub const fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Answers requests from `reader` on `writer` using the configured mode.
    ///
    /// # Errors
    ///
    /// Returns an error when reading input or writing output fails.
    pub fn run<R, W>(&self, reader: R, writer: W) -> Result<ServiceStats, DispatchError>
    where
        R: BufRead,
        W: Write + Send,
    {
        let result = match self.config.mode() {
            RunMode::Stream => serve(
                &self.handler,
                reader,
                writer,
                ServeOptions::from_config(&self.config),
            ),
            RunMode::SingleShot => single_shot(
                &self.handler,
                reader,
                writer,
                self.config.max_request_bytes(),
            ),
        };
        match &result {
            Ok(stats) => self.reporter.session_finished(stats),
            Err(error) => self.reporter.session_failed(error),
        }
        result
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

/// Bootstraps the driver using the supplied collaborators.
///
/// # Errors
///
/// Returns an error when configuration cannot be loaded or validated, or
/// telemetry cannot be installed. The reporter is told about the failure
/// before it is returned.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Driver, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    if let Err(source) = config.validate() {
        let error = BootstrapError::InvalidConfiguration { source };
        reporter.bootstrap_failed(&error);
        return Err(error);
    }

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    reporter.bootstrap_succeeded(&config);
    Ok(Driver {
        config,
        handler: RequestHandler::default(),
        telemetry,
        reporter,
    })
}

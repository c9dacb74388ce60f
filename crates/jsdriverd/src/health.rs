//! Structured health reporting for driver lifecycle events.

use std::sync::Arc;

use jsdriver_config::Config;

use crate::bootstrap::BootstrapError;
use crate::dispatch::DispatchError;
use crate::transport::ServiceStats;

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked when input is exhausted and every response has been written.
    fn session_finished(&self, stats: &ServiceStats);

    /// Invoked when the session stops because input or output failed.
    fn session_failed(&self, error: &DispatchError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn session_finished(&self, stats: &ServiceStats) {
        (**self).session_finished(stats);
    }

    fn session_failed(&self, error: &DispatchError) {
        (**self).session_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: "jsdriverd::health",
            event = "bootstrap_starting",
            "starting driver bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: "jsdriverd::health",
            event = "bootstrap_succeeded",
            mode = %config.mode(),
            workers = config.workers(),
            max_request_bytes = config.max_request_bytes(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "driver bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: "jsdriverd::health",
            event = "bootstrap_failed",
            error = %error,
            "driver bootstrap failed"
        );
    }

    fn session_finished(&self, stats: &ServiceStats) {
        tracing::info!(
            target: "jsdriverd::health",
            event = "session_finished",
            ok = stats.ok,
            error = stats.error,
            fatal = stats.fatal,
            "input exhausted; all responses written"
        );
    }

    fn session_failed(&self, error: &DispatchError) {
        tracing::error!(
            target: "jsdriverd::health",
            event = "session_failed",
            error = %error,
            "session stopped early"
        );
    }
}

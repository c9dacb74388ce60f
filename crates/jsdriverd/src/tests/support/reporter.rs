//! Test double for [`HealthReporter`] that records structured events for assertions.

use std::sync::Mutex;

use jsdriver_config::Config;

use crate::bootstrap::BootstrapError;
use crate::dispatch::DispatchError;
use crate::health::HealthReporter;
use crate::transport::ServiceStats;

/// Structured health events tracked during tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    /// Bootstrap started.
    BootstrapStarting,
    /// Bootstrap completed successfully.
    BootstrapSucceeded,
    /// Bootstrap failed with an error description.
    BootstrapFailed(String),
    /// A session ended normally.
    SessionFinished(ServiceStats),
    /// A session stopped early with an error description.
    SessionFailed(String),
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn session_finished(&self, stats: &ServiceStats) {
        self.record(HealthEvent::SessionFinished(*stats));
    }

    fn session_failed(&self, error: &DispatchError) {
        self.record(HealthEvent::SessionFailed(error.to_string()));
    }
}

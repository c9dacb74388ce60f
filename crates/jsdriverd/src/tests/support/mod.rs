//! Test harness utilities shared by the driver suites.

mod config_loader;
mod reporter;

pub use config_loader::BrokenConfigLoader;
pub use reporter::{HealthEvent, RecordingHealthReporter};

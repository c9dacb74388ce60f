//! Process entry point wiring stdin and stdout to the driver.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::bootstrap::{BootstrapError, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::dispatch::DispatchError;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::ServiceStats;

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors that end the driver process.
#[derive(Debug, Error)]
pub enum RunError {
    /// The driver could not be bootstrapped.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// Input or output failed while serving requests.
    #[error("session failed: {0}")]
    Session(#[from] DispatchError),
}

/// Runs the driver over the process's stdin and stdout.
///
/// # Errors
///
/// Returns an error when bootstrap fails or the session cannot continue.
pub fn run_driver() -> Result<ServiceStats, RunError> {
    let reporter = Arc::new(StructuredHealthReporter::new());
    let stdin = io::stdin();
    run_driver_with(&SystemConfigLoader, reporter, stdin.lock(), io::stdout())
}

/// Runs the driver with injected collaborators and streams.
///
/// # Errors
///
/// Returns an error when bootstrap fails or the session cannot continue.
pub fn run_driver_with<R, W>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    reader: R,
    writer: W,
) -> Result<ServiceStats, RunError>
where
    R: BufRead,
    W: Write + Send,
{
    let driver = bootstrap_with(loader, reporter)?;
    info!(
        target: PROCESS_TARGET,
        mode = %driver.config().mode(),
        "accepting requests"
    );
    let stats = driver.run(reader, writer)?;
    info!(target: PROCESS_TARGET, %stats, "driver finished");
    Ok(stats)
}

//! Dialect-guessing JavaScript parse driver.
//!
//! The driver reads JSON requests carrying JavaScript source of unknown
//! dialect, tries the module goal and then the script goal, and answers each
//! request with one tagged envelope (`ok`, `error` or `fatal`):
//!
//! ```text
//! {"content":"return 1;"}  ->  {"status":"ok","ast":{...}}
//! {"content":"a +% b"}     ->  {"status":"error","errors":[...,...]}
//! not-json                 ->  {"status":"fatal","errors":[...]}
//! ```
//!
//! Startup follows a fixed sequence: configuration is loaded through
//! [`jsdriver_config`] and validated, structured telemetry is installed on
//! stderr, and the resulting [`Driver`] serves stdin until it is exhausted.
//! [`HealthReporter`] hooks observe each stage.
//!
//! The pieces are usable on their own: [`DialectGuesser`] for in-process
//! guessing, [`EnvelopeStream`] as a pull-based transform, and [`serve`] or
//! [`single_shot`] over arbitrary readers and writers.

mod bootstrap;
mod dispatch;
mod health;
mod process;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Driver, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{
    DEFAULT_GUESSING_ORDER, DialectGuesser, DispatchError, EmptyGuessingOrder, EnvelopeStatus,
    GuessOutcome, ParseRequest, RequestHandler, ResponseEnvelope,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{RunError, run_driver, run_driver_with};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{EnvelopeStream, ServeOptions, ServiceStats, serve, single_shot};

#[cfg(test)]
mod tests;

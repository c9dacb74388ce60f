//! Dialect-guessing request dispatch.
//!
//! Clients send one JSON request per line:
//!
//! ```json
//! {"content":"return 1;"}
//! ```
//!
//! The [`DialectGuesser`] tries the module configuration, then the script
//! configuration, and the outcome is wrapped in a [`ResponseEnvelope`]:
//!
//! ```json
//! {"status":"ok","ast":{"type":"program","sourceType":"script",...}}
//! ```
//!
//! Source that no configuration accepts yields `status: "error"` with every
//! attempt's message; anything that stops a request from reaching the parser
//! yields `status: "fatal"` with a single message.

mod envelope;
mod errors;
mod guesser;
mod handler;
mod request;

pub use self::envelope::{EnvelopeStatus, ResponseEnvelope};
pub use self::errors::DispatchError;
pub use self::guesser::{DEFAULT_GUESSING_ORDER, DialectGuesser, EmptyGuessingOrder, GuessOutcome};
pub use self::handler::RequestHandler;
pub use self::request::ParseRequest;

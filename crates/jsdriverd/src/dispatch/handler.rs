//! Turns request lines into response envelopes.
//!
//! The handler is the boundary that never fails: whatever arrives on a line,
//! exactly one [`ResponseEnvelope`] comes back. Decoding problems and engine
//! failures become `fatal` envelopes; rejected source becomes `error`.

use tracing::{debug, warn};

use super::envelope::ResponseEnvelope;
use super::errors::DispatchError;
use super::guesser::DialectGuesser;
use super::request::ParseRequest;

/// Tracing target for dispatch diagnostics.
pub(crate) const DISPATCH_TARGET: &str = "jsdriverd::dispatch";

/// Handles requests by guessing the dialect of their content.
#[derive(Debug, Clone, Default)]
pub struct RequestHandler {
    guesser: DialectGuesser,
}

impl RequestHandler {
    /// Creates a handler around `guesser`.
    #[must_use]
    pub const fn new(guesser: DialectGuesser) -> Self {
        Self { guesser }
    }

    /// Handles one raw request line.
    #[must_use]
    pub fn handle_line(&self, line: &[u8]) -> ResponseEnvelope {
        match ParseRequest::parse(line) {
            Ok(request) => self.handle_source(request.content()),
            Err(error) => Self::reject(&error),
        }
    }

    /// Handles source text that has already been extracted from a request.
    #[must_use]
    pub fn handle_source(&self, source: &str) -> ResponseEnvelope {
        match self.guesser.guess(source) {
            Ok(outcome) => {
                let envelope = ResponseEnvelope::build(outcome);
                debug!(
                    target: DISPATCH_TARGET,
                    status = %envelope.status(),
                    bytes = source.len(),
                    "request handled"
                );
                envelope
            }
            Err(error) => Self::reject(&DispatchError::from(error)),
        }
    }

    /// Builds the `fatal` envelope for an infrastructure failure.
    #[must_use]
    pub fn reject(error: &DispatchError) -> ResponseEnvelope {
        warn!(target: DISPATCH_TARGET, %error, "request failed");
        ResponseEnvelope::fatal(error)
    }
}

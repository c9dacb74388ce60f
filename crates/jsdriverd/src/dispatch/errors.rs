//! Error types for request decoding and transport failures.
//!
//! Every variant describes an infrastructure failure: something that went
//! wrong before, around or beneath the dialect guesser. Rejected source text
//! is never a `DispatchError`; it travels as a
//! [`GuessOutcome::AllAttemptsFailed`](super::GuessOutcome) value instead.

use std::io;

use thiserror::Error;

use jsdriver_syntax::EngineError;

/// Errors surfaced while decoding, handling or answering a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request line could not be parsed as a JSON request document.
    #[error("malformed JSONL: {message}")]
    MalformedJsonl {
        /// Description of the decoding failure.
        message: String,
        /// Underlying JSON error, when one was produced.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request exceeds the maximum allowed size.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Observed size of the request in bytes.
        size: usize,
        /// Configured limit in bytes.
        max_size: usize,
    },

    /// The parse engine itself failed.
    #[error("parse engine failed: {0}")]
    Engine(#[from] EngineError),

    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Response serialisation failed.
    #[error("failed to serialise response: {0}")]
    SerializeResponse(#[source] serde_json::Error),

    /// A worker thread stopped without finishing its work.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl DispatchError {
    /// Creates a malformed JSONL error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedJsonl {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed JSONL error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJsonl {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a request-too-large error.
    #[must_use]
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

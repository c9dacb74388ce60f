//! Response envelopes written back to clients.
//!
//! Every request produces exactly one envelope, tagged by `status`:
//!
//! ```json
//! {"status":"ok","ast":{"type":"program","sourceType":"module",...}}
//! {"status":"error","errors":["Unexpected token (1:3)","Unexpected token (1:3)"]}
//! {"status":"fatal","errors":["malformed JSONL: expected value at line 1 column 1"]}
//! ```
//!
//! `error` means the source text was rejected by every configuration;
//! `fatal` means the request never reached the parser or the parser broke.

use std::fmt;

use serde::Serialize;

use jsdriver_syntax::{ParseError, SyntaxTree};

use super::guesser::GuessOutcome;

const NOTHING_ATTEMPTED: &str = "no parser configuration was attempted";

/// One response, tagged by outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseEnvelope {
    /// The source text parsed.
    Ok {
        /// Syntax tree of the accepted dialect.
        ast: SyntaxTree,
    },
    /// Every configuration rejected the source text.
    Error {
        /// One message per attempt, in attempt order. Never empty.
        errors: Vec<String>,
    },
    /// The request could not be handled at all.
    Fatal {
        /// Single description of what went wrong.
        errors: [String; 1],
    },
}

/// Discriminant of a [`ResponseEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeStatus {
    /// `status: "ok"`.
    Ok,
    /// `status: "error"`.
    Error,
    /// `status: "fatal"`.
    Fatal,
}

impl EnvelopeStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResponseEnvelope {
    /// Converts a guesser outcome into an envelope.
    ///
    /// An outcome with no recorded errors cannot carry a useful `error`
    /// envelope and is reported as `fatal` instead.
    #[must_use]
    pub fn build(outcome: GuessOutcome) -> Self {
        match outcome {
            GuessOutcome::Parsed(ast) => Self::Ok { ast },
            GuessOutcome::AllAttemptsFailed(errors) if errors.is_empty() => {
                Self::fatal(NOTHING_ATTEMPTED)
            }
            GuessOutcome::AllAttemptsFailed(errors) => Self::Error {
                errors: errors.into_iter().map(ParseError::into_message).collect(),
            },
        }
    }

    /// Builds a `fatal` envelope describing `reason`.
    pub fn fatal(reason: impl fmt::Display) -> Self {
        Self::Fatal {
            errors: [reason.to_string()],
        }
    }

    /// Status tag of the envelope.
    #[must_use]
    pub const fn status(&self) -> EnvelopeStatus {
        match self {
            Self::Ok { .. } => EnvelopeStatus::Ok,
            Self::Error { .. } => EnvelopeStatus::Error,
            Self::Fatal { .. } => EnvelopeStatus::Fatal,
        }
    }

    /// Messages carried by `error` and `fatal` envelopes; empty for `ok`.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Ok { .. } => &[],
            Self::Error { errors } => errors,
            Self::Fatal { errors } => errors,
        }
    }

    /// Encodes the envelope as one JSONL line, newline included.
    ///
    /// If the envelope cannot be serialised, the line carries a `fatal`
    /// envelope describing the serialisation failure instead, so the caller
    /// always has exactly one line to write.
    #[must_use]
    pub fn to_line(&self) -> Vec<u8> {
        let mut line = serde_json::to_vec(self).unwrap_or_else(|error| {
            let fallback = Self::fatal(format_args!("failed to serialise response: {error}"));
            serde_json::to_vec(&fallback).unwrap_or_else(|_| {
                br#"{"status":"fatal","errors":["failed to serialise response"]}"#.to_vec()
            })
        });
        line.push(b'\n');
        line
    }
}

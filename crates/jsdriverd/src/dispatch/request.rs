//! Request deserialisation for the dispatch loop.
//!
//! A request is a JSON object carrying the source text to parse:
//!
//! ```json
//! {"content": "export default 42;"}
//! ```
//!
//! Unknown fields are ignored so clients can attach correlation data.

use serde::Deserialize;

use super::errors::DispatchError;

/// Parsed request from a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParseRequest {
    /// Source text of unknown dialect.
    pub content: String,
}

impl ParseRequest {
    /// Parses a JSONL line into a request.
    ///
    /// Trailing whitespace (including the newline delimiter) is trimmed before
    /// parsing.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MalformedJsonl` if the line is empty or cannot
    /// be parsed as JSON matching the request schema.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = trim_trailing_whitespace(line);
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request line"));
        }

        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)
    }

    /// Source text to parse.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Trims trailing ASCII whitespace from a byte slice.
fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    bytes.get(..end).unwrap_or_default()
}

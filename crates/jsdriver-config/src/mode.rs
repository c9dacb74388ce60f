//! How the driver consumes its input.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Input framing used by the driver process.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RunMode {
    /// One JSON request per input line, one response per output line.
    #[default]
    Stream,
    /// The whole input is a single request; exactly one response is written.
    SingleShot,
}

/// Errors encountered while parsing a [`RunMode`] from text.
pub type RunModeParseError = strum::ParseError;

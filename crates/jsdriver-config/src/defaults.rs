//! Built-in configuration defaults.

use crate::logging::LogFormat;
use crate::mode::RunMode;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default number of worker threads parsing requests.
pub const DEFAULT_WORKERS: usize = 1;

/// Maximum size of a single request line in bytes.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Default log filter expression used by the binaries.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the binaries.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default input framing.
pub fn default_mode() -> RunMode {
    RunMode::Stream
}

/// Default worker count.
pub fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Default request size limit.
pub fn default_max_request_bytes() -> usize {
    DEFAULT_MAX_REQUEST_BYTES
}

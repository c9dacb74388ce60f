//! Per-session response counters.

use std::fmt;

use crate::dispatch::EnvelopeStatus;

/// Number of responses written per status during one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Responses with `status: "ok"`.
    pub ok: u64,
    /// Responses with `status: "error"`.
    pub error: u64,
    /// Responses with `status: "fatal"`.
    pub fatal: u64,
}

impl ServiceStats {
    /// Counts one written response.
    pub const fn record(&mut self, status: EnvelopeStatus) {
        let counter = match status {
            EnvelopeStatus::Ok => &mut self.ok,
            EnvelopeStatus::Error => &mut self.error,
            EnvelopeStatus::Fatal => &mut self.fatal,
        };
        *counter = counter.saturating_add(1);
    }

    /// Total number of responses written.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.ok.saturating_add(self.error).saturating_add(self.fatal)
    }
}

impl fmt::Display for ServiceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} responses ({} ok, {} error, {} fatal)",
            self.total(),
            self.ok,
            self.error,
            self.fatal
        )
    }
}

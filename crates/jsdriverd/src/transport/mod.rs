//! Line-oriented transport over byte streams.
//!
//! In stream mode each input line is one request and each output line is the
//! matching response, in the same order. In single-shot mode the whole input
//! is one request and exactly one response is written.

mod frame;
mod pool;
mod serve;
mod stats;
mod stream;

pub use self::serve::{ServeOptions, serve, single_shot};
pub use self::stats::ServiceStats;
pub use self::stream::EnvelopeStream;

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

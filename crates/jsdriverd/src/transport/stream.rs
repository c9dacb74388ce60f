//! Pull-based request-to-response transform.

use std::iter::FusedIterator;

use crate::dispatch::{RequestHandler, ResponseEnvelope};

/// Iterator adapter mapping request lines to response envelopes.
///
/// Nothing is parsed until the consumer pulls the next envelope, and each
/// pulled envelope answers exactly one line.
#[derive(Debug)]
pub struct EnvelopeStream<'h, I> {
    handler: &'h RequestHandler,
    lines: I,
}

impl<'h, I> EnvelopeStream<'h, I> {
    /// Wraps `lines`, answering each with `handler`.
    pub const fn new(handler: &'h RequestHandler, lines: I) -> Self {
        Self { handler, lines }
    }
}

impl<I> Iterator for EnvelopeStream<'_, I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = ResponseEnvelope;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines
            .next()
            .map(|line| self.handler.handle_line(line.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

impl<I> FusedIterator for EnvelopeStream<'_, I>
where
    I: FusedIterator,
    I::Item: AsRef<[u8]>,
{
}

//! Bounded request framing.
//!
//! Lines longer than the request limit are consumed and discarded without
//! being buffered, so one oversized request costs at most `max_request_bytes`
//! of memory and the next line is still read normally.

use std::io::{self, BufRead};

use crate::dispatch::{DispatchError, RequestHandler, ResponseEnvelope};

/// One framed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    /// A complete line, without its newline delimiter.
    Line(Vec<u8>),
    /// A line that exceeded the limit; only its size was kept.
    Oversized {
        /// Length of the line in bytes, excluding the delimiter.
        size: usize,
        /// Limit the line exceeded.
        max_size: usize,
    },
}

impl Frame {
    /// Answers the framed request.
    pub(crate) fn into_envelope(self, handler: &RequestHandler) -> ResponseEnvelope {
        match self {
            Self::Line(line) => handler.handle_line(&line),
            Self::Oversized { size, max_size } => {
                RequestHandler::reject(&DispatchError::request_too_large(size, max_size))
            }
        }
    }
}

/// Splits a reader into newline-delimited frames.
///
/// The iterator ends at end of input and after the first read error.
#[derive(Debug)]
pub(crate) struct FrameReader<R> {
    reader: R,
    max_request_bytes: usize,
    failed: bool,
}

impl<R: BufRead> FrameReader<R> {
    pub(crate) const fn new(reader: R, max_request_bytes: usize) -> Self {
        Self {
            reader,
            max_request_bytes,
            failed: false,
        }
    }

    fn read_frame(&mut self) -> io::Result<Option<Frame>> {
        let mut buffer = Vec::new();
        let mut size = 0_usize;
        let mut started = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            if available.is_empty() {
                return Ok(started.then(|| self.finish(buffer, size)));
            }
            started = true;

            let newline = available.iter().position(|b| *b == b'\n');
            let (chunk, consumed) = match newline {
                Some(pos) => (available.split_at(pos).0, pos + 1),
                None => (available, available.len()),
            };
            size = size.saturating_add(chunk.len());
            if size <= self.max_request_bytes {
                buffer.extend_from_slice(chunk);
            }
            self.reader.consume(consumed);

            if newline.is_some() {
                return Ok(Some(self.finish(buffer, size)));
            }
        }
    }

    fn finish(&self, buffer: Vec<u8>, size: usize) -> Frame {
        if size > self.max_request_bytes {
            Frame::Oversized {
                size,
                max_size: self.max_request_bytes,
            }
        } else {
            Frame::Line(buffer)
        }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = io::Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_frame() {
            Ok(frame) => frame.map(Ok),
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

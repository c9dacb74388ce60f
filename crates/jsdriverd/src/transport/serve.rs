//! Request loops over readers and writers.

use std::io::{self, BufRead, Read, Write};

use tracing::{debug, warn};

use jsdriver_config::Config;

use crate::dispatch::{DispatchError, RequestHandler, ResponseEnvelope};

use super::TRANSPORT_TARGET;
use super::frame::FrameReader;
use super::pool;
use super::stats::ServiceStats;

/// Transport settings for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServeOptions {
    /// Number of threads parsing requests. Values above one enable the
    /// worker pool; output order is preserved either way.
    pub workers: usize,
    /// Largest accepted request, in bytes.
    pub max_request_bytes: usize,
}

impl ServeOptions {
    /// Reads the transport settings from `config`.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            workers: config.workers(),
            max_request_bytes: config.max_request_bytes(),
        }
    }
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Answers every line of `reader` with one line on `writer`.
///
/// Malformed and oversized lines are answered with `fatal` envelopes and the
/// loop moves on. Responses are flushed as they are written.
///
/// # Errors
///
/// Returns an error when reading input or writing output fails. A read
/// failure is also reported to the client as a final `fatal` envelope.
pub fn serve<R, W>(
    handler: &RequestHandler,
    reader: R,
    writer: W,
    options: ServeOptions,
) -> Result<ServiceStats, DispatchError>
where
    R: BufRead,
    W: Write + Send,
{
    debug!(
        target: TRANSPORT_TARGET,
        workers = options.workers,
        max_request_bytes = options.max_request_bytes,
        "serving requests"
    );
    if options.workers > 1 {
        pool::serve_pooled(handler, reader, writer, options)
    } else {
        serve_sequential(handler, reader, writer, options.max_request_bytes)
    }
}

fn serve_sequential<R: BufRead, W: Write>(
    handler: &RequestHandler,
    reader: R,
    mut writer: W,
    max_request_bytes: usize,
) -> Result<ServiceStats, DispatchError> {
    let mut stats = ServiceStats::default();
    for frame in FrameReader::new(reader, max_request_bytes) {
        match frame {
            Ok(request) => {
                let envelope = request.into_envelope(handler);
                write_envelope(&mut writer, &envelope, &mut stats)?;
            }
            Err(source) => {
                let failure = DispatchError::Io(source);
                write_envelope(&mut writer, &RequestHandler::reject(&failure), &mut stats)?;
                return Err(failure);
            }
        }
    }
    Ok(stats)
}

/// Treats the whole of `reader` as one request document.
///
/// Exactly one envelope is written. The document is not line-framed, so
/// pretty-printed JSON is accepted.
///
/// # Errors
///
/// Returns an error when reading input or writing output fails. A read
/// failure is also reported to the client as a `fatal` envelope.
pub fn single_shot<R: Read, W: Write>(
    handler: &RequestHandler,
    mut reader: R,
    mut writer: W,
    max_request_bytes: usize,
) -> Result<ServiceStats, DispatchError> {
    let mut stats = ServiceStats::default();
    let mut document = Vec::new();

    let envelope = match read_document(&mut reader, &mut document, max_request_bytes) {
        Ok(None) => handler.handle_line(&document),
        Ok(Some(size)) => {
            RequestHandler::reject(&DispatchError::request_too_large(size, max_request_bytes))
        }
        Err(source) => {
            let failure = DispatchError::Io(source);
            write_envelope(&mut writer, &RequestHandler::reject(&failure), &mut stats)?;
            return Err(failure);
        }
    };

    write_envelope(&mut writer, &envelope, &mut stats)?;
    Ok(stats)
}

/// Buffers at most `max_request_bytes` of `reader` into `document`.
///
/// Returns the full input size when the limit is exceeded; the excess is
/// read and discarded so the size can be reported.
fn read_document<R: Read>(
    reader: &mut R,
    document: &mut Vec<u8>,
    max_request_bytes: usize,
) -> io::Result<Option<usize>> {
    let limit = u64::try_from(max_request_bytes)
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    let buffered = reader.by_ref().take(limit).read_to_end(document)?;
    if buffered <= max_request_bytes {
        return Ok(None);
    }
    let discarded = io::copy(reader, &mut io::sink())?;
    Ok(Some(
        buffered.saturating_add(usize::try_from(discarded).unwrap_or(usize::MAX)),
    ))
}

/// Writes one envelope line, flushes it, and counts it.
pub(super) fn write_envelope<W: Write>(
    writer: &mut W,
    envelope: &ResponseEnvelope,
    stats: &mut ServiceStats,
) -> Result<(), DispatchError> {
    let written = writer
        .write_all(&envelope.to_line())
        .and_then(|()| writer.flush());
    if let Err(error) = written {
        warn!(target: TRANSPORT_TARGET, %error, "failed to write response");
        return Err(DispatchError::Io(error));
    }
    stats.record(envelope.status());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn handler() -> RequestHandler {
        RequestHandler::default()
    }

    fn decode(output: &[u8]) -> Vec<Value> {
        output
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).expect("response line is JSON"))
            .collect()
    }

    fn statuses(output: &[u8]) -> Vec<String> {
        decode(output)
            .iter()
            .map(|value| value["status"].as_str().unwrap_or_default().to_owned())
            .collect()
    }

    const SESSION: &str = concat!(
        "{\"content\":\"export default 42;\"}\n",
        "{\"content\":\"return 1;\"}\n",
        "{\"content\":\"a +% b\"}\n",
        "not-json\n",
        "{\"content\":\"let x = 1;\"}\n",
    );

    #[rstest]
    #[case::sequential(1)]
    #[case::pooled(4)]
    fn answers_one_line_per_request_in_order(handler: RequestHandler, #[case] workers: usize) {
        let mut output = Vec::new();
        let options = ServeOptions {
            workers,
            ..ServeOptions::default()
        };

        let stats =
            serve(&handler, Cursor::new(SESSION), &mut output, options).expect("serve session");

        assert_eq!(statuses(&output), ["ok", "ok", "error", "fatal", "ok"]);
        assert_eq!(
            stats,
            ServiceStats {
                ok: 3,
                error: 1,
                fatal: 1
            }
        );
    }

    #[rstest]
    fn pooled_output_matches_sequential_output(handler: RequestHandler) {
        let input: String = (0..40)
            .map(|i| match i % 3 {
                0 => format!("{{\"content\":\"const v{i} = {i};\"}}\n"),
                1 => "{\"content\":\"a +% b\"}\n".to_owned(),
                _ => format!("{{\"content\":\"return {i};\"}}\n"),
            })
            .collect();

        let mut sequential = Vec::new();
        let mut pooled = Vec::new();
        serve(
            &handler,
            Cursor::new(input.clone()),
            &mut sequential,
            ServeOptions::default(),
        )
        .expect("sequential");
        serve(
            &handler,
            Cursor::new(input),
            &mut pooled,
            ServeOptions {
                workers: 3,
                ..ServeOptions::default()
            },
        )
        .expect("pooled");

        assert_eq!(sequential, pooled);
    }

    #[rstest]
    fn oversized_lines_are_fatal_and_the_loop_continues(handler: RequestHandler) {
        let input = format!(
            "{{\"content\":\"{}\"}}\n{{\"content\":\"return 1;\"}}\n",
            "a".repeat(64)
        );
        let mut output = Vec::new();
        let options = ServeOptions {
            workers: 1,
            max_request_bytes: 32,
        };

        serve(&handler, Cursor::new(input), &mut output, options).expect("serve");

        let responses = decode(&output);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["status"], "fatal");
        assert_eq!(
            responses[0]["errors"][0],
            "request too large: 78 bytes exceeds 32 byte limit"
        );
        assert_eq!(responses[1]["status"], "ok");
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("input vanished"))
        }
    }

    #[rstest]
    fn read_failures_are_reported_then_returned(handler: RequestHandler) {
        let mut output = Vec::new();
        let result = serve(
            &handler,
            BufReader::new(FailingReader),
            &mut output,
            ServeOptions::default(),
        );

        assert!(matches!(result, Err(DispatchError::Io(_))));
        assert_eq!(statuses(&output), ["fatal"]);
    }

    #[rstest]
    fn empty_input_writes_nothing(handler: RequestHandler) {
        let mut output = Vec::new();
        let stats = serve(&handler, Cursor::new(""), &mut output, ServeOptions::default())
            .expect("serve");
        assert!(output.is_empty());
        assert_eq!(stats.total(), 0);
    }

    #[rstest]
    fn single_shot_accepts_a_multi_line_document(handler: RequestHandler) {
        let document = "{\n  \"content\": \"let a;\\nexport { a };\"\n}\n";
        let mut output = Vec::new();

        let stats = single_shot(&handler, Cursor::new(document), &mut output, 1024)
            .expect("single shot");

        assert_eq!(statuses(&output), ["ok"]);
        assert_eq!(stats.ok, 1);
    }

    #[rstest]
    fn single_shot_rejects_oversized_documents(handler: RequestHandler) {
        let document = format!("{{\"content\":\"{}\"}}", "a".repeat(100));
        let mut output = Vec::new();

        single_shot(&handler, Cursor::new(document), &mut output, 16).expect("single shot");

        let responses = decode(&output);
        assert_eq!(responses.len(), 1);
        assert_eq!(
            responses[0]["errors"][0],
            "request too large: 114 bytes exceeds 16 byte limit"
        );
    }

    #[rstest]
    fn single_shot_with_empty_input_is_fatal(handler: RequestHandler) {
        let mut output = Vec::new();
        single_shot(&handler, Cursor::new(""), &mut output, 16).expect("single shot");
        assert_eq!(statuses(&output), ["fatal"]);
    }

    #[rstest]
    #[case::sequential(1)]
    #[case::pooled(3)]
    fn deeply_nested_source_is_answered_and_the_loop_continues(
        handler: RequestHandler,
        #[case] workers: usize,
    ) {
        let depth = 50_000;
        let input = format!(
            "{{\"content\":\"{}{}\"}}\n{{\"content\":\"return 1;\"}}\n",
            "[".repeat(depth),
            "]".repeat(depth)
        );
        let mut output = Vec::new();
        let options = ServeOptions {
            workers,
            ..ServeOptions::default()
        };

        serve(&handler, Cursor::new(input), &mut output, options).expect("serve");

        let responses = decode(&output);
        assert_eq!(statuses(&output), ["error", "ok"]);
        let errors = responses[0]["errors"].as_array().expect("errors");
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|message| {
            message
                .as_str()
                .is_some_and(|text| text.starts_with("Maximum nesting depth exceeded"))
        }));
    }

    #[rstest]
    fn single_shot_reports_read_failures_while_discarding_excess(handler: RequestHandler) {
        let input = Cursor::new(vec![b'a'; 64]).chain(FailingReader);
        let mut output = Vec::new();

        let result = single_shot(&handler, input, &mut output, 16);

        assert!(matches!(result, Err(DispatchError::Io(_))), "{result:?}");
        let responses = decode(&output);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["errors"][0], "IO error: input vanished");
    }
}

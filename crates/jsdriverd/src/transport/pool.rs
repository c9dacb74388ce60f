//! Worker pool for stream mode.
//!
//! The calling thread reads and frames requests, a fixed set of scoped
//! workers answers them, and one writer thread puts the answers back into
//! input order before writing them.
//!
//! Reading is paced by credits: the reader takes one before framing each
//! request and the writer returns one after each response it writes, so at
//! most `in_flight_limit` requests are held between input and output.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::debug;

use crate::dispatch::{DispatchError, RequestHandler, ResponseEnvelope};

use super::TRANSPORT_TARGET;
use super::frame::{Frame, FrameReader};
use super::serve::{ServeOptions, write_envelope};
use super::stats::ServiceStats;

/// Stack size for pool threads, matching a process main thread.
const POOL_THREAD_STACK_BYTES: usize = 8 * 1024 * 1024;

type Job = (u64, Frame);
type Answer = (u64, ResponseEnvelope);

/// Requests that may be read but not yet written for `workers` workers.
pub(super) const fn in_flight_limit(workers: usize) -> usize {
    let limit = workers.saturating_mul(4);
    if limit == 0 { 1 } else { limit }
}

pub(super) fn serve_pooled<R, W>(
    handler: &RequestHandler,
    reader: R,
    writer: W,
    options: ServeOptions,
) -> Result<ServiceStats, DispatchError>
where
    R: BufRead,
    W: Write + Send,
{
    let window = in_flight_limit(options.workers);
    let (job_tx, job_rx) = mpsc::sync_channel::<Job>(options.workers.saturating_mul(2));
    let (answer_tx, answer_rx) = mpsc::channel::<Answer>();
    let (credit_tx, credit_rx) = mpsc::sync_channel::<()>(window);
    for _ in 0..window {
        if credit_tx.try_send(()).is_err() {
            break;
        }
    }
    let jobs = Arc::new(Mutex::new(job_rx));

    thread::scope(|scope| {
        let mut workers = Vec::with_capacity(options.workers);
        for index in 0..options.workers {
            let queue = Arc::clone(&jobs);
            let answers = answer_tx.clone();
            let worker = thread::Builder::new()
                .name(format!("jsdriverd-worker-{index}"))
                .stack_size(POOL_THREAD_STACK_BYTES)
                .spawn_scoped(scope, move || work(handler, &queue, &answers))?;
            workers.push(worker);
        }
        drop(jobs);

        let writer_thread = thread::Builder::new()
            .name("jsdriverd-writer".to_owned())
            .stack_size(POOL_THREAD_STACK_BYTES)
            .spawn_scoped(scope, move || write_in_order(writer, answer_rx, &credit_tx))?;

        let fed = feed(
            reader,
            options.max_request_bytes,
            &Channels {
                credits: &credit_rx,
                jobs: &job_tx,
                answers: &answer_tx,
            },
        );
        drop(job_tx);
        drop(answer_tx);
        drop(credit_rx);

        let worker_panicked = workers
            .into_iter()
            .map(thread::ScopedJoinHandle::join)
            .fold(false, |panicked, joined| panicked || joined.is_err());
        let written = writer_thread
            .join()
            .map_err(|_| DispatchError::internal("response writer panicked"))?;

        let stats = written?;
        if worker_panicked {
            return Err(DispatchError::internal("request worker panicked"));
        }
        fed.map(|()| stats)
    })
}

/// Feeder ends of the pool's channels.
struct Channels<'a> {
    credits: &'a Receiver<()>,
    jobs: &'a SyncSender<Job>,
    answers: &'a Sender<Answer>,
}

/// Frames requests and queues them with their sequence numbers.
fn feed<R: BufRead>(
    reader: R,
    max_request_bytes: usize,
    channels: &Channels<'_>,
) -> Result<(), DispatchError> {
    let mut frames = FrameReader::new(reader, max_request_bytes);
    let mut sequence = 0_u64;
    loop {
        if channels.credits.recv().is_err() {
            return Err(DispatchError::internal("response writer stopped"));
        }
        let Some(frame) = frames.next() else {
            return Ok(());
        };
        match frame {
            Ok(request) => {
                if channels.jobs.send((sequence, request)).is_err() {
                    return Err(DispatchError::internal("request workers stopped"));
                }
                sequence = sequence.saturating_add(1);
            }
            Err(source) => {
                let failure = DispatchError::Io(source);
                if channels
                    .answers
                    .send((sequence, RequestHandler::reject(&failure)))
                    .is_err()
                {
                    debug!(target: TRANSPORT_TARGET, "writer gone before read failure was reported");
                }
                return Err(failure);
            }
        }
    }
}

fn work(handler: &RequestHandler, jobs: &Mutex<Receiver<Job>>, answers: &Sender<Answer>) {
    loop {
        let next = match jobs.lock() {
            Ok(queue) => queue.recv(),
            Err(_) => return,
        };
        let Ok((sequence, frame)) = next else {
            return;
        };
        if answers
            .send((sequence, frame.into_envelope(handler)))
            .is_err()
        {
            return;
        }
    }
}

fn write_in_order<W: Write>(
    mut writer: W,
    answers: Receiver<Answer>,
    credits: &SyncSender<()>,
) -> Result<ServiceStats, DispatchError> {
    let mut stats = ServiceStats::default();
    let mut pending = BTreeMap::new();
    let mut next = 0_u64;

    for (sequence, envelope) in answers {
        pending.insert(sequence, envelope);
        while let Some(ready) = pending.remove(&next) {
            write_envelope(&mut writer, &ready, &mut stats)?;
            next = next.saturating_add(1);
            // The reader may already have finished.
            credits.try_send(()).ok();
        }
    }

    if !pending.is_empty() {
        debug!(
            target: TRANSPORT_TARGET,
            missing = next,
            pending = pending.len(),
            "responses left unwritten"
        );
        return Err(DispatchError::internal(format!(
            "response {next} was never produced"
        )));
    }
    Ok(stats)
}

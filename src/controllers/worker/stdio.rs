use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::thread;

use log::{debug, warn};

use crate::controllers::worker::codec::decode_request;
use crate::controllers::worker::errors::WorkerError;
use crate::controllers::worker::ports::response_sink::JsonLinesSink;
use crate::controllers::worker::worker_loop::{WorkerMessage, run_worker_loop};

/// Serves render requests read as JSON lines from `input`, writing tile
/// responses as JSON lines to `output`.
///
/// Returns once `input` is exhausted and the active render has finished.
pub fn run_stdio_worker<R, W>(input: R, output: W) -> Result<W, WorkerError>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let (inbox, worker_inbox) = mpsc::channel();
    let requeue = inbox.clone();

    let reader = thread::Builder::new()
        .name("worker-stdin".into())
        .spawn(move || {
            for line in input.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!("stopped reading worker input: {err}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match decode_request(&line) {
                    Ok(Some(request)) => {
                        if inbox.send(WorkerMessage::Request(request)).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => warn!("skipping worker input line: {err}"),
                }
            }

            debug!("worker input closed");
            let _ = inbox.send(WorkerMessage::Finish);
        })
        .map_err(WorkerError::Spawn)?;

    let mut sink = JsonLinesSink::new(output);
    let result = run_worker_loop(&worker_inbox, &requeue, &mut sink);

    // The reader may still be blocked on input after a sink failure; it is
    // left detached in that case.
    if result.is_ok() && reader.join().is_err() {
        warn!("worker input thread panicked");
    }

    result.map(|()| sink.into_inner())
}

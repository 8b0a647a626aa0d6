use std::sync::mpsc::{Receiver, Sender};

use log::{debug, trace};

use crate::controllers::worker::errors::WorkerError;
use crate::controllers::worker::messages::{RequestId, WorkerRequest};
use crate::controllers::worker::ports::response_sink::ResponseSink;
use crate::controllers::worker::scheduler::{BatchOutcome, RenderScheduler};

/// Everything that can land in a worker's own queue.
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    Request(WorkerRequest),
    /// Run the next batch for this id. Posted by the loop to itself.
    Continue(RequestId),
    /// Input is exhausted: exit once the active render is done.
    Finish,
    Shutdown,
}

/// Drives a [`RenderScheduler`] from a message queue.
///
/// After each batch the loop posts a continuation to the back of its own
/// queue, so render and cancel requests that arrived meanwhile are handled
/// before the next batch.
pub(crate) fn run_worker_loop<S: ResponseSink>(
    inbox: &Receiver<WorkerMessage>,
    requeue: &Sender<WorkerMessage>,
    sink: &mut S,
) -> Result<(), WorkerError> {
    let mut scheduler = RenderScheduler::new();

    for message in inbox {
        match message {
            WorkerMessage::Request(request) => {
                if let Some(id) = scheduler.handle(request) {
                    requeue
                        .send(WorkerMessage::Continue(id))
                        .map_err(|_| WorkerError::Disconnected)?;
                }
            }
            WorkerMessage::Continue(id) => {
                let mut failure = None;
                let outcome = scheduler.run_batch(id, |response| {
                    if failure.is_none() {
                        failure = sink.send(response).err();
                    }
                });

                if let Some(err) = failure {
                    return Err(err);
                }
                if outcome == BatchOutcome::Continue {
                    requeue
                        .send(WorkerMessage::Continue(id))
                        .map_err(|_| WorkerError::Disconnected)?;
                }
            }
            WorkerMessage::Finish => {
                if scheduler.is_busy() {
                    trace!("input closed, finishing active render first");
                    requeue
                        .send(WorkerMessage::Finish)
                        .map_err(|_| WorkerError::Disconnected)?;
                } else {
                    break;
                }
            }
            WorkerMessage::Shutdown => break,
        }
    }

    debug!("worker loop exiting");
    Ok(())
}

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::controllers::worker::errors::WorkerError;
use crate::controllers::worker::messages::{WorkerRequest, WorkerResponse};
use crate::controllers::worker::ports::worker_port::WorkerPort;
use crate::controllers::worker::worker_loop::{WorkerMessage, run_worker_loop};

/// Runs a render scheduler on a dedicated OS thread.
///
/// Tiles move back through the channel without copying. Dropping the worker
/// shuts the thread down and joins it.
pub struct ThreadWorker {
    inbox: Sender<WorkerMessage>,
    responses: Receiver<WorkerResponse>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadWorker {
    pub fn spawn() -> Result<Self, WorkerError> {
        let (inbox, worker_inbox) = mpsc::channel();
        let (response_tx, responses) = mpsc::channel();
        let requeue = inbox.clone();

        let handle = thread::Builder::new()
            .name("render-worker".into())
            .spawn(move || {
                let mut sink = response_tx;
                match run_worker_loop(&worker_inbox, &requeue, &mut sink) {
                    Ok(()) | Err(WorkerError::Disconnected) => {}
                    Err(err) => warn!("render worker stopped: {err}"),
                }
            })
            .map_err(WorkerError::Spawn)?;

        debug!("render worker thread started");

        Ok(Self {
            inbox,
            responses,
            handle: Some(handle),
        })
    }

    /// Waits up to `timeout` for the next response.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<WorkerResponse>, WorkerError> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl WorkerPort for ThreadWorker {
    fn post(&mut self, request: WorkerRequest) {
        if self.handle.is_none() {
            return;
        }
        if self.inbox.send(WorkerMessage::Request(request)).is_err() {
            warn!("render worker is gone, dropping request");
        }
    }

    fn try_recv(&mut self) -> Option<WorkerResponse> {
        match self.responses.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    fn terminate(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        let _ = self.inbox.send(WorkerMessage::Shutdown);
        if handle.join().is_err() {
            warn!("render worker thread panicked");
        }
        debug!("render worker thread joined");
    }
}

impl Drop for ThreadWorker {
    fn drop(&mut self) {
        self.terminate();
    }
}

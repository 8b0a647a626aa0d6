use std::collections::VecDeque;

use crate::controllers::worker::messages::{WorkerRequest, WorkerResponse};
use crate::controllers::worker::ports::worker_port::WorkerPort;
use crate::controllers::worker::scheduler::{BatchOutcome, RenderScheduler};
use crate::controllers::worker::worker_loop::WorkerMessage;

/// Runs the render scheduler on the caller's thread.
///
/// Work happens inside `try_recv`: when no response is waiting, the next
/// queued message is processed. Batches requeue their continuation exactly as
/// the threaded worker does, so request ordering is the same.
#[derive(Default)]
pub struct InlineWorker {
    scheduler: RenderScheduler,
    queue: VecDeque<WorkerMessage>,
    outbox: VecDeque<WorkerResponse>,
    posted: Vec<WorkerRequest>,
    terminated: bool,
}

impl InlineWorker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request posted so far, oldest first.
    #[must_use]
    pub fn posted(&self) -> &[WorkerRequest] {
        &self.posted
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.outbox.is_empty()
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn step(&mut self) {
        let Some(message) = self.queue.pop_front() else {
            return;
        };

        match message {
            WorkerMessage::Request(request) => {
                if let Some(id) = self.scheduler.handle(request) {
                    self.queue.push_back(WorkerMessage::Continue(id));
                }
            }
            WorkerMessage::Continue(id) => {
                let outbox = &mut self.outbox;
                let outcome = self.scheduler.run_batch(id, |response| outbox.push_back(response));
                if outcome == BatchOutcome::Continue {
                    self.queue.push_back(WorkerMessage::Continue(id));
                }
            }
            WorkerMessage::Finish | WorkerMessage::Shutdown => self.queue.clear(),
        }
    }
}

impl WorkerPort for InlineWorker {
    fn post(&mut self, request: WorkerRequest) {
        if self.terminated {
            return;
        }
        self.posted.push(request.clone());
        self.queue.push_back(WorkerMessage::Request(request));
    }

    fn try_recv(&mut self) -> Option<WorkerResponse> {
        while self.outbox.is_empty() && !self.queue.is_empty() {
            self.step();
        }
        self.outbox.pop_front()
    }

    fn terminate(&mut self) {
        self.terminated = true;
        self.queue.clear();
        self.outbox.clear();
    }
}

use crate::controllers::worker::messages::{WorkerRequest, WorkerResponse};

/// Off-thread execution context the compositor talks to.
///
/// Implementations never block the caller: `post` queues, `try_recv` polls.
pub trait WorkerPort {
    fn post(&mut self, request: WorkerRequest);

    fn try_recv(&mut self) -> Option<WorkerResponse>;

    /// Stops the worker. Later posts are dropped.
    fn terminate(&mut self);
}

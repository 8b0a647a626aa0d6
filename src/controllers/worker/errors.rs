use thiserror::Error;

use crate::controllers::worker::codec::ProtocolError;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to start worker thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("worker I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("worker channel disconnected")]
    Disconnected,
}

use std::io::Write;
use std::sync::mpsc::Sender;

use crate::controllers::worker::codec::encode_response;
use crate::controllers::worker::errors::WorkerError;
use crate::controllers::worker::messages::WorkerResponse;

/// Where a worker loop delivers finished tiles.
pub trait ResponseSink {
    fn send(&mut self, response: WorkerResponse) -> Result<(), WorkerError>;
}

impl ResponseSink for Sender<WorkerResponse> {
    fn send(&mut self, response: WorkerResponse) -> Result<(), WorkerError> {
        Sender::send(self, response).map_err(|_| WorkerError::Disconnected)
    }
}

/// Writes each response as one JSON line.
pub struct JsonLinesSink<W: Write> {
    output: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> ResponseSink for JsonLinesSink<W> {
    fn send(&mut self, response: WorkerResponse) -> Result<(), WorkerError> {
        let line = encode_response(&response)?;
        writeln!(self.output, "{line}")?;
        self.output.flush()?;
        Ok(())
    }
}

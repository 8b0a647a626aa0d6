//! Line-delimited JSON encoding of worker messages.
//!
//! Each message is one JSON object on one line. Lines whose `type` is not a
//! known message kind decode to `None` and are skipped by callers.

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::controllers::worker::messages::{WorkerRequest, WorkerResponse};

const REQUEST_TYPES: &[&str] = &["render", "cancel"];
const RESPONSE_TYPES: &[&str] = &["tile"];

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed worker message: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode_request(request: &WorkerRequest) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(request)?)
}

pub fn encode_response(response: &WorkerResponse) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(response)?)
}

pub fn decode_request(line: &str) -> Result<Option<WorkerRequest>, ProtocolError> {
    decode_known(line, REQUEST_TYPES)
}

pub fn decode_response(line: &str) -> Result<Option<WorkerResponse>, ProtocolError> {
    decode_known(line, RESPONSE_TYPES)
}

fn decode_known<T: DeserializeOwned>(
    line: &str,
    known_types: &[&str],
) -> Result<Option<T>, ProtocolError> {
    let value: Value = serde_json::from_str(line)?;

    let kind = value.get("type").and_then(Value::as_str);
    match kind {
        Some(kind) if known_types.contains(&kind) => Ok(Some(serde_json::from_value(value)?)),
        other => {
            warn!("ignoring worker message with unrecognised type {other:?}");
            Ok(None)
        }
    }
}

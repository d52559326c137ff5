//! Queue DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::envelope::DecodeError;
use crate::domain::message::RawMessage;

/// Response body of a queue pull
///
/// A missing or `null` payload is treated the same as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub payload: Vec<QueueRecord>,
}

impl QueueResponse {
    /// Consumes the response, returning `None` when there is nothing to process
    pub fn into_records(self) -> Option<Vec<QueueRecord>> {
        if self.payload.is_empty() {
            None
        } else {
            Some(self.payload)
        }
    }
}

/// One payload entry, kept as raw JSON until it is processed
///
/// A malformed entry only fails its own message, not the batch it came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueRecord(Value);

impl QueueRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Converts the entry into a message
    pub fn into_message(self) -> Result<RawMessage, DecodeError> {
        serde_json::from_value(self.0).map_err(DecodeError::Record)
    }

    /// Best-effort id for log lines, readable even when the record is malformed
    pub fn id_hint(&self) -> String {
        match self.0.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "<no id>".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Value> for QueueRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<QueueRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let payload = Option::<Vec<QueueRecord>>::deserialize(deserializer)?;
    Ok(payload.unwrap_or_default())
}

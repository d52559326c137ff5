//! Queue message domain types

use std::fmt;

use serde::{Deserialize, Serialize};

/// A message as delivered by the queue API
///
/// `data` is a base64 blob holding the JSON envelope. The API does not
/// guarantee that ids are unique, and nothing here deduplicates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub id: Option<MessageId>,
    /// UTC timestamp in `YYYY-MM-DDTHH:MM:SSZ` form
    #[serde(default)]
    pub created_at: Option<String>,
    pub data: String,
}

/// Opaque message identifier, either a string or a number on the wire
///
/// Numbers keep their JSON form, so ids beyond the `i64` range survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{}", n),
            MessageId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        MessageId::Text(value.to_string())
    }
}

impl From<i64> for MessageId {
    fn from(value: i64) -> Self {
        MessageId::Number(value.into())
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        MessageId::Number(value.into())
    }
}

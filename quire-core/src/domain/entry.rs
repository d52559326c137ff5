//! Journal entry rendering
//!
//! Each entry is a self-delimited block:
//!
//! ```text
//!
//! <!--- {id} | {created_at} --->
//! {body}
//! <p style='text-align: right;'>@{caption}</p>
//!
//! --------
//! <!--- {id} | EOF --->
//! ```
//!
//! The markers always carry the raw id and timestamp so an entry can be found
//! with a plain text search for its id.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

use crate::domain::message::{MessageId, RawMessage};

/// Wire format of `created_at`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// How the right-aligned timestamp caption is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionStyle {
    /// The raw UTC timestamp as received
    #[default]
    Utc,
    /// Converted to the host's local time zone
    Local,
}

/// A rendered message ready to be written to the journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: Option<MessageId>,
    pub created_at: Option<String>,
    pub body: String,
}

impl JournalEntry {
    /// Creates an entry carrying the identity of `message`
    pub fn for_message(message: &RawMessage, body: String) -> Self {
        Self {
            id: message.id.clone(),
            created_at: message.created_at.clone(),
            body,
        }
    }

    /// Renders the entry as a journal block
    pub fn render(&self, caption: CaptionStyle) -> String {
        let id = self.id.as_ref().map(ToString::to_string).unwrap_or_default();
        let created_at = self.created_at.as_deref().unwrap_or_default();
        let caption = match caption {
            CaptionStyle::Utc => created_at.to_string(),
            CaptionStyle::Local => local_caption(created_at),
        };

        format!(
            "\n<!--- {id} | {created_at} --->\n{body}\n<p style='text-align: right;'>@{caption}</p>\n\n--------\n<!--- {id} | EOF --->\n",
            body = self.body,
        )
    }
}

/// Parses a `YYYY-MM-DDTHH:MM:SSZ` timestamp
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn local_caption(created_at: &str) -> String {
    match parse_timestamp(created_at) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
        None => created_at.to_string(),
    }
}

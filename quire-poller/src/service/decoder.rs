//! Decoder service
//!
//! Turns a raw message into the body of a journal entry:
//! - text: the content, verbatim
//! - image: bytes written to the image directory, then a markdown image link
//! - url: a markdown link labelled with the URL itself
//!
//! Anything else yields `None` and is dropped without an error.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use quire_core::domain::envelope::{Envelope, parse_envelope};
use quire_core::domain::message::RawMessage;
use tokio::fs;
use tracing::debug;

/// Service trait for decoding queue messages
#[async_trait]
pub trait DecoderService: Send + Sync {
    /// Decodes a message into renderable content
    ///
    /// # Returns
    /// * `Ok(Some(body))` - content to journal
    /// * `Ok(None)` - nothing renderable; skip the message
    /// * `Err(_)` - malformed envelope or failed image write
    async fn decode(&self, message: &RawMessage) -> Result<Option<String>>;
}

/// Standard implementation of DecoderService
pub struct StandardDecoderService {
    image_dir: PathBuf,
    link_prefix: String,
}

impl StandardDecoderService {
    /// Creates a new decoder service
    ///
    /// # Arguments
    /// * `image_dir` - Directory image attachments are written into
    /// * `link_prefix` - Path placed in front of the filename in image links
    pub fn new(image_dir: impl Into<PathBuf>, link_prefix: impl Into<String>) -> Self {
        Self {
            image_dir: image_dir.into(),
            link_prefix: link_prefix.into(),
        }
    }

    /// Writes an attachment, replacing any file of the same name
    async fn store_image(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.image_dir).await.with_context(|| {
            format!("Failed to create image directory {}", self.image_dir.display())
        })?;

        let path = self.image_dir.join(filename);
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write image {}", path.display()))?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn image_link(&self, filename: &str) -> String {
        let prefix = self.link_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            format!("![{filename}]({filename})")
        } else {
            format!("![{filename}]({prefix}/{filename})")
        }
    }
}

#[async_trait]
impl DecoderService for StandardDecoderService {
    async fn decode(&self, message: &RawMessage) -> Result<Option<String>> {
        let envelope = parse_envelope(&message.data).context("Failed to decode envelope")?;

        let body = match envelope {
            Envelope::Text { content } => content,
            Envelope::Image { filename, bytes } => {
                self.store_image(&filename, &bytes).await?;
                self.image_link(&filename)
            }
            Envelope::Url { content } => format!("[{content}]({content})"),
            Envelope::Unknown { kind } => {
                debug!("Dropping message with unsupported type {:?}", kind);
                return Ok(None);
            }
        };

        if body.is_empty() {
            return Ok(None);
        }

        Ok(Some(body))
    }
}

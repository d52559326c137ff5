//! Queue pull endpoint

use quire_core::dto::queue::{QueueRecord, QueueResponse};
use reqwest::StatusCode;
use tracing::debug;

use crate::QueueClient;
use crate::error::{ClientError, Result};

impl QueueClient {
    /// Pull the current batch of messages
    ///
    /// Payload entries come back as raw records; each one is converted to a
    /// message by the caller, so one malformed entry does not fail the batch.
    ///
    /// # Returns
    /// * `Ok(Some(records))` - a non-empty batch, in the order the server sent it
    /// * `Ok(None)` - nothing to do: timeout, non-200 status, or empty/missing payload
    /// * `Err(_)` - any other transport failure, or a 200 body that is not a queue response
    pub async fn fetch(&self) -> Result<Option<Vec<QueueRecord>>> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                debug!("Queue request timed out");
                return Ok(None);
            }
            Err(e) => return Err(ClientError::RequestFailed(e)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            debug!("Queue responded with status {}", status);
            return Ok(None);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => {
                debug!("Queue response body timed out");
                return Ok(None);
            }
            Err(e) => return Err(ClientError::RequestFailed(e)),
        };

        let parsed: QueueResponse = serde_json::from_str(&body).map_err(|e| {
            ClientError::ParseError(format!("Failed to parse queue response: {}", e))
        })?;

        Ok(parsed.into_records())
    }
}

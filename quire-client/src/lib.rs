//! Quire HTTP Client
//!
//! A small client for pulling messages from the remote queue API.
//!
//! # Example
//!
//! ```no_run
//! use quire_client::QueueClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = QueueClient::new(
//!         "http://localhost:8080/q/cat/pull",
//!         Some("secret".to_string()),
//!         Duration::from_secs(5),
//!     )?;
//!
//!     if let Some(records) = client.fetch().await? {
//!         println!("Pulled {} record(s)", records.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod queue;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use quire_core::domain::message::RawMessage;
pub use quire_core::dto::queue::QueueRecord;

use reqwest::Client;
use std::time::Duration;

/// HTTP client for the queue pull endpoint
#[derive(Debug, Clone)]
pub struct QueueClient {
    /// Full URL of the pull endpoint
    endpoint: String,
    /// Bearer token; `None` when unset or empty
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl QueueClient {
    /// Create a new queue client whose requests time out after `timeout`
    ///
    /// # Arguments
    /// * `endpoint` - The pull endpoint (e.g., "http://localhost:8080/q/cat/pull")
    /// * `token` - Optional bearer token; an empty string counts as absent
    /// * `timeout` - Bound on each request, including reading the body
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(endpoint, token, client))
    }

    /// Create a new queue client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(endpoint: impl Into<String>, token: Option<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.filter(|t| !t.is_empty()),
            client,
        }
    }

    /// Get the pull endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether requests carry a bearer token
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

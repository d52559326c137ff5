//! Queue repository
//!
//! Pulls batches of raw records from the queue API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use quire_client::QueueClient;
use quire_core::dto::queue::QueueRecord;

/// Repository trait for pulling messages
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Fetches the current batch
    ///
    /// Returns `Ok(None)` for every "nothing to do" outcome (timeout, non-200,
    /// empty payload). Errors are reserved for failures the poll loop must back
    /// off from.
    async fn fetch(&self) -> Result<Option<Vec<QueueRecord>>>;
}

/// HTTP implementation of QueueRepository
pub struct HttpQueueRepository {
    client: QueueClient,
}

impl HttpQueueRepository {
    /// Creates a new HTTP queue repository
    pub fn new(client: QueueClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueueRepository for HttpQueueRepository {
    async fn fetch(&self) -> Result<Option<Vec<QueueRecord>>> {
        self.client
            .fetch()
            .await
            .with_context(|| format!("Failed to pull from {}", self.client.endpoint()))
    }
}

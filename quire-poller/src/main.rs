//! Quire Poller
//!
//! A long-running worker that turns queued messages into a journal.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Repositories: the queue API and the journal file
//! - Services: message decoding (including image attachments)
//! - Scheduler: the poll loop and its backoff policy
//!
//! Each cycle pulls a batch from the queue, renders every message it
//! understands and prepends it to the journal, newest first.

mod config;
mod repository;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::{FileJournalRepository, HttpQueueRepository};
use crate::scheduler::MessagePoller;
use crate::service::StandardDecoderService;
use quire_client::QueueClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quire_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quire Poller");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: queue_url={}, journal={}, images={}",
        config.queue_url,
        config.journal_path.display(),
        config.image_dir.display()
    );

    // Initialize queue client
    let client = QueueClient::new(
        config.queue_url.clone(),
        config.auth_token.clone(),
        config.request_timeout,
    )
    .context("Failed to create queue client")?;

    info!(
        "Queue client initialized for {} (auth token {})",
        client.endpoint(),
        if client.has_token() { "set" } else { "unset" }
    );

    let queue = Arc::new(HttpQueueRepository::new(client));
    let decoder = Arc::new(StandardDecoderService::new(
        config.image_dir.clone(),
        config.image_link_prefix(),
    ));
    let journal = Arc::new(FileJournalRepository::new(config.journal_path.clone()));

    info!(
        "Poll interval: {:?}, request timeout: {:?}, error backoff: {:?}, batch failures: {:?}",
        config.poll_interval,
        config.request_timeout,
        config.error_backoff,
        config.batch_failure_policy
    );

    let poller = MessagePoller::new(config, queue, decoder, journal);

    // Start polling loop
    poller.run().await;

    Ok(())
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<Config> {
    match Config::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(e) => {
            info!("Failed to load config from environment ({}), using defaults", e);
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

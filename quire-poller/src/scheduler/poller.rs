//! Message poller
//!
//! Polls the queue and journals each message it can render. The loop never
//! exits on its own: a failed cycle is logged, followed by an extra backoff
//! delay, and polling resumes.

use std::sync::Arc;

use anyhow::{Context, Result};
use quire_core::domain::entry::JournalEntry;
use quire_core::domain::message::RawMessage;
use quire_core::dto::queue::QueueRecord;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::{BatchFailurePolicy, Config};
use crate::repository::{JournalRepository, QueueRepository};
use crate::service::DecoderService;

/// Outcome of one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Messages returned by the queue
    pub fetched: usize,
    /// Messages written to the journal
    pub appended: usize,
    /// Messages with nothing renderable
    pub skipped: usize,
    /// Messages that failed and were isolated
    pub failed: usize,
}

/// Poller that continuously pulls messages and journals them
pub struct MessagePoller {
    config: Config,
    queue: Arc<dyn QueueRepository>,
    decoder: Arc<dyn DecoderService>,
    journal: Arc<dyn JournalRepository>,
}

impl MessagePoller {
    /// Creates a new message poller
    pub fn new(
        config: Config,
        queue: Arc<dyn QueueRepository>,
        decoder: Arc<dyn DecoderService>,
        journal: Arc<dyn JournalRepository>,
    ) -> Self {
        Self {
            config,
            queue,
            decoder,
            journal,
        }
    }

    /// Starts the polling loop
    ///
    /// Runs until the process is terminated.
    pub async fn run(&self) {
        info!(
            "Starting message poller (interval: {:?}, error backoff: {:?})",
            self.config.poll_interval, self.config.error_backoff
        );

        loop {
            match self.poll_once().await {
                Ok(report) if report.failed > 0 => {
                    warn!(
                        "{} of {} message(s) failed this cycle, backing off for {:?}",
                        report.failed, report.fetched, self.config.error_backoff
                    );
                    sleep(self.config.error_backoff).await;
                }
                Ok(report) => {
                    if report.appended > 0 {
                        info!(
                            "Appended {} entry(ies) this cycle ({} skipped)",
                            report.appended, report.skipped
                        );
                    }
                }
                Err(e) => {
                    error!("Error during poll cycle: {:#}", e);
                    sleep(self.config.error_backoff).await;
                }
            }

            sleep(self.config.poll_interval).await;
        }
    }

    /// Performs a single poll cycle
    ///
    /// Fetch failures always fail the cycle. A failing message, including a
    /// payload entry that is not a valid message, either fails the cycle or is
    /// counted in the report, depending on the batch failure policy.
    pub async fn poll_once(&self) -> Result<CycleReport> {
        let Some(records) = self
            .queue
            .fetch()
            .await
            .context("Failed to fetch messages")?
        else {
            debug!("No messages available");
            return Ok(CycleReport::default());
        };

        info!("Found {} message(s) to process", records.len());

        let mut report = CycleReport {
            fetched: records.len(),
            ..CycleReport::default()
        };

        for record in records {
            let label = record.id_hint();
            match self.process_record(record).await {
                Ok(true) => report.appended += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => match self.config.batch_failure_policy {
                    BatchFailurePolicy::Abort => {
                        return Err(e.context(format!("Aborted batch at message {}", label)));
                    }
                    BatchFailurePolicy::Isolate => {
                        error!("Failed to process message {}: {:#}", label, e);
                        report.failed += 1;
                    }
                },
            }
        }

        Ok(report)
    }

    /// Converts one payload entry into a message and journals it
    ///
    /// Returns `false` when the message had nothing to render.
    async fn process_record(&self, record: QueueRecord) -> Result<bool> {
        let message = record
            .into_message()
            .context("Malformed queue record")?;
        self.process_message(&message).await
    }

    /// Decodes, renders and journals one message
    async fn process_message(&self, message: &RawMessage) -> Result<bool> {
        let Some(body) = self.decoder.decode(message).await? else {
            debug!("Skipping message {}", message_label(message));
            return Ok(false);
        };

        let entry = JournalEntry::for_message(message, body);
        self.journal
            .prepend(&entry.render(self.config.caption_style))
            .await?;

        info!("Appended message {} to journal", message_label(message));
        Ok(true)
    }
}

fn message_label(message: &RawMessage) -> String {
    message
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "<no id>".to_string())
}

//! Journal repository
//!
//! The journal is a single text file with the newest entry first. There is no
//! prepend primitive on a file system, so each write reads the whole file and
//! rewrites it with the new entry in front.
//!
//! The rewrite is deliberately not atomic: no temp file, no rename, no lock.
//! If the process dies after the new entry is written but before the old
//! content is, the journal is left holding only the new entry. Only one poller
//! may own a journal file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Repository trait for the journal
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Inserts a rendered entry at the very top of the journal
    ///
    /// Existing content is kept byte for byte below the new entry. Entries are
    /// never deduplicated.
    async fn prepend(&self, entry: &str) -> Result<()>;
}

/// File-backed implementation of JournalRepository
pub struct FileJournalRepository {
    path: PathBuf,
}

impl FileJournalRepository {
    /// Creates a repository for the journal at `path`
    ///
    /// The file is created on the first write; its parent directory must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl JournalRepository for FileJournalRepository {
    async fn prepend(&self, entry: &str) -> Result<()> {
        let existing = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read journal {}", self.path.display())
                });
            }
        };

        let mut file = fs::File::create(&self.path)
            .await
            .with_context(|| format!("Failed to open journal {}", self.path.display()))?;

        file.write_all(entry.as_bytes())
            .await
            .context("Failed to write journal entry")?;
        file.write_all(&existing)
            .await
            .context("Failed to rewrite previous journal content")?;
        file.flush().await.context("Failed to flush journal")?;

        debug!(
            "Prepended {} bytes to {} ({} bytes kept)",
            entry.len(),
            self.path().display(),
            existing.len()
        );
        Ok(())
    }
}

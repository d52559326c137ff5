//! Repository layer
//!
//! Repositories abstract the poller's two external resources: the queue it
//! pulls from and the journal file it writes to. They carry no business
//! logic.
//!
//! All repositories are trait-based to enable testing and mocking.

mod journal;
mod queue;

// Re-export traits
pub use journal::JournalRepository;
pub use queue::QueueRepository;

// Re-export implementations
pub use journal::FileJournalRepository;
pub use queue::HttpQueueRepository;

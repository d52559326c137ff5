//! Scheduler layer for the poller
//!
//! This layer drives the fetch → decode → render → persist cycle on a fixed
//! interval and owns the failure containment policy. One cycle always
//! finishes before the next fetch is issued.

pub mod poller;

pub use poller::{CycleReport, MessagePoller};

//! Core domain types
//!
//! This module contains the structures that flow through the poller:
//! raw queue messages, the envelopes decoded from them, and the journal
//! entries rendered from those envelopes. Everything here is pure; disk and
//! network I/O live in the poller and client crates.

pub mod entry;
pub mod envelope;
pub mod message;

//! Data Transfer Objects for the queue API
//!
//! Wire shapes exchanged with the remote queue service.

pub mod queue;

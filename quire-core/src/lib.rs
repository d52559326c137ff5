//! Quire Core
//!
//! Core types for the Quire journaling poller.
//!
//! This crate contains:
//! - Domain types: queue messages, decoded envelopes and journal entries
//! - DTOs: wire shapes returned by the queue API

pub mod domain;
pub mod dto;

//! Service layer
//!
//! Services contain the poller's business logic. The decoder turns a raw
//! queue message into journal-ready content, writing image attachments to
//! disk along the way.
//!
//! All services are trait-based to enable testing and dependency injection.

mod decoder;

// Re-export traits
pub use decoder::DecoderService;

// Re-export implementations
pub use decoder::StandardDecoderService;

//! Producer and the collaborators it publishes through

pub mod memory;
pub mod producer;
pub mod sqs;
pub mod traits;

// Re-export the producer for convenience
pub use producer::{MessageProducer, OnPublished};

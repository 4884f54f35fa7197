//! Collaborators the producer delegates to.
//!
//! The producer owns none of these. Implementations must be safe to share
//! between producers and tasks.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::request::{QueueDefinition, SendMessageRequest};
use crate::errors::MqError;

/// Resolves logical destination names to provider queues.
#[async_trait]
pub trait QueueManager: Send + Sync {
    /// Resolve `queue_name`, creating the queue if it does not exist.
    ///
    /// Must be idempotent: concurrent callers for the same name observe a
    /// single creation and the same definition.
    async fn get_or_create(&self, queue_name: &str) -> Result<QueueDefinition, MqError>;
}

/// Hands out the send buffer bound to a queue, creating it on first use.
pub trait BufferFactory: Send + Sync {
    fn get_or_create(&self, queue: &QueueDefinition) -> Result<Arc<dyn SendBuffer>, MqError>;
}

/// Owns the actual dispatch of requests for one queue.
#[async_trait]
pub trait SendBuffer: Send + Sync {
    async fn send(&self, request: SendMessageRequest) -> Result<(), MqError>;
}

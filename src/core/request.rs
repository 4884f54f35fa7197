use serde::{Deserialize, Serialize};

/// A queue resolved by a [`QueueManager`](crate::QueueManager).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueDefinition {
    /// Logical destination name, e.g. `mq:Hello.inq`.
    pub queue_name: String,
    /// Name the queue has at the provider.
    pub sqs_queue_name: String,
    pub queue_url: String,
}

/// Wire-level unit consumed by a [`SendBuffer`](crate::SendBuffer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub queue_url: String,
    pub message_body: String,
}

impl SendMessageRequest {
    pub fn new(queue_url: impl Into<String>, message_body: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            message_body: message_body.into(),
        }
    }
}

//! In-memory collaborators for tests and local pipelines.
//!
//! Nothing leaves the process: queues are entries in a map and buffers keep
//! every request they are given.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

use super::traits::{BufferFactory, QueueManager, SendBuffer};
use crate::core::queue_names::QueueNames;
use crate::core::request::{QueueDefinition, SendMessageRequest};
use crate::errors::MqError;

const MEMORY_URL_SCHEME: &str = "memory://";

/// Queue manager that "creates" queues by remembering them.
#[derive(Debug, Default)]
pub struct InMemoryQueueManager {
    queues: Mutex<HashMap<String, QueueDefinition>>,
    created: AtomicUsize,
}

impl InMemoryQueueManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct queues created so far.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get(&self, queue_name: &str) -> Option<QueueDefinition> {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(queue_name)
            .cloned()
    }
}

#[async_trait]
impl QueueManager for InMemoryQueueManager {
    async fn get_or_create(&self, queue_name: &str) -> Result<QueueDefinition, MqError> {
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        let definition = queues.entry(queue_name.to_string()).or_insert_with(|| {
            self.created.fetch_add(1, Ordering::SeqCst);
            let sqs_queue_name = QueueNames::sqs_queue_name(queue_name);
            QueueDefinition {
                queue_name: queue_name.to_string(),
                queue_url: format!("{MEMORY_URL_SCHEME}{sqs_queue_name}"),
                sqs_queue_name,
            }
        });
        Ok(definition.clone())
    }
}

/// Buffer factory handing out one [`InMemoryBuffer`] per queue URL.
#[derive(Debug, Default)]
pub struct InMemoryBufferFactory {
    buffers: Mutex<HashMap<String, Arc<InMemoryBuffer>>>,
}

impl InMemoryBufferFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer bound to `queue_url`, if one was created.
    #[must_use]
    pub fn buffer(&self, queue_url: &str) -> Option<Arc<InMemoryBuffer>> {
        self.buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(queue_url)
            .cloned()
    }

    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl BufferFactory for InMemoryBufferFactory {
    fn get_or_create(&self, queue: &QueueDefinition) -> Result<Arc<dyn SendBuffer>, MqError> {
        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        let buffer = buffers
            .entry(queue.queue_url.clone())
            .or_insert_with(|| Arc::new(InMemoryBuffer::default()));
        Ok(Arc::clone(buffer) as Arc<dyn SendBuffer>)
    }
}

/// Send buffer that records requests instead of dispatching them.
#[derive(Debug, Default)]
pub struct InMemoryBuffer {
    sent: Mutex<Vec<SendMessageRequest>>,
}

impl InMemoryBuffer {
    /// Requests received so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<SendMessageRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return and clear the recorded requests.
    pub fn take_sent(&self) -> Vec<SendMessageRequest> {
        let mut sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *sent)
    }
}

#[async_trait]
impl SendBuffer for InMemoryBuffer {
    #[tracing::instrument(skip_all)]
    async fn send(&self, request: SendMessageRequest) -> Result<(), MqError> {
        info!(
            queue_url = %request.queue_url,
            body_len = request.message_body.len(),
            "Message sent to in-memory queue",
        );
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queue_manager_creates_each_name_once() {
        let manager = InMemoryQueueManager::new();
        let first = manager.get_or_create("mq:Hello.inq").await.unwrap();
        let second = manager.get_or_create("mq:Hello.inq").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.sqs_queue_name, "mq-Hello-inq");
        assert_eq!(first.queue_url, "memory://mq-Hello-inq");
        assert_eq!(manager.created_count(), 1);
    }

    #[tokio::test]
    async fn buffer_factory_reuses_buffers() {
        let manager = InMemoryQueueManager::new();
        let factory = InMemoryBufferFactory::new();
        let queue = manager.get_or_create("mq:Hello.inq").await.unwrap();

        let a = factory.get_or_create(&queue).unwrap();
        let b = factory.get_or_create(&queue).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(factory.buffer_count(), 1);
    }

    #[tokio::test]
    async fn buffer_records_requests_in_order() {
        let buffer = InMemoryBuffer::default();
        buffer.send(SendMessageRequest::new("memory://q", "1")).await.unwrap();
        buffer.send(SendMessageRequest::new("memory://q", "2")).await.unwrap();

        let bodies: Vec<_> = buffer.take_sent().into_iter().map(|r| r.message_body).collect();
        assert_eq!(bodies, vec!["1", "2"]);
        assert!(buffer.sent().is_empty());
    }
}

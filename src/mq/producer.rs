//! One-way message producer.
//!
//! The producer turns payloads into envelopes, resolves the destination queue
//! and hands a serialized [`SendMessageRequest`] to that queue's send buffer.
//! It performs no I/O itself and adds no retries: every failure comes from a
//! collaborator or from serialization and is returned to the caller as is.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::debug;

use super::traits::{BufferFactory, QueueManager};
use crate::core::message::{Message, Publishable, QueueMessage};
use crate::core::queue_names::QueueNames;
use crate::core::request::{QueueDefinition, SendMessageRequest};
use crate::errors::MqError;

/// Hook invoked after every successful hand-off to a send buffer.
pub type OnPublished = Arc<dyn Fn() + Send + Sync>;

pub struct MessageProducer {
    queue_manager: Arc<dyn QueueManager>,
    buffer_factory: Arc<dyn BufferFactory>,
    names: QueueNames,
    on_published: RwLock<Option<OnPublished>>,
}

impl MessageProducer {
    /// Create a producer over shared collaborators.
    ///
    /// The producer only keeps handles: dropping it never shuts down the queue
    /// manager or buffer factory.
    pub fn new(queue_manager: Arc<dyn QueueManager>, buffer_factory: Arc<dyn BufferFactory>) -> Self {
        Self {
            queue_manager,
            buffer_factory,
            names: QueueNames::default(),
            on_published: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn with_queue_names(mut self, names: QueueNames) -> Self {
        self.names = names;
        self
    }

    #[must_use]
    pub fn with_on_published<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.set_on_published(callback);
        self
    }

    pub fn set_on_published<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self
            .on_published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    pub fn clear_on_published(&self) {
        *self
            .on_published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn queue_names(&self) -> &QueueNames {
        &self.names
    }

    /// Publish a bare payload or a ready-made envelope.
    ///
    /// Envelopes route by their own hint. Bare payloads are wrapped in a new
    /// [`Message`] and routed by the payload type.
    ///
    /// # Errors
    ///
    /// Returns queue resolution, serialization and buffer errors unchanged.
    pub async fn publish<T>(&self, payload: Publishable<T>) -> Result<(), MqError>
    where
        T: Serialize + Send + Sync,
    {
        match payload {
            Publishable::Envelope(message) => self.publish_message(&message).await,
            Publishable::Raw(body) => self.publish_message(&Message::new(body)).await,
        }
    }

    /// Shorthand for `publish(Publishable::Raw(body))`.
    ///
    /// # Errors
    ///
    /// Returns queue resolution, serialization and buffer errors unchanged.
    pub async fn publish_body<T>(&self, body: T) -> Result<(), MqError>
    where
        T: Serialize + Send + Sync,
    {
        self.publish(Publishable::Raw(body)).await
    }

    /// Publish an envelope to the queue it routes to.
    ///
    /// # Errors
    ///
    /// Returns queue resolution, serialization and buffer errors unchanged.
    pub async fn publish_message<M>(&self, message: &M) -> Result<(), MqError>
    where
        M: QueueMessage,
    {
        let queue_name = message.to_in_queue_name(&self.names);
        self.publish_to(&queue_name, message).await
    }

    /// Publish an envelope to an explicit destination.
    ///
    /// Returns once the request has been handed to the queue's send buffer,
    /// not once it reached SQS.
    ///
    /// # Errors
    ///
    /// Returns queue resolution, serialization and buffer errors unchanged.
    #[tracing::instrument(skip(self, message))]
    pub async fn publish_to<M>(&self, queue_name: &str, message: &M) -> Result<(), MqError>
    where
        M: QueueMessage,
    {
        let queue = self.queue_manager.get_or_create(queue_name).await?;
        let buffer = self.buffer_factory.get_or_create(&queue)?;
        let request = Self::create_send_message_request_for(message, &queue)?;

        buffer.send(request).await?;
        debug!(queue_url = %queue.queue_url, "Message handed to send buffer");

        self.notify_published();
        Ok(())
    }

    /// Publish a pre-built request, skipping envelope serialization.
    ///
    /// # Errors
    ///
    /// Returns queue resolution and buffer errors unchanged.
    #[tracing::instrument(skip(self, request))]
    pub async fn publish_request(
        &self,
        queue_name: &str,
        request: SendMessageRequest,
    ) -> Result<(), MqError> {
        let queue = self.queue_manager.get_or_create(queue_name).await?;
        let buffer = self.buffer_factory.get_or_create(&queue)?;

        buffer.send(request).await?;
        debug!(queue_url = %queue.queue_url, "Request handed to send buffer");

        self.notify_published();
        Ok(())
    }

    /// Wrap `request` in a default envelope and publish it to its type's queue.
    ///
    /// # Errors
    ///
    /// Returns queue resolution, serialization and buffer errors unchanged.
    pub async fn send_one_way<T>(&self, request: T) -> Result<(), MqError>
    where
        T: Serialize + Send + Sync,
    {
        self.publish_message(&Message::new(request)).await
    }

    /// Wrap `request` in a default envelope and publish it to `queue_name`.
    ///
    /// # Errors
    ///
    /// Returns queue resolution, serialization and buffer errors unchanged.
    pub async fn send_one_way_to<T>(&self, queue_name: &str, request: T) -> Result<(), MqError>
    where
        T: Serialize + Send + Sync,
    {
        self.publish_to(queue_name, &Message::new(request)).await
    }

    /// Send every request in order. `None` is a no-op.
    ///
    /// Stops at the first failure; requests after it are not sent.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`send_one_way`](Self::send_one_way).
    pub async fn send_all_one_way<I>(&self, requests: Option<I>) -> Result<(), MqError>
    where
        I: IntoIterator,
        I::IntoIter: Send,
        I::Item: Serialize + Send + Sync,
    {
        let Some(requests) = requests else {
            return Ok(());
        };

        for request in requests {
            self.send_one_way(request).await?;
        }
        Ok(())
    }

    /// Resolve `queue_name` and build the request `message` would be sent as.
    ///
    /// Nothing is dispatched.
    ///
    /// # Errors
    ///
    /// Returns queue resolution and serialization errors unchanged.
    pub async fn create_send_message_request<M>(
        &self,
        message: &M,
        queue_name: &str,
    ) -> Result<SendMessageRequest, MqError>
    where
        M: QueueMessage,
    {
        let queue = self.queue_manager.get_or_create(queue_name).await?;
        Self::create_send_message_request_for(message, &queue)
    }

    /// Build the request for an already resolved queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    pub fn create_send_message_request_for<M>(
        message: &M,
        queue: &QueueDefinition,
    ) -> Result<SendMessageRequest, MqError>
    where
        M: QueueMessage,
    {
        Ok(SendMessageRequest {
            queue_url: queue.queue_url.clone(),
            message_body: serde_json::to_string(message)?,
        })
    }

    fn notify_published(&self) {
        let callback = self
            .on_published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(callback) = callback {
            callback();
        }
    }
}

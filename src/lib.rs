//! sqs-mq - one-way message publishing onto Amazon SQS queues.
//!
//! A [`MessageProducer`] wraps payloads in a [`Message`] envelope, resolves the
//! destination queue through a [`QueueManager`] and hands the serialized request
//! to the queue's [`SendBuffer`], obtained from a [`BufferFactory`].
//!
//! # Architecture
//!
//! The crate provides:
//! - the producer and the `Message` envelope with its queue-naming convention
//! - collaborator traits for queue resolution and dispatch
//! - SQS-backed collaborators built on `aws-sdk-sqs`
//! - in-memory collaborators for tests and local pipelines
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sqs_mq::core::config::MqConfig;
//! use sqs_mq::mq::sqs::{SqsBufferFactory, SqsQueueManager, build_sqs_client};
//! use sqs_mq::MessageProducer;
//!
//! #[derive(serde::Serialize)]
//! struct Hello {
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Set up structured logging
//!     sqs_mq::setup_logging();
//!
//!     let config = MqConfig::from_env()?;
//!     let client = build_sqs_client(&config).await;
//!
//!     let producer = MessageProducer::new(
//!         Arc::new(SqsQueueManager::new(client.clone(), &config)),
//!         Arc::new(SqsBufferFactory::new(client)),
//!     )
//!     .with_queue_names(config.queue_names());
//!
//!     // Lands on the `mq-Hello-inq` queue
//!     producer.send_one_way(Hello { name: "World".into() }).await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod core;
pub mod errors;
pub mod mq;

pub use crate::core::message::{Message, Publishable, QueueMessage};
pub use crate::core::queue_names::QueueNames;
pub use crate::core::request::{QueueDefinition, SendMessageRequest};
pub use errors::MqError;
pub use mq::traits::{BufferFactory, QueueManager, SendBuffer};
pub use mq::{MessageProducer, OnPublished};

/// Configure structured logging with JSON format.
///
/// Sets up tracing-subscriber with a JSON formatter suitable for `CloudWatch`
/// Logs. Calling it more than once keeps the first subscriber.
///
/// # Example
///
/// ```
/// sqs_mq::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

//! Amazon SQS collaborators.
//!
//! [`SqsQueueManager`] resolves logical names to queue URLs with `GetQueueUrl`,
//! creating missing queues when allowed. [`SqsSendBuffer`] dispatches each
//! request with a single `SendMessage` call.
//!
//! Queues whose name ends in `.fifo` are created as FIFO queues with
//! content-based deduplication. Every message sent to one carries the queue
//! name as its group id and a digest of its body as deduplication id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use aws_sdk_sqs::config::Region;
use aws_sdk_sqs::error::{DisplayErrorContext, SdkError};
use aws_sdk_sqs::operation::get_queue_url::GetQueueUrlError;
use aws_sdk_sqs::types::QueueAttributeName;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::traits::{BufferFactory, QueueManager, SendBuffer};
use crate::core::config::MqConfig;
use crate::core::queue_names::QueueNames;
use crate::core::request::{QueueDefinition, SendMessageRequest};
use crate::errors::MqError;

/// Build an SQS client from the shared AWS config plus any overrides in `config`.
pub async fn build_sqs_client(config: &MqConfig) -> SqsClient {
    let mut loader = aws_config::from_env();
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let shared_config = loader.load().await;
    SqsClient::new(&shared_config)
}

pub struct SqsQueueManager {
    client: SqsClient,
    create_queues: bool,
    queues: Mutex<HashMap<String, Arc<OnceCell<QueueDefinition>>>>,
}

impl SqsQueueManager {
    pub fn new(client: SqsClient, config: &MqConfig) -> Self {
        Self {
            client,
            create_queues: config.create_queues,
            queues: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, queue_name: &str) -> Arc<OnceCell<QueueDefinition>> {
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(queues.entry(queue_name.to_string()).or_default())
    }

    async fn resolve(&self, queue_name: &str) -> Result<QueueDefinition, MqError> {
        let sqs_queue_name = QueueNames::sqs_queue_name(queue_name);

        let queue_url = match self
            .client
            .get_queue_url()
            .queue_name(&sqs_queue_name)
            .send()
            .await
        {
            Ok(output) => output.queue_url().map(str::to_string).ok_or_else(|| {
                MqError::QueueResolution(format!("GetQueueUrl returned no URL for {sqs_queue_name}"))
            })?,
            Err(e) if is_queue_missing(&e) => {
                if !self.create_queues {
                    return Err(MqError::QueueNotFound(queue_name.to_string()));
                }
                self.create_queue(&sqs_queue_name).await?
            }
            Err(e) => return Err(e.into()),
        };

        debug!(queue_name, %queue_url, "Resolved SQS queue");
        Ok(QueueDefinition {
            queue_name: queue_name.to_string(),
            sqs_queue_name,
            queue_url,
        })
    }

    async fn create_queue(&self, sqs_queue_name: &str) -> Result<String, MqError> {
        let mut request = self.client.create_queue().queue_name(sqs_queue_name);
        if is_fifo_queue(sqs_queue_name) {
            request = request
                .attributes(QueueAttributeName::FifoQueue, "true")
                .attributes(QueueAttributeName::ContentBasedDeduplication, "true");
        }

        let output = request.send().await?;
        info!(sqs_queue_name, "Created SQS queue");

        output.queue_url().map(str::to_string).ok_or_else(|| {
            MqError::QueueResolution(format!("CreateQueue returned no URL for {sqs_queue_name}"))
        })
    }
}

fn queue_name_from_url(queue_url: &str) -> &str {
    queue_url.rsplit('/').next().unwrap_or(queue_url)
}

fn is_fifo_queue(queue_name_or_url: &str) -> bool {
    queue_name_from_url(queue_name_or_url).ends_with(".fifo")
}

fn is_queue_missing<R>(error: &SdkError<GetQueueUrlError, R>) -> bool {
    error
        .as_service_error()
        .is_some_and(GetQueueUrlError::is_queue_does_not_exist)
}

#[async_trait]
impl QueueManager for SqsQueueManager {
    async fn get_or_create(&self, queue_name: &str) -> Result<QueueDefinition, MqError> {
        let cell = self.cell(queue_name);
        let definition = cell.get_or_try_init(|| self.resolve(queue_name)).await?;
        Ok(definition.clone())
    }
}

/// Buffer factory handing out one [`SqsSendBuffer`] per queue URL.
pub struct SqsBufferFactory {
    client: SqsClient,
    buffers: Mutex<HashMap<String, Arc<SqsSendBuffer>>>,
}

impl SqsBufferFactory {
    pub fn new(client: SqsClient) -> Self {
        Self {
            client,
            buffers: Mutex::new(HashMap::new()),
        }
    }
}

impl BufferFactory for SqsBufferFactory {
    fn get_or_create(&self, queue: &QueueDefinition) -> Result<Arc<dyn SendBuffer>, MqError> {
        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        let buffer = buffers.entry(queue.queue_url.clone()).or_insert_with(|| {
            Arc::new(SqsSendBuffer {
                client: self.client.clone(),
                queue_url: queue.queue_url.clone(),
            })
        });
        Ok(Arc::clone(buffer) as Arc<dyn SendBuffer>)
    }
}

/// Unbuffered dispatch: one `SendMessage` per request.
pub struct SqsSendBuffer {
    client: SqsClient,
    queue_url: String,
}

impl SqsSendBuffer {
    #[must_use]
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl SendBuffer for SqsSendBuffer {
    #[tracing::instrument(skip_all, fields(queue_url = %request.queue_url))]
    async fn send(&self, request: SendMessageRequest) -> Result<(), MqError> {
        let mut send = self.client.send_message();
        if is_fifo_queue(&request.queue_url) {
            let deduplication_id = hex::encode(Sha256::digest(request.message_body.as_bytes()));
            send = send
                .message_group_id(queue_name_from_url(&request.queue_url))
                .message_deduplication_id(deduplication_id);
        }

        let output = send
            .queue_url(request.queue_url)
            .message_body(request.message_body)
            .send()
            .await
            .map_err(|e| MqError::Send(DisplayErrorContext(&e).to_string()))?;

        debug!(message_id = output.message_id().unwrap_or_default(), "Message sent to SQS");
        Ok(())
    }
}

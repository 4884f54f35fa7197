use aws_sdk_sqs::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MqError {
    #[error("Failed to serialize message: {0}")]
    Serialization(String),

    #[error("Queue does not exist: {0}")]
    QueueNotFound(String),

    #[error("Failed to resolve queue: {0}")]
    QueueResolution(String),

    #[error("Failed to send message: {0}")]
    Send(String),

    #[error("Failed to interact with AWS services: {0}")]
    Aws(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for MqError {
    fn from(error: serde_json::Error) -> Self {
        MqError::Serialization(error.to_string())
    }
}

// Generic implementation for AWS SDK errors
impl<E, R> From<SdkError<E, R>> for MqError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        MqError::Aws(DisplayErrorContext(&error).to_string())
    }
}

use std::error::Error;
use sqs_mq::errors::MqError;

#[test]
fn test_mq_error_implements_error_trait() {
    // Verify MqError implements the Error trait
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = MqError::Send("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_mq_error_display() {
    let error = MqError::QueueNotFound("mq:Hello.inq".to_string());
    assert_eq!(format!("{error}"), "Queue does not exist: mq:Hello.inq");

    let error = MqError::Send("throttled".to_string());
    assert_eq!(format!("{error}"), "Failed to send message: throttled");

    let error = MqError::Config("MQ_CREATE_QUEUES: invalid value".to_string());
    assert_eq!(
        format!("{error}"),
        "Invalid configuration: MQ_CREATE_QUEUES: invalid value"
    );
}

#[test]
fn test_mq_error_from_serde_json() {
    let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let mq_err: MqError = err.into();

    match mq_err {
        MqError::Serialization(msg) => assert!(!msg.is_empty()),
        _ => panic!("Unexpected error type"),
    }
}

#[test]
fn test_mq_error_from_sdk_error() {
    use aws_sdk_sqs::error::SdkError;
    use aws_sdk_sqs::operation::send_message::SendMessageError;

    let sdk_err: SdkError<SendMessageError, ()> = SdkError::timeout_error("request timed out");
    let mq_err: MqError = sdk_err.into();

    match mq_err {
        MqError::Aws(msg) => assert!(msg.contains("timed out") || msg.contains("timeout")),
        _ => panic!("Unexpected error type"),
    }
}

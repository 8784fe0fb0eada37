use aws_sdk_sqs::error::{BuildError, SdkError};
use aws_sdk_sqs::operation::delete_message::DeleteMessageError;
use aws_sdk_sqs::operation::get_queue_url::GetQueueUrlError;
use aws_sdk_sqs::operation::list_queues::ListQueuesError;
use aws_sdk_sqs::operation::receive_message::ReceiveMessageError;
use aws_sdk_sqs::operation::send_message::SendMessageError;
use thiserror::Error;

/// Result type alias for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Error types for queue operations
#[derive(Error, Debug)]
pub enum QueueError {
    /// Error resolving a queue name to its URL
    #[error("Failed to get queue URL from SQS")]
    GetQueueUrl(#[from] SdkError<GetQueueUrlError>),

    /// Queue URL lookup succeeded without returning a URL
    #[error("SQS returned no URL for queue: {0}")]
    MissingQueueUrl(String),

    /// Error listing queues
    #[error("Failed to list queues from SQS")]
    ListQueues(#[from] SdkError<ListQueuesError>),

    /// Error receiving messages from SQS
    #[error("Failed to receive messages from SQS")]
    ReceiveMessage(#[from] SdkError<ReceiveMessageError>),

    /// Error sending message to SQS
    #[error("Failed to send message to SQS")]
    SendMessage(#[from] SdkError<SendMessageError>),

    /// Error deleting message from SQS
    #[error("Failed to delete message from SQS")]
    DeleteMessage(#[from] SdkError<DeleteMessageError>),

    /// Message group ID is required for FIFO queues
    #[error("Message group ID required for FIFO queue")]
    MissingMessageGroupId,

    /// Message attribute could not be built
    #[error("Invalid message attribute: {0}")]
    InvalidAttribute(#[from] BuildError),
}

impl QueueError {
    /// Checks if this error represents an upstream (5xx) error
    #[must_use]
    pub fn is_upstream_error(&self) -> bool {
        match self {
            Self::GetQueueUrl(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::ListQueues(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::ReceiveMessage(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::SendMessage(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::DeleteMessage(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::MissingQueueUrl(_)
            | Self::MissingMessageGroupId
            | Self::InvalidAttribute(_) => false,
        }
    }

    /// Checks if this error means the queue does not exist
    #[must_use]
    pub fn is_queue_missing(&self) -> bool {
        matches!(
            self,
            Self::GetQueueUrl(SdkError::ServiceError(err))
                if matches!(err.err(), GetQueueUrlError::QueueDoesNotExist(_))
        )
    }

    fn check_sdk_error_status<E>(sdk_err: &SdkError<E>) -> bool {
        if let SdkError::ServiceError(err) = sdk_err {
            let raw = err.raw();
            let status = raw.status();
            return status.as_u16() >= 500;
        }
        false
    }
}

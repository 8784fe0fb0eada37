use std::collections::HashMap;

use aws_sdk_sqs::primitives::Blob;
use aws_sdk_sqs::types::MessageAttributeValue;

use super::QueueResult;

/// Caller supplied message attributes, forwarded to SQS unmodified
pub type MessageAttributes = HashMap<String, MessageAttributeValue>;

/// Result of a successful send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Message ID assigned by SQS
    pub message_id: String,
    /// Sequence number, only set for FIFO queues
    pub sequence_number: Option<String>,
}

/// Message received from a queue
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Message ID
    pub message_id: String,
    /// Receipt handle for deleting this delivery of the message
    pub receipt_handle: String,
    /// The message body
    pub body: String,
    /// System attributes such as `SentTimestamp` or `MessageGroupId`
    pub attributes: HashMap<String, String>,
    /// Attributes set by the sender
    pub message_attributes: MessageAttributes,
}

impl From<&aws_sdk_sqs::types::Message> for ReceivedMessage {
    fn from(message: &aws_sdk_sqs::types::Message) -> Self {
        Self {
            message_id: message.message_id().unwrap_or_default().to_string(),
            receipt_handle: message.receipt_handle().unwrap_or_default().to_string(),
            body: message.body().unwrap_or_default().to_string(),
            attributes: message
                .attributes()
                .map(|attributes| {
                    attributes
                        .iter()
                        .map(|(name, value)| (name.as_str().to_string(), value.clone()))
                        .collect()
                })
                .unwrap_or_default(),
            message_attributes: message.message_attributes().cloned().unwrap_or_default(),
        }
    }
}

/// Builds a `String` message attribute
///
/// # Errors
///
/// Returns `QueueError::InvalidAttribute` if the attribute cannot be built
pub fn string_attribute(value: impl Into<String>) -> QueueResult<MessageAttributeValue> {
    Ok(MessageAttributeValue::builder()
        .data_type("String")
        .string_value(value)
        .build()?)
}

/// Builds a `Number` message attribute
///
/// # Errors
///
/// Returns `QueueError::InvalidAttribute` if the attribute cannot be built
pub fn number_attribute(value: impl ToString) -> QueueResult<MessageAttributeValue> {
    Ok(MessageAttributeValue::builder()
        .data_type("Number")
        .string_value(value.to_string())
        .build()?)
}

/// Builds a `Binary` message attribute
///
/// # Errors
///
/// Returns `QueueError::InvalidAttribute` if the attribute cannot be built
pub fn binary_attribute(value: impl Into<Vec<u8>>) -> QueueResult<MessageAttributeValue> {
    Ok(MessageAttributeValue::builder()
        .data_type("Binary")
        .binary_value(Blob::new(value))
        .build()?)
}

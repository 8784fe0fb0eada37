//! Queue operations
//!
//! Every operation addressed by queue name resolves the queue URL first. URLs
//! are not cached, so each of those calls costs one extra round trip.

/// Error types for queue operations
pub mod error;
/// Message and attribute types
pub mod types;

use aws_sdk_sqs::types::MessageSystemAttributeName;
use aws_sdk_sqs::Client as SqsClient;
use tracing::{debug, info};

use crate::config::{ClientConfig, ConfigError};

pub use error::{QueueError, QueueResult};
pub use types::{
    binary_attribute, number_attribute, string_attribute, MessageAttributes, ReceivedMessage,
    SentMessage,
};

/// Wildcard requesting every message attribute on receive
const ALL_MESSAGE_ATTRIBUTES: &str = "All";

/// SQS client wrapper for send, receive and delete by queue name
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct QueueClient {
    client: SqsClient,
}

impl QueueClient {
    /// Creates a new queue client from static credentials
    ///
    /// No network call is made; the connection is established on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if region, access key or secret key is empty
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let sdk_config = config.to_sdk_config()?;

        info!(
            "Initialized SQS client for region: {} (endpoint: {})",
            config.region,
            config.endpoint_url.as_deref().unwrap_or("default")
        );

        Ok(Self {
            client: SqsClient::new(&sdk_config),
        })
    }

    /// Wraps a pre-configured SQS client
    #[must_use]
    pub const fn from_sdk_client(client: SqsClient) -> Self {
        Self { client }
    }

    /// Returns the underlying SDK client
    #[must_use]
    pub const fn sdk_client(&self) -> &SqsClient {
        &self.client
    }

    /// Resolves a queue name to its URL
    ///
    /// # Errors
    ///
    /// Returns `QueueError::GetQueueUrl` if the queue does not exist or access is denied
    /// Returns `QueueError::MissingQueueUrl` if SQS answers without a URL
    pub async fn resolve_queue_url(&self, queue_name: &str) -> QueueResult<String> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await?;

        let queue_url = output
            .queue_url()
            .ok_or_else(|| QueueError::MissingQueueUrl(queue_name.to_string()))?;

        debug!("Resolved queue {} to {}", queue_name, queue_url);
        Ok(queue_url.to_string())
    }

    /// Sends a message to a FIFO queue
    ///
    /// No deduplication ID is set, so the queue must use content-based
    /// deduplication or duplicates are not suppressed.
    ///
    /// # Arguments
    ///
    /// * `queue_name` - Name of the FIFO queue
    /// * `message_group_id` - Messages sharing a group are delivered in order
    /// * `body` - The message body
    /// * `attributes` - Optional message attributes
    ///
    /// # Errors
    ///
    /// Returns `QueueError::MissingMessageGroupId` if `message_group_id` is empty
    /// Returns `QueueError::GetQueueUrl` or `QueueError::SendMessage` if SQS rejects a request
    pub async fn send_message_fifo(
        &self,
        queue_name: &str,
        message_group_id: &str,
        body: &str,
        attributes: Option<MessageAttributes>,
    ) -> QueueResult<SentMessage> {
        if message_group_id.is_empty() {
            return Err(QueueError::MissingMessageGroupId);
        }

        let queue_url = self.resolve_queue_url(queue_name).await?;

        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_group_id(message_group_id)
            .message_body(body)
            .set_message_attributes(attributes)
            .send()
            .await?;

        debug!(
            "Sent message to FIFO queue {} in group {}",
            queue_name, message_group_id
        );

        Ok(SentMessage {
            message_id: output.message_id().unwrap_or_default().to_string(),
            sequence_number: output.sequence_number().map(ToString::to_string),
        })
    }

    /// Sends a message to a standard queue
    ///
    /// # Arguments
    ///
    /// * `queue_name` - Name of the queue
    /// * `body` - The message body
    /// * `delay_seconds` - Optional delay before the message becomes visible
    /// * `attributes` - Optional message attributes
    ///
    /// # Errors
    ///
    /// Returns `QueueError::GetQueueUrl` or `QueueError::SendMessage` if SQS rejects a request
    pub async fn send_message(
        &self,
        queue_name: &str,
        body: &str,
        delay_seconds: Option<i32>,
        attributes: Option<MessageAttributes>,
    ) -> QueueResult<SentMessage> {
        let queue_url = self.resolve_queue_url(queue_name).await?;

        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .set_delay_seconds(delay_seconds)
            .set_message_attributes(attributes)
            .send()
            .await?;

        debug!("Sent message to queue {}", queue_name);

        Ok(SentMessage {
            message_id: output.message_id().unwrap_or_default().to_string(),
            sequence_number: output.sequence_number().map(ToString::to_string),
        })
    }

    /// Deletes a received message
    ///
    /// # Arguments
    ///
    /// * `queue_name` - Name of the queue the message was received from
    /// * `receipt_handle` - The receipt handle from the received message
    ///
    /// # Errors
    ///
    /// Returns `QueueError::DeleteMessage` if the receipt handle is invalid or expired
    pub async fn delete_message(&self, queue_name: &str, receipt_handle: &str) -> QueueResult<()> {
        let queue_url = self.resolve_queue_url(queue_name).await?;

        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        debug!("Deleted message from queue {}", queue_name);
        Ok(())
    }

    /// Lists the URLs of the caller's queues
    ///
    /// Only the first page is returned.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::ListQueues` if SQS rejects the request
    pub async fn list_queues(&self) -> QueueResult<Vec<String>> {
        let output = self.client.list_queues().send().await?;
        Ok(output.queue_urls().to_vec())
    }

    /// Long-polls a queue for messages
    ///
    /// All system and message attributes are requested. Received messages stay
    /// hidden for `visibility_timeout_secs` and reappear unless deleted.
    ///
    /// # Arguments
    ///
    /// * `queue_name` - Name of the queue
    /// * `max_messages` - Upper bound on messages returned (1 to 10)
    /// * `visibility_timeout_secs` - How long received messages stay hidden
    /// * `wait_time_secs` - How long to wait for messages to arrive
    ///
    /// # Errors
    ///
    /// Returns `QueueError::GetQueueUrl` or `QueueError::ReceiveMessage` if SQS rejects a request
    pub async fn receive_messages(
        &self,
        queue_name: &str,
        max_messages: i32,
        visibility_timeout_secs: i32,
        wait_time_secs: i32,
    ) -> QueueResult<Vec<ReceivedMessage>> {
        let queue_url = self.resolve_queue_url(queue_name).await?;

        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .message_system_attribute_names(MessageSystemAttributeName::All)
            .message_attribute_names(ALL_MESSAGE_ATTRIBUTES)
            .max_number_of_messages(max_messages)
            .visibility_timeout(visibility_timeout_secs)
            .wait_time_seconds(wait_time_secs)
            .send()
            .await?;

        let messages: Vec<ReceivedMessage> =
            output.messages().iter().map(ReceivedMessage::from).collect();

        debug!(
            "Received {} messages from queue {}",
            messages.len(),
            queue_name
        );
        Ok(messages)
    }
}

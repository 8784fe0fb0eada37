//! LocalStack test setup utilities

#![allow(dead_code)]

use cloud_clients::{ClientConfig, ObjectStoreClient, QueueClient};
use uuid::Uuid;

pub const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Client config pointing at LocalStack with its default credentials
pub fn localstack_config() -> ClientConfig {
    ClientConfig::new("us-east-1", "test", "test", None).with_endpoint_url(LOCALSTACK_ENDPOINT)
}

/// Unique, lowercase resource name safe for both buckets and queues
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Test context that provides an object store client and a fresh bucket
pub struct BucketTestContext {
    pub store: ObjectStoreClient,
    pub bucket: String,
}

impl BucketTestContext {
    /// Creates a new test context with a unique, empty bucket
    pub async fn new(test_name: &str) -> Self {
        let store = ObjectStoreClient::new(&localstack_config()).expect("Invalid test config");
        let bucket = unique_name(test_name);

        store
            .create_bucket(&bucket)
            .await
            .expect("Failed to create test bucket");

        Self { store, bucket }
    }
}

impl Drop for BucketTestContext {
    fn drop(&mut self) {
        // Empty and delete the bucket
        let store = self.store.clone();
        let bucket = self.bucket.clone();

        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                if let Ok(objects) = store.list_objects(&bucket).await {
                    for object in objects {
                        let _ = store.delete_object(&bucket, &object.key).await;
                    }
                }
                let _ = store.delete_bucket(&bucket).await;
            });
        }
    }
}

/// Test context that provides a queue client and a fresh queue
pub struct QueueTestContext {
    pub queues: QueueClient,
    pub queue_name: String,
    pub queue_url: String,
}

impl QueueTestContext {
    /// Creates a new test context with a unique FIFO queue
    pub async fn new_fifo(test_name: &str) -> Self {
        Self::create(format!("{}.fifo", unique_name(test_name)), true).await
    }

    /// Creates a new test context with a unique standard queue
    pub async fn new_standard(test_name: &str) -> Self {
        Self::create(unique_name(test_name), false).await
    }

    async fn create(queue_name: String, fifo: bool) -> Self {
        let queues = QueueClient::new(&localstack_config()).expect("Invalid test config");

        let mut request = queues.sdk_client().create_queue().queue_name(&queue_name);
        if fifo {
            // Create FIFO queue with content-based deduplication
            request = request
                .attributes(aws_sdk_sqs::types::QueueAttributeName::FifoQueue, "true")
                .attributes(
                    aws_sdk_sqs::types::QueueAttributeName::ContentBasedDeduplication,
                    "true",
                );
        }

        let result = request.send().await.expect("Failed to create test queue");
        let queue_url = result
            .queue_url()
            .expect("Queue URL not returned")
            .to_string();

        Self {
            queues,
            queue_name,
            queue_url,
        }
    }
}

impl Drop for QueueTestContext {
    fn drop(&mut self) {
        // Clean up the queue
        let client = self.queues.sdk_client().clone();
        let queue_url = self.queue_url.clone();

        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                let _ = client.delete_queue().queue_url(&queue_url).send().await;
            });
        }
    }
}

//! Smoke scenarios
//!
//! Each scenario creates the resources it needs, exercises every client
//! operation once and removes what it created, also when a step fails.

use std::time::Duration;

use anyhow::{ensure, Context};
use aws_sdk_sqs::types::QueueAttributeName;
use cloud_clients::queue::{string_attribute, MessageAttributes};
use cloud_clients::{ObjectStoreClient, QueueClient};
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

const SMOKE_KEY: &str = "k1";
const SMOKE_BODY: &[u8] = b"hello";
const COPY_SUFFIX: &str = "-copy";
const RECEIVE_DEADLINE: Duration = Duration::from_secs(30);
const VISIBILITY_TIMEOUT_SECS: i32 = 30;
const WAIT_TIME_SECS: i32 = 5;

/// Bucket lifecycle: create, upload, presign, copy, list, delete
///
/// Buckets created before a failing step are emptied and deleted before the
/// error is returned.
///
/// # Errors
///
/// Returns the first failing operation's error
pub async fn run_object_store(store: &ObjectStoreClient, bucket: &str) -> anyhow::Result<()> {
    let mut created = Vec::new();

    let result = exercise_object_store(store, bucket, &mut created).await;
    if result.is_err() {
        remove_buckets(store, &created).await;
    }

    result
}

async fn exercise_object_store(
    store: &ObjectStoreClient,
    bucket: &str,
    created: &mut Vec<String>,
) -> anyhow::Result<()> {
    let copy_bucket = format!("{bucket}{COPY_SUFFIX}");

    store.create_bucket(bucket).await.context("create bucket")?;
    created.push(bucket.to_string());
    store
        .create_bucket(&copy_bucket)
        .await
        .context("create copy bucket")?;
    created.push(copy_bucket.clone());
    info!("Created buckets {} and {}", bucket, copy_bucket);

    let upload = store
        .upload_object(bucket, SMOKE_KEY, SMOKE_BODY, "text/plain", "public, max-age=14400")
        .await
        .context("upload object")?;
    info!("Uploaded object to {}", upload.location);

    let presigned = store
        .presign_get_object(bucket, SMOKE_KEY)
        .await
        .context("presign object")?;
    info!("Presigned GET URL expires at {}", presigned.expires_at);

    let buckets = store.list_buckets().await.context("list buckets")?;
    ensure!(
        buckets.iter().any(|info| info.name == bucket),
        "bucket {bucket} missing from bucket listing"
    );

    let objects = store.list_objects(bucket).await.context("list objects")?;
    ensure!(
        objects.iter().any(|object| object.key == SMOKE_KEY),
        "object {SMOKE_KEY} missing from {bucket}"
    );

    store
        .copy_object(bucket, SMOKE_KEY, &copy_bucket)
        .await
        .context("copy object")?;
    let copied = store
        .list_objects(&copy_bucket)
        .await
        .context("list copied objects")?;
    ensure!(
        copied.iter().any(|object| object.key == SMOKE_KEY),
        "object {SMOKE_KEY} was not copied into {copy_bucket}"
    );

    for target in [bucket, copy_bucket.as_str()] {
        store
            .delete_object(target, SMOKE_KEY)
            .await
            .context("delete object")?;
    }

    let objects = store.list_objects(bucket).await.context("list objects")?;
    ensure!(
        objects.iter().all(|object| object.key != SMOKE_KEY),
        "object {SMOKE_KEY} still listed after delete"
    );

    for target in [bucket, copy_bucket.as_str()] {
        store.delete_bucket(target).await.context("delete bucket")?;
        created.retain(|name| name != target);
    }
    info!("Object store scenario passed");

    Ok(())
}

/// Empties and deletes each bucket, logging failures instead of returning them
pub async fn remove_buckets(store: &ObjectStoreClient, buckets: &[String]) {
    for bucket in buckets {
        match store.list_objects(bucket).await {
            Ok(objects) => {
                for object in objects {
                    if let Err(e) = store.delete_object(bucket, &object.key).await {
                        warn!("Failed to delete {}/{}: {}", bucket, object.key, e);
                    }
                }
            }
            Err(e) => warn!("Failed to list objects in {}: {}", bucket, e),
        }

        match store.delete_bucket(bucket).await {
            Ok(()) => info!("Removed bucket {}", bucket),
            Err(e) => warn!("Failed to delete bucket {}: {}", bucket, e),
        }
    }
}

/// FIFO queue round trip: send three messages in one group, receive and delete them
///
/// The queue is created only when the service reports it missing, and is
/// deleted afterwards only if it was created here. Messages are tagged with a
/// per-run group so leftovers already in the queue are left alone.
///
/// # Errors
///
/// Returns the first failing operation's error
pub async fn run_queue(queues: &QueueClient, queue_name: &str) -> anyhow::Result<()> {
    let created_url = match queues.resolve_queue_url(queue_name).await {
        Ok(_) => None,
        Err(e) if e.is_queue_missing() => Some(create_fifo_queue(queues, queue_name).await?),
        Err(e) => return Err(e).context("resolve queue"),
    };

    let result = exercise_queue(queues, queue_name).await;

    if let Some(queue_url) = created_url {
        let deleted = queues
            .sdk_client()
            .delete_queue()
            .queue_url(&queue_url)
            .send()
            .await;
        match (deleted, &result) {
            (Ok(_), _) => info!("Deleted queue {}", queue_url),
            (Err(e), Ok(())) => return Err(e).context("delete queue"),
            (Err(e), Err(_)) => warn!("Failed to delete queue {}: {}", queue_url, e),
        }
    }

    result
}

async fn exercise_queue(queues: &QueueClient, queue_name: &str) -> anyhow::Result<()> {
    let queue_urls = queues.list_queues().await.context("list queues")?;
    info!("Visible queues: {}", queue_urls.len());

    let run_id = Uuid::new_v4().simple().to_string();
    let group_id = format!("smoke-{run_id}");

    let mut attributes = MessageAttributes::new();
    attributes.insert("source".to_string(), string_attribute("cloud-smoke")?);

    let bodies: Vec<String> = ["t1", "t2", "t3"]
        .iter()
        .map(|body| format!("{run_id}-{body}"))
        .collect();
    for body in &bodies {
        let sent = queues
            .send_message_fifo(queue_name, &group_id, body, Some(attributes.clone()))
            .await
            .context("send message")?;
        info!("Sent message with ID: {}", sent.message_id);
    }

    let received = receive_run_messages(queues, queue_name, &bodies).await?;
    ensure!(
        received == bodies,
        "expected {bodies:?} in order, received {received:?}"
    );
    info!("Queue scenario passed");

    Ok(())
}

/// Receives until every body in `bodies` arrived or the deadline passes
///
/// Matching messages are deleted as they arrive so the rest of their FIFO
/// group becomes visible. Other messages are left for their visibility
/// timeout to return them.
async fn receive_run_messages(
    queues: &QueueClient,
    queue_name: &str,
    bodies: &[String],
) -> anyhow::Result<Vec<String>> {
    let deadline = Instant::now() + RECEIVE_DEADLINE;
    let mut received = Vec::new();

    while received.len() < bodies.len() && Instant::now() < deadline {
        let messages = queues
            .receive_messages(queue_name, 10, VISIBILITY_TIMEOUT_SECS, WAIT_TIME_SECS)
            .await
            .context("receive messages")?;

        for message in messages {
            if !bodies.contains(&message.body) {
                continue;
            }
            queues
                .delete_message(queue_name, &message.receipt_handle)
                .await
                .context("delete message")?;
            received.push(message.body);
        }
    }
    info!("Received and deleted {} messages", received.len());

    Ok(received)
}

async fn create_fifo_queue(queues: &QueueClient, queue_name: &str) -> anyhow::Result<String> {
    let output = queues
        .sdk_client()
        .create_queue()
        .queue_name(queue_name)
        .attributes(QueueAttributeName::FifoQueue, "true")
        .attributes(QueueAttributeName::ContentBasedDeduplication, "true")
        .send()
        .await
        .context("create queue")?;

    let queue_url = output
        .queue_url()
        .context("queue URL not returned")?
        .to_string();
    info!("Created queue {}", queue_url);

    Ok(queue_url)
}

//! Integration tests for ObjectStoreClient against LocalStack

mod common;

use cloud_clients::object_store::MIN_PART_SIZE;
use cloud_clients::{ObjectStoreClient, ObjectStoreError};
use common::{localstack_config, unique_name, BucketTestContext};
use pretty_assertions::assert_eq;

async fn download(store: &ObjectStoreClient, bucket: &str, key: &str) -> Vec<u8> {
    let response = store
        .sdk_client()
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .expect("Failed to get object");

    response
        .body
        .collect()
        .await
        .expect("Failed to read object body")
        .into_bytes()
        .to_vec()
}

#[tokio::test]
async fn test_bucket_and_object_lifecycle() {
    let store = ObjectStoreClient::new(&localstack_config()).unwrap();
    let bucket = unique_name("b1");

    store
        .create_bucket(&bucket)
        .await
        .expect("Failed to create bucket");

    let upload = store
        .upload_object(&bucket, "k1", &b"hello"[..], "text/plain", "public, max-age=14400")
        .await
        .expect("Failed to upload object");
    assert_eq!(upload.key, "k1");
    assert!(upload.upload_id.is_none(), "Small bodies use a single request");

    let keys: Vec<String> = store
        .list_objects(&bucket)
        .await
        .expect("Failed to list objects")
        .into_iter()
        .map(|object| object.key)
        .collect();
    assert_eq!(keys, vec!["k1".to_string()]);

    store
        .delete_object(&bucket, "k1")
        .await
        .expect("Failed to delete object");

    let objects = store
        .list_objects(&bucket)
        .await
        .expect("Failed to list objects");
    assert!(objects.iter().all(|object| object.key != "k1"));

    store
        .delete_bucket(&bucket)
        .await
        .expect("Failed to delete bucket");

    let buckets = store.list_buckets().await.expect("Failed to list buckets");
    assert!(buckets.iter().all(|info| info.name != bucket));
}

#[tokio::test]
async fn test_list_objects_on_empty_bucket() {
    let ctx = BucketTestContext::new("empty").await;

    let objects = ctx
        .store
        .list_objects(&ctx.bucket)
        .await
        .expect("Listing an empty bucket should succeed");

    assert!(objects.is_empty());
}

#[tokio::test]
async fn test_list_buckets_includes_created_bucket() {
    let ctx = BucketTestContext::new("listed").await;

    let buckets = ctx.store.list_buckets().await.expect("Failed to list buckets");

    let bucket = buckets
        .iter()
        .find(|info| info.name == ctx.bucket)
        .expect("Created bucket should be listed");
    assert!(bucket.created_at.is_some());
}

#[tokio::test]
async fn test_presigned_url_returns_uploaded_bytes() {
    let ctx = BucketTestContext::new("presign").await;

    ctx.store
        .upload_object(&ctx.bucket, "test.txt", &b"test"[..], "text/plain", "no-cache")
        .await
        .expect("Failed to upload object");

    let presigned = ctx
        .store
        .presign_get_object(&ctx.bucket, "test.txt")
        .await
        .expect("Failed to presign URL");

    let response = reqwest::get(&presigned.url)
        .await
        .expect("Failed to fetch presigned URL");
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/plain")
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"test");
}

#[tokio::test]
async fn test_multipart_upload_stores_exact_bytes() {
    let ctx = BucketTestContext::new("multipart").await;

    // Two full parts and a short final part
    let body: Vec<u8> = (0..2 * MIN_PART_SIZE + 1234)
        .map(|i| u8::try_from(i % 251).unwrap())
        .collect();

    let upload = ctx
        .store
        .upload_object(
            &ctx.bucket,
            "large.bin",
            body.as_slice(),
            "application/octet-stream",
            "no-cache",
        )
        .await
        .expect("Failed to upload large object");
    assert!(upload.upload_id.is_some(), "Large bodies use multipart upload");

    let stored = download(&ctx.store, &ctx.bucket, "large.bin").await;
    assert_eq!(stored.len(), body.len());
    assert!(stored == body, "Stored bytes should match the uploaded body");
}

#[tokio::test]
async fn test_copy_object_between_buckets() {
    let source = BucketTestContext::new("copy-src").await;
    let destination = BucketTestContext::new("copy-dst").await;

    source
        .store
        .upload_object(&source.bucket, "dir/report 1.txt", &b"copy me"[..], "text/plain", "no-cache")
        .await
        .expect("Failed to upload source object");

    source
        .store
        .copy_object(&source.bucket, "dir/report 1.txt", &destination.bucket)
        .await
        .expect("Failed to copy object");

    let copied = download(&destination.store, &destination.bucket, "dir/report 1.txt").await;
    assert_eq!(copied, b"copy me");

    let remaining = source.store.list_objects(&source.bucket).await.unwrap();
    assert_eq!(remaining.len(), 1, "Copy should leave the source in place");
}

#[tokio::test]
async fn test_delete_non_empty_bucket_fails() {
    let ctx = BucketTestContext::new("non-empty").await;

    ctx.store
        .upload_object(&ctx.bucket, "k1", &b"hello"[..], "text/plain", "no-cache")
        .await
        .unwrap();

    let err = ctx.store.delete_bucket(&ctx.bucket).await.unwrap_err();

    assert!(matches!(err, ObjectStoreError::DeleteBucket(_)));
    assert!(!err.is_upstream_error());
}

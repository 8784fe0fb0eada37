//! S3 bucket and object operations
mod error;
mod types;
mod upload;

use std::time::Duration;

use aws_sdk_s3::{
    presigning::PresigningConfig,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
    Client as S3Client,
};
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::io::AsyncRead;
use tracing::{debug, info};

use crate::config::{ClientConfig, ConfigError};
use upload::UploadRequest;

pub use error::{ObjectStoreError, ObjectStoreResult};
pub use types::{BucketInfo, ObjectInfo, PresignedUrl, UploadOutput};
pub use upload::MIN_PART_SIZE;

/// Default lifetime of presigned GET URLs
pub const DEFAULT_PRESIGNED_URL_EXPIRY: Duration = Duration::from_secs(15 * 60);

/// Region S3 treats as the default location, where no location constraint may be sent
const DEFAULT_S3_REGION: &str = "us-east-1";

/// Characters escaped in the key part of a copy source
const COPY_SOURCE_KEY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// S3 client wrapper for bucket and object operations
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ObjectStoreClient {
    client: S3Client,
    endpoint_url: Option<String>,
    part_size: usize,
}

impl ObjectStoreClient {
    /// Creates a new object store client from static credentials
    ///
    /// No network call is made; the connection is established on first use.
    /// A custom endpoint switches the client to path-style addressing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if region, access key or secret key is empty
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let sdk_config = config.to_sdk_config()?;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        // LocalStack and most S3 compatible servers do not resolve virtual-hosted buckets
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if config.endpoint_url.is_some() {
            builder.set_force_path_style(Some(true));
        }

        info!(
            "Initialized S3 client for region: {} (endpoint: {})",
            config.region,
            config.endpoint_url.as_deref().unwrap_or("default")
        );

        Ok(Self {
            client: S3Client::from_conf(builder.build()),
            endpoint_url: config.endpoint_url.clone(),
            part_size: MIN_PART_SIZE,
        })
    }

    /// Wraps a pre-configured S3 client
    #[must_use]
    pub const fn from_sdk_client(client: S3Client) -> Self {
        Self {
            client,
            endpoint_url: None,
            part_size: MIN_PART_SIZE,
        }
    }

    /// Sets the part size used by [`Self::upload_object`]
    ///
    /// Values below [`MIN_PART_SIZE`] are raised to it.
    #[must_use]
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size.max(MIN_PART_SIZE);
        self
    }

    /// Returns the underlying SDK client
    #[must_use]
    pub const fn sdk_client(&self) -> &S3Client {
        &self.client
    }

    /// Creates a bucket
    ///
    /// Outside `us-east-1` the location constraint is set to the client's region.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::CreateBucket` if the bucket exists, the name is
    /// invalid, or access is denied
    pub async fn create_bucket(&self, bucket: &str) -> ObjectStoreResult<()> {
        debug!("Creating bucket: {}", bucket);

        let mut request = self.client.create_bucket().bucket(bucket);

        if let Some(region) = self.client.config().region() {
            let region: &str = region.as_ref();
            if region != DEFAULT_S3_REGION {
                request = request.create_bucket_configuration(
                    CreateBucketConfiguration::builder()
                        .location_constraint(BucketLocationConstraint::from(region))
                        .build(),
                );
            }
        }

        request.send().await?;
        Ok(())
    }

    /// Deletes an empty bucket
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::DeleteBucket` if the bucket is missing, not empty,
    /// or access is denied
    pub async fn delete_bucket(&self, bucket: &str) -> ObjectStoreResult<()> {
        debug!("Deleting bucket: {}", bucket);

        self.client.delete_bucket().bucket(bucket).send().await?;
        Ok(())
    }

    /// Streams `body` into `bucket/key`
    ///
    /// The body is read one part at a time, so arbitrarily large streams are
    /// uploaded without buffering the whole payload.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Destination bucket
    /// * `key` - Destination key
    /// * `body` - Object contents
    /// * `content_type` - Stored `Content-Type` metadata
    /// * `cache_control` - Stored `Cache-Control` metadata
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::Io` if reading the body fails, or the error of the
    /// failing S3 request. A failed multipart upload is aborted before returning.
    pub async fn upload_object<R>(
        &self,
        bucket: &str,
        key: &str,
        mut body: R,
        content_type: &str,
        cache_control: &str,
    ) -> ObjectStoreResult<UploadOutput>
    where
        R: AsyncRead + Unpin + Send,
    {
        let request = UploadRequest {
            bucket,
            key,
            content_type,
            cache_control,
        };
        self.upload_stream(&request, &mut body).await
    }

    /// Deletes an object
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::DeleteObject` if the service rejects the request
    pub async fn delete_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<()> {
        debug!("Deleting object: {}/{}", bucket, key);

        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    /// Copies `source_bucket/key` into `destination_bucket/key`
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::CopyObject` if the source is missing or either
    /// bucket is not accessible
    pub async fn copy_object(
        &self,
        source_bucket: &str,
        key: &str,
        destination_bucket: &str,
    ) -> ObjectStoreResult<()> {
        let copy_source = copy_source(source_bucket, key);
        debug!("Copying object {} to {}/{}", copy_source, destination_bucket, key);

        self.client
            .copy_object()
            .copy_source(copy_source)
            .bucket(destination_bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    /// Generates a presigned GET URL valid for [`DEFAULT_PRESIGNED_URL_EXPIRY`]
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::PresignGetObject` if signing fails
    pub async fn presign_get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> ObjectStoreResult<PresignedUrl> {
        self.presign_get_object_with_expiry(bucket, key, DEFAULT_PRESIGNED_URL_EXPIRY)
            .await
    }

    /// Generates a presigned GET URL valid for `expires_in`
    ///
    /// Signing happens locally; the object is not checked for existence.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::Presigning` if `expires_in` exceeds one week
    /// Returns `ObjectStoreError::PresignGetObject` if signing fails
    pub async fn presign_get_object_with_expiry(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> ObjectStoreResult<PresignedUrl> {
        let presigning_config = PresigningConfig::expires_in(expires_in)?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await?;

        let expires_at = Utc::now() + expires_in;
        debug!(
            "Generated presigned URL for object: {}/{} expires at: {}",
            bucket, key, expires_at
        );

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at,
            signed_headers: presigned
                .headers()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
    }

    /// Lists the caller's buckets
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::ListBuckets` if the service rejects the request
    pub async fn list_buckets(&self) -> ObjectStoreResult<Vec<BucketInfo>> {
        let output = self.client.list_buckets().send().await?;

        Ok(output
            .buckets()
            .iter()
            .map(|bucket| BucketInfo {
                name: bucket.name().unwrap_or_default().to_string(),
                created_at: bucket.creation_date().and_then(types::to_utc),
            })
            .collect())
    }

    /// Lists the first page of objects in a bucket
    ///
    /// An empty bucket yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::ListObjects` if the bucket is missing or access
    /// is denied
    pub async fn list_objects(&self, bucket: &str) -> ObjectStoreResult<Vec<ObjectInfo>> {
        let output = self.client.list_objects_v2().bucket(bucket).send().await?;

        Ok(output
            .contents()
            .iter()
            .map(|object| ObjectInfo {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or_default(),
                e_tag: object.e_tag().map(ToString::to_string),
                last_modified: object.last_modified().and_then(types::to_utc),
            })
            .collect())
    }

    /// Builds the URL an uploaded object is reachable at
    fn object_location(&self, bucket: &str, key: &str) -> String {
        let key = utf8_percent_encode(key, COPY_SOURCE_KEY);
        match &self.endpoint_url {
            Some(endpoint) => format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/')),
            None => {
                let region = self
                    .client
                    .config()
                    .region()
                    .map_or(DEFAULT_S3_REGION, |region| region.as_ref());
                format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
            }
        }
    }
}

/// Formats the `x-amz-copy-source` value for `bucket/key`
fn copy_source(bucket: &str, key: &str) -> String {
    format!("{bucket}/{}", utf8_percent_encode(key, COPY_SOURCE_KEY))
}

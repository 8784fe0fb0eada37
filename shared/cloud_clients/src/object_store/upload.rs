//! Streaming uploads
//!
//! Bodies that fit in a single part are sent with one `PutObject`. Larger
//! bodies go through a multipart upload, buffering one part at a time.

use aws_sdk_s3::{
    primitives::ByteStream,
    types::{CompletedMultipartUpload, CompletedPart},
};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use super::{ObjectStoreClient, ObjectStoreError, ObjectStoreResult, UploadOutput};

/// Smallest part size S3 accepts for every part except the last one
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// Reads up to `part_size` bytes, looping over short reads
///
/// A returned buffer shorter than `part_size` means the reader is exhausted.
pub(crate) async fn read_part<R>(reader: &mut R, part_size: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(part_size);
    (&mut *reader)
        .take(part_size as u64)
        .read_to_end(&mut buf)
        .await?;
    Ok(buf)
}

/// Object metadata applied to every upload
pub(crate) struct UploadRequest<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub content_type: &'a str,
    pub cache_control: &'a str,
}

impl ObjectStoreClient {
    pub(crate) async fn upload_stream<R>(
        &self,
        request: &UploadRequest<'_>,
        body: &mut R,
    ) -> ObjectStoreResult<UploadOutput>
    where
        R: AsyncRead + Unpin + Send,
    {
        let first = read_part(body, self.part_size).await?;
        if first.len() < self.part_size {
            return self.put_single(request, first).await;
        }

        let second = read_part(body, self.part_size).await?;
        if second.is_empty() {
            return self.put_single(request, first).await;
        }

        let create = self
            .client
            .create_multipart_upload()
            .bucket(request.bucket)
            .key(request.key)
            .content_type(request.content_type)
            .cache_control(request.cache_control)
            .send()
            .await?;
        let upload_id = create
            .upload_id()
            .ok_or(ObjectStoreError::MissingUploadId)?
            .to_string();

        debug!(
            "Started multipart upload {} for {}/{}",
            upload_id, request.bucket, request.key
        );

        match self
            .upload_parts(request, &upload_id, [first, second], body)
            .await
        {
            Ok(output) => Ok(output),
            Err(e) => {
                self.abort_upload(request, &upload_id).await;
                Err(e)
            }
        }
    }

    async fn put_single(
        &self,
        request: &UploadRequest<'_>,
        data: Vec<u8>,
    ) -> ObjectStoreResult<UploadOutput> {
        debug!(
            "Uploading {} bytes to {}/{} in a single request",
            data.len(),
            request.bucket,
            request.key
        );

        let output = self
            .client
            .put_object()
            .bucket(request.bucket)
            .key(request.key)
            .content_type(request.content_type)
            .cache_control(request.cache_control)
            .body(ByteStream::from(data))
            .send()
            .await?;

        Ok(UploadOutput {
            location: self.object_location(request.bucket, request.key),
            bucket: request.bucket.to_string(),
            key: request.key.to_string(),
            e_tag: output.e_tag().map(ToString::to_string),
            version_id: output.version_id().map(ToString::to_string),
            upload_id: None,
        })
    }

    async fn upload_parts<R>(
        &self,
        request: &UploadRequest<'_>,
        upload_id: &str,
        buffered: [Vec<u8>; 2],
        body: &mut R,
    ) -> ObjectStoreResult<UploadOutput>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut completed_parts = Vec::new();
        let mut part_number = 1;
        let mut exhausted = false;

        for data in buffered {
            exhausted = data.len() < self.part_size;
            completed_parts.push(self.upload_part(request, upload_id, part_number, data).await?);
            part_number += 1;
        }

        while !exhausted {
            let data = read_part(body, self.part_size).await?;
            if data.is_empty() {
                break;
            }
            exhausted = data.len() < self.part_size;
            completed_parts.push(self.upload_part(request, upload_id, part_number, data).await?);
            part_number += 1;
        }

        let output = self
            .client
            .complete_multipart_upload()
            .bucket(request.bucket)
            .key(request.key)
            .upload_id(upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(completed_parts))
                    .build(),
            )
            .send()
            .await?;

        debug!(
            "Completed multipart upload {} for {}/{} with {} parts",
            upload_id,
            request.bucket,
            request.key,
            part_number - 1
        );

        Ok(UploadOutput {
            location: output.location().map_or_else(
                || self.object_location(request.bucket, request.key),
                ToString::to_string,
            ),
            bucket: request.bucket.to_string(),
            key: request.key.to_string(),
            e_tag: output.e_tag().map(ToString::to_string),
            version_id: output.version_id().map(ToString::to_string),
            upload_id: Some(upload_id.to_string()),
        })
    }

    async fn upload_part(
        &self,
        request: &UploadRequest<'_>,
        upload_id: &str,
        part_number: i32,
        data: Vec<u8>,
    ) -> ObjectStoreResult<CompletedPart> {
        debug!(
            "Uploading part {} ({} bytes) of {}/{}",
            part_number,
            data.len(),
            request.bucket,
            request.key
        );

        let output = self
            .client
            .upload_part()
            .bucket(request.bucket)
            .key(request.key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(ByteStream::from(data))
            .send()
            .await?;

        Ok(CompletedPart::builder()
            .set_e_tag(output.e_tag().map(ToString::to_string))
            .part_number(part_number)
            .build())
    }

    /// Aborts a failed multipart upload so its parts stop accruing storage
    ///
    /// Failure here is logged; the caller returns the error that caused the abort.
    async fn abort_upload(&self, request: &UploadRequest<'_>, upload_id: &str) {
        if let Err(e) = self
            .client
            .abort_multipart_upload()
            .bucket(request.bucket)
            .key(request.key)
            .upload_id(upload_id)
            .send()
            .await
        {
            warn!(
                "Failed to abort multipart upload {} for {}/{}: {}",
                upload_id, request.bucket, request.key, e
            );
        }
    }
}

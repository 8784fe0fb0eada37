//! Error types for object store operations

use aws_sdk_s3::{
    error::SdkError,
    operation::{
        complete_multipart_upload::CompleteMultipartUploadError, copy_object::CopyObjectError,
        create_bucket::CreateBucketError, create_multipart_upload::CreateMultipartUploadError,
        delete_bucket::DeleteBucketError, delete_object::DeleteObjectError,
        get_object::GetObjectError, list_buckets::ListBucketsError,
        list_objects_v2::ListObjectsV2Error, put_object::PutObjectError,
        upload_part::UploadPartError,
    },
    presigning::PresigningConfigError,
};
use thiserror::Error;

/// Result type for object store operations
pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Errors that can occur during object store operations
///
/// Service errors are carried unmodified so callers can inspect the
/// operation specific error codes.
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    /// Error creating a bucket
    #[error("Failed to create bucket")]
    CreateBucket(#[from] SdkError<CreateBucketError>),

    /// Error deleting a bucket
    #[error("Failed to delete bucket")]
    DeleteBucket(#[from] SdkError<DeleteBucketError>),

    /// Error uploading an object in a single request
    #[error("Failed to put object")]
    PutObject(#[from] SdkError<PutObjectError>),

    /// Error starting a multipart upload
    #[error("Failed to create multipart upload")]
    CreateMultipartUpload(#[from] SdkError<CreateMultipartUploadError>),

    /// Error uploading one part of a multipart upload
    #[error("Failed to upload part")]
    UploadPart(#[from] SdkError<UploadPartError>),

    /// Error completing a multipart upload
    #[error("Failed to complete multipart upload")]
    CompleteMultipartUpload(#[from] SdkError<CompleteMultipartUploadError>),

    /// Error deleting an object
    #[error("Failed to delete object")]
    DeleteObject(#[from] SdkError<DeleteObjectError>),

    /// Error copying an object
    #[error("Failed to copy object")]
    CopyObject(#[from] SdkError<CopyObjectError>),

    /// Error presigning a GET request
    #[error("Failed to presign object request")]
    PresignGetObject(#[from] SdkError<GetObjectError>),

    /// Error listing buckets
    #[error("Failed to list buckets")]
    ListBuckets(#[from] SdkError<ListBucketsError>),

    /// Error listing objects
    #[error("Failed to list objects")]
    ListObjects(#[from] SdkError<ListObjectsV2Error>),

    /// Presigned URL expiry is out of range
    #[error("Invalid presigning configuration: {0}")]
    Presigning(#[from] PresigningConfigError),

    /// Error reading the upload body
    #[error("Failed to read upload body: {0}")]
    Io(#[from] std::io::Error),

    /// Multipart upload was created without an upload id
    #[error("Multipart upload response did not include an upload id")]
    MissingUploadId,
}

impl ObjectStoreError {
    /// Checks if this error represents an upstream (5xx) error
    #[must_use]
    pub fn is_upstream_error(&self) -> bool {
        match self {
            Self::CreateBucket(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::DeleteBucket(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::PutObject(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::CreateMultipartUpload(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::UploadPart(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::CompleteMultipartUpload(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::DeleteObject(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::CopyObject(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::PresignGetObject(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::ListBuckets(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::ListObjects(sdk_err) => Self::check_sdk_error_status(sdk_err),
            Self::Presigning(_) | Self::Io(_) | Self::MissingUploadId => false,
        }
    }

    fn check_sdk_error_status<E>(sdk_err: &SdkError<E>) -> bool {
        if let SdkError::ServiceError(err) = sdk_err {
            return err.raw().status().as_u16() >= 500;
        }
        false
    }
}

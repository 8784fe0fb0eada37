use chrono::{DateTime, Utc};

/// Result of a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutput {
    /// URL of the stored object
    pub location: String,
    /// Bucket the object was written to
    pub bucket: String,
    /// Key the object was written under
    pub key: String,
    /// Entity tag of the stored object
    pub e_tag: Option<String>,
    /// Version id, when bucket versioning is enabled
    pub version_id: Option<String>,
    /// Multipart upload id, when the body was uploaded in parts
    pub upload_id: Option<String>,
}

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL
    pub url: String,
    /// HTTP method the URL is signed for
    pub method: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
    /// Headers that were signed and must be sent with the request
    pub signed_headers: Vec<(String, String)>,
}

/// A bucket owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketInfo {
    /// Bucket name
    pub name: String,
    /// Creation time reported by the service
    pub created_at: Option<DateTime<Utc>>,
}

/// An object stored in a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: i64,
    /// Entity tag
    pub e_tag: Option<String>,
    /// Last modification time reported by the service
    pub last_modified: Option<DateTime<Utc>>,
}

/// Converts an SDK timestamp into a chrono UTC timestamp
pub(crate) fn to_utc(timestamp: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_utc_keeps_subsecond_precision() {
        let timestamp = aws_sdk_s3::primitives::DateTime::from_secs_and_nanos(1_700_000_000, 250);
        let converted = to_utc(&timestamp).unwrap();

        assert_eq!(converted.timestamp(), 1_700_000_000);
        assert_eq!(converted.timestamp_subsec_nanos(), 250);
    }
}

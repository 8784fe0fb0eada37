//! Thin clients for S3 object storage and SQS queues
//!
//! Both clients are built from a [`ClientConfig`] carrying static credentials
//! and forward each call to the AWS SDK, returning SDK errors unmodified.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Credential and region configuration shared by both clients
pub mod config;
/// S3 bucket and object operations
pub mod object_store;
/// SQS queue operations
pub mod queue;

pub use config::{ClientConfig, ConfigError};
pub use object_store::{ObjectStoreClient, ObjectStoreError, ObjectStoreResult};
pub use queue::{QueueClient, QueueError, QueueResult};

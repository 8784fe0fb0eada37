//! End-to-end smoke checks for the object store and queue clients

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Smoke scenarios run against live services
pub mod scenario;
/// Environment configuration
pub mod types;

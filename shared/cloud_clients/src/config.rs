use std::fmt;
use std::time::Duration;

use aws_config::{timeout::TimeoutConfig, BehaviorVersion, Region, SdkConfig};
use aws_credential_types::{provider::SharedCredentialsProvider, Credentials};
use thiserror::Error;

const CREDENTIALS_PROVIDER_NAME: &str = "cloud_clients";

/// Errors raised while validating a [`ClientConfig`]
///
/// These are raised locally before any network activity and are never worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Region is empty
    #[error("region cannot be empty")]
    EmptyRegion,

    /// Access key is empty
    #[error("key cannot be empty")]
    EmptyAccessKey,

    /// Secret key is empty
    #[error("secret cannot be empty")]
    EmptySecretKey,
}

/// Region and static credentials used to build a client
///
/// The value is consumed when a client is constructed and is not retained by it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// AWS region, e.g. `us-east-2`
    pub region: String,
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
    /// Endpoint override for S3/SQS compatible services such as `LocalStack`
    pub endpoint_url: Option<String>,
    /// Per-operation timeout applied by the SDK, including retries
    pub operation_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a config from a region and static credentials
    #[must_use]
    pub fn new(
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            region: region.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token,
            endpoint_url: None,
            operation_timeout: None,
        }
    }

    /// Points the clients at a custom endpoint
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Sets the SDK operation timeout
    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Checks that region, access key and secret key are set, in that order
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] for the first empty field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.is_empty() {
            return Err(ConfigError::EmptyRegion);
        }
        if self.access_key.is_empty() {
            return Err(ConfigError::EmptyAccessKey);
        }
        if self.secret_key.is_empty() {
            return Err(ConfigError::EmptySecretKey);
        }
        Ok(())
    }

    /// Validates the config and builds the shared SDK configuration
    ///
    /// Nothing is read from the process environment or profile files and no
    /// network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required field is empty
    pub fn to_sdk_config(&self) -> Result<SdkConfig, ConfigError> {
        self.validate()?;

        let credentials = Credentials::new(
            &self.access_key,
            &self.secret_key,
            self.session_token.clone().filter(|token| !token.is_empty()),
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut builder = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(SharedCredentialsProvider::new(credentials));

        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        if let Some(timeout) = self.operation_timeout {
            builder = builder.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        }

        Ok(builder.build())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .field("endpoint_url", &self.endpoint_url)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ClientConfig {
        ClientConfig::new("us-east-2", "AKIDEXAMPLE", "secret", Some("session".to_string()))
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert_eq!(valid_config().validate(), Ok(()));
    }

    #[test]
    fn test_validate_checks_region_first() {
        let config = ClientConfig::new("", "", "", None);
        assert_eq!(config.validate(), Err(ConfigError::EmptyRegion));
    }

    #[test]
    fn test_validate_checks_access_key_before_secret() {
        let config = ClientConfig::new("us-east-2", "", "", None);
        assert_eq!(config.validate(), Err(ConfigError::EmptyAccessKey));
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let config = ClientConfig::new("us-east-2", "AKIDEXAMPLE", "", None);
        assert_eq!(config.validate(), Err(ConfigError::EmptySecretKey));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ConfigError::EmptyRegion.to_string(), "region cannot be empty");
        assert_eq!(ConfigError::EmptyAccessKey.to_string(), "key cannot be empty");
        assert_eq!(ConfigError::EmptySecretKey.to_string(), "secret cannot be empty");
    }

    #[test]
    fn test_sdk_config_carries_region_and_endpoint() {
        let sdk_config = valid_config()
            .with_endpoint_url("http://localhost:4566")
            .to_sdk_config()
            .unwrap();

        assert_eq!(
            sdk_config.region().map(ToString::to_string),
            Some("us-east-2".to_string())
        );
        assert_eq!(sdk_config.endpoint_url(), Some("http://localhost:4566"));
        assert!(sdk_config.credentials_provider().is_some());
    }

    #[test]
    fn test_sdk_config_applies_operation_timeout() {
        let sdk_config = valid_config()
            .with_operation_timeout(Duration::from_secs(10))
            .to_sdk_config()
            .unwrap();

        let timeout = sdk_config
            .timeout_config()
            .and_then(TimeoutConfig::operation_timeout);
        assert_eq!(timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", valid_config());
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("\"secret\""));
        assert!(!rendered.contains("\"session\""));
    }
}

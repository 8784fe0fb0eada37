//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use anyhow::Context;
use cloud_clients::ClientConfig;
use uuid::Uuid;

const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Whether logs are emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub fn endpoint_url(&self) -> Option<String> {
        env::var("AWS_ENDPOINT_URL").ok().or_else(|| match self {
            Self::Production | Self::Staging => None,
            Self::Development => Some(LOCALSTACK_ENDPOINT.to_string()),
        })
    }

    /// Client configuration built from the standard AWS variables
    ///
    /// Development falls back to the `LocalStack` defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing outside development
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let region = self.var_or_default("AWS_REGION", "us-east-1")?;
        let access_key = self.var_or_default("AWS_ACCESS_KEY_ID", "test")?;
        let secret_key = self.var_or_default("AWS_SECRET_ACCESS_KEY", "test")?;
        let session_token = env::var("AWS_SESSION_TOKEN").ok();

        let mut config = ClientConfig::new(region, access_key, secret_key, session_token)
            .with_operation_timeout(Duration::from_secs(30));
        if let Some(endpoint_url) = self.endpoint_url() {
            config = config.with_endpoint_url(endpoint_url);
        }

        Ok(config)
    }

    /// Bucket used by the object store scenario
    #[must_use]
    pub fn smoke_bucket() -> String {
        env::var("SMOKE_BUCKET").unwrap_or_else(|_| format!("smoke-{}", Uuid::new_v4().simple()))
    }

    /// FIFO queue used by the queue scenario
    #[must_use]
    pub fn smoke_queue() -> String {
        env::var("SMOKE_QUEUE")
            .unwrap_or_else(|_| format!("smoke-{}.fifo", Uuid::new_v4().simple()))
    }

    fn var_or_default(&self, name: &str, default: &str) -> anyhow::Result<String> {
        match (env::var(name), self) {
            (Ok(value), _) => Ok(value),
            (Err(_), Self::Development) => Ok(default.to_string()),
            (Err(e), Self::Production | Self::Staging) => {
                Err(e).with_context(|| format!("{name} environment variable is not set"))
            }
        }
    }
}

//! Provider configuration.
//!
//! Values come from the environment:
//! - `QLINK_BRAKET_S3_BUCKET`: bucket for job records and task outputs.
//!   When unset, AWS-backed providers fall back to the account's
//!   `amazon-braket-{account_id}` bucket (see [`default_bucket`]).
//! - `AWS_REGION` (default: `"us-east-1"`)
//! - `QLINK_BRAKET_POLL_INTERVAL_MS` (default: 500)
//! - `QLINK_BRAKET_WAIT_TIMEOUT_SECS` (default: 300)

use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::{BraketError, BraketResult};

/// Environment variable naming the default bucket.
pub const ENV_S3_BUCKET: &str = "QLINK_BRAKET_S3_BUCKET";
/// Environment variable naming the AWS region.
pub const ENV_REGION: &str = "AWS_REGION";
/// Environment variable for the `wait` poll interval in milliseconds.
pub const ENV_POLL_INTERVAL_MS: &str = "QLINK_BRAKET_POLL_INTERVAL_MS";
/// Environment variable for the `wait` deadline in seconds.
pub const ENV_WAIT_TIMEOUT_SECS: &str = "QLINK_BRAKET_WAIT_TIMEOUT_SECS";

/// Prefix of the per-account default bucket.
pub const DEFAULT_BUCKET_PREFIX: &str = "amazon-braket-";

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);

/// Provider-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraketConfig {
    /// Default bucket for job records and task outputs.
    pub s3_bucket: Option<String>,
    /// AWS region.
    pub region: String,
    /// Interval between status polls in `wait`.
    pub poll_interval: Duration,
    /// Deadline for `wait`.
    pub wait_timeout: Duration,
}

impl Default for BraketConfig {
    fn default() -> Self {
        Self {
            s3_bucket: None,
            region: DEFAULT_REGION.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

impl BraketConfig {
    /// Load the configuration from environment variables.
    pub fn from_env() -> BraketResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BraketResult<Self> {
        let mut config = Self::default();

        if let Some(bucket) = lookup(ENV_S3_BUCKET).filter(|b| !b.is_empty()) {
            config.s3_bucket = Some(bucket);
        }
        if let Some(region) = lookup(ENV_REGION).filter(|r| !r.is_empty()) {
            config.region = region;
        }
        if let Some(ms) = lookup(ENV_POLL_INTERVAL_MS) {
            config.poll_interval = Duration::from_millis(parse_number(ENV_POLL_INTERVAL_MS, &ms)?);
        }
        if let Some(secs) = lookup(ENV_WAIT_TIMEOUT_SECS) {
            config.wait_timeout = Duration::from_secs(parse_number(ENV_WAIT_TIMEOUT_SECS, &secs)?);
        }

        Ok(config)
    }

    /// Set the default bucket.
    pub fn with_s3_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.s3_bucket = Some(bucket.into());
        self
    }

    /// Use the account's default bucket unless a bucket is already set.
    pub fn with_default_bucket(mut self, account_id: &str) -> Self {
        if self.s3_bucket.is_none() {
            self.s3_bucket = Some(default_bucket(account_id));
        }
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the wait deadline.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Resolve the bucket for a call: the per-call override, else the default.
    pub fn resolve_bucket(&self, requested: Option<&str>) -> BraketResult<String> {
        requested
            .or(self.s3_bucket.as_deref())
            .map(str::to_string)
            .ok_or(BraketError::MissingS3Bucket)
    }
}

/// Name of the default Braket bucket of an AWS account.
pub fn default_bucket(account_id: &str) -> String {
    format!("{DEFAULT_BUCKET_PREFIX}{account_id}")
}

fn parse_number(key: &str, raw: &str) -> BraketResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| BraketError::InvalidConfig(format!("{key}={raw} is not a number")))
}

/// Per-call options for submission and retrieval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Bucket override for this call.
    pub s3_bucket: Option<String>,
    /// Free-form metadata stored with the batch.
    pub extra_data: Option<Map<String, Value>>,
}

impl RunOptions {
    /// Options with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific bucket.
    pub fn with_s3_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.s3_bucket = Some(bucket.into());
        self
    }

    /// Attach metadata to the stored batch.
    pub fn with_extra_data(mut self, extra_data: Map<String, Value>) -> Self {
        self.extra_data = Some(extra_data);
        self
    }
}

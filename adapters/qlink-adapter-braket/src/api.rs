//! AWS SDK implementations of the remote service and blob store seams.
//!
//! [`BraketClient`] talks to the Braket control plane and reads task
//! results from the S3 folder the service wrote them to. [`S3BlobStore`]
//! keeps job records in S3.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_braket::error::DisplayErrorContext;
use aws_sdk_braket::types::{
    DeviceStatus as SdkDeviceStatus, DeviceType as SdkDeviceType, QuantumTaskStatus,
    SearchDevicesFilter,
};
use aws_sdk_s3::primitives::ByteStream;
use qlink_hal::{
    BlobStore, DeviceDescriptor, DeviceStatus, DeviceSummary, DeviceType, HalError, HalResult,
    RemoteService, S3Destination, TaskId, TaskResult, TaskState,
};
use qlink_ir::Program;
use tracing::{debug, warn};

use crate::config::BraketConfig;
use crate::device::provider_from_arn;
use crate::error::{BraketError, BraketResult};

/// Name of the result document inside a task's output folder.
const RESULTS_FILE: &str = "results.json";

/// Load the AWS SDK configuration for `region`.
///
/// Credentials come from the default chain (environment, SSO, config
/// files, IAM role).
pub async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .timeout_config(
            aws_config::timeout::TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(60))
                .connect_timeout(Duration::from_secs(10))
                .build(),
        )
        .load()
        .await
}

/// AWS account of the loaded credentials.
pub async fn caller_account_id(sdk_config: &aws_config::SdkConfig) -> BraketResult<String> {
    let identity = aws_sdk_sts::Client::new(sdk_config)
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| BraketError::StsError(DisplayErrorContext(&e).to_string()))?;
    identity
        .account()
        .map(str::to_string)
        .ok_or_else(|| BraketError::StsError("caller identity has no account".to_string()))
}

/// Fill in the account's default bucket when none is configured.
///
/// If the account cannot be determined the configuration is returned
/// unchanged, and submissions without a per-call bucket fail with
/// [`BraketError::MissingS3Bucket`].
pub async fn with_account_bucket(
    config: BraketConfig,
    sdk_config: &aws_config::SdkConfig,
) -> BraketConfig {
    if config.s3_bucket.is_some() {
        return config;
    }
    match caller_account_id(sdk_config).await {
        Ok(account_id) => {
            let config = config.with_default_bucket(&account_id);
            debug!(bucket = ?config.s3_bucket, "Using the account's default bucket");
            config
        }
        Err(e) => {
            warn!(error = %e, "Could not determine the default bucket");
            config
        }
    }
}

fn device_type(sdk: &SdkDeviceType) -> DeviceType {
    match sdk {
        SdkDeviceType::Qpu => DeviceType::Qpu,
        _ => DeviceType::Simulator,
    }
}

fn device_status(sdk: &SdkDeviceStatus) -> DeviceStatus {
    match sdk {
        SdkDeviceStatus::Online => DeviceStatus::Online,
        SdkDeviceStatus::Retired => DeviceStatus::Retired,
        _ => DeviceStatus::Offline,
    }
}

fn provider_name<'a>(reported: &'a str, arn: &'a str) -> &'a str {
    if reported.is_empty() {
        provider_from_arn(arn)
    } else {
        reported
    }
}

/// Map a Braket task status to the task state machine.
///
/// A task being cancelled will not produce a result, so it already counts
/// as cancelled.
fn task_state(status: &QuantumTaskStatus) -> TaskState {
    match status {
        QuantumTaskStatus::Created => TaskState::Created,
        QuantumTaskStatus::Queued => TaskState::Queued,
        QuantumTaskStatus::Running => TaskState::Running,
        QuantumTaskStatus::Completed => TaskState::Completed,
        QuantumTaskStatus::Failed => TaskState::Failed,
        QuantumTaskStatus::Cancelling | QuantumTaskStatus::Cancelled => TaskState::Cancelled,
        other => {
            warn!(status = ?other, "Unknown task status, treating as failed");
            TaskState::Failed
        }
    }
}

fn results_key(output_directory: &str) -> String {
    format!("{}/{RESULTS_FILE}", output_directory.trim_end_matches('/'))
}

/// AWS Braket API client.
#[derive(Clone)]
pub struct BraketClient {
    braket: aws_sdk_braket::Client,
    s3: aws_sdk_s3::Client,
    region: Option<String>,
}

impl fmt::Debug for BraketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraketClient")
            .field("region", &self.region)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl BraketClient {
    /// Create a client for `region` using the default credential chain.
    pub async fn new(region: &str) -> Self {
        Self::from_sdk_config(&load_sdk_config(region).await)
    }

    /// Create a client from an already loaded SDK configuration.
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self {
            braket: aws_sdk_braket::Client::new(config),
            s3: aws_sdk_s3::Client::new(config),
            region: config.region().map(ToString::to_string),
        }
    }
}

#[async_trait]
impl RemoteService for BraketClient {
    async fn search_devices(&self, name: Option<&str>) -> HalResult<Vec<DeviceSummary>> {
        let mut filters = Vec::new();
        if let Some(name) = name {
            filters.push(
                SearchDevicesFilter::builder()
                    .name("deviceName")
                    .values(name)
                    .build()
                    .map_err(|e| BraketError::BraketApi(e.to_string()))?,
            );
        }

        let mut devices = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let resp = self
                .braket
                .search_devices()
                .set_filters(Some(filters.clone()))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| BraketError::BraketApi(DisplayErrorContext(&e).to_string()))?;

            devices.extend(resp.devices().iter().map(|d| DeviceSummary {
                arn: d.device_arn().to_string(),
                name: d.device_name().to_string(),
                provider_name: provider_name(d.provider_name(), d.device_arn()).to_string(),
                device_type: device_type(d.device_type()),
                status: device_status(d.device_status()),
            }));

            match resp.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(count = devices.len(), filter = ?name, "Searched devices");
        Ok(devices)
    }

    async fn get_device(&self, device_arn: &str) -> HalResult<DeviceDescriptor> {
        let resp = self
            .braket
            .get_device()
            .device_arn(device_arn)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception())
                {
                    HalError::DeviceNotFound(device_arn.to_string())
                } else {
                    BraketError::BraketApi(DisplayErrorContext(&e).to_string()).into()
                }
            })?;

        let capabilities: serde_json::Value = serde_json::from_str(resp.device_capabilities())?;

        Ok(DeviceDescriptor {
            summary: DeviceSummary {
                arn: resp.device_arn().to_string(),
                name: resp.device_name().to_string(),
                provider_name: provider_name(resp.provider_name(), resp.device_arn()).to_string(),
                device_type: device_type(resp.device_type()),
                status: device_status(resp.device_status()),
            },
            capabilities,
        })
    }

    async fn create_task(
        &self,
        device_arn: &str,
        program: &Program,
        destination: &S3Destination,
        shots: u32,
    ) -> HalResult<TaskId> {
        let action = program.to_json()?;

        let resp = self
            .braket
            .create_quantum_task()
            .device_arn(device_arn)
            .action(action.to_string())
            .shots(i64::from(shots))
            .output_s3_bucket(&destination.bucket)
            .output_s3_key_prefix(&destination.prefix)
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(DisplayErrorContext(&e).to_string()))?;

        Ok(TaskId::new(resp.quantum_task_arn()))
    }

    async fn task_state(&self, task: &TaskId) -> HalResult<TaskState> {
        let resp = self
            .braket
            .get_quantum_task()
            .quantum_task_arn(task.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception())
                {
                    HalError::TaskNotFound(task.to_string())
                } else {
                    BraketError::BraketApi(DisplayErrorContext(&e).to_string()).into()
                }
            })?;

        let state = task_state(resp.status());
        if state == TaskState::Failed {
            warn!(
                task = %task,
                reason = resp.failure_reason().unwrap_or("unknown"),
                "Task failed"
            );
        }
        Ok(state)
    }

    async fn task_result(&self, task: &TaskId) -> HalResult<TaskResult> {
        let resp = self
            .braket
            .get_quantum_task()
            .quantum_task_arn(task.as_str())
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(DisplayErrorContext(&e).to_string()))?;

        let bucket = resp.output_s3_bucket();
        let key = results_key(resp.output_s3_directory());
        debug!(task = %task, bucket, key = %key, "Reading task result");

        let object = self
            .s3
            .get_object()
            .bucket(bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    HalError::InvalidTaskResult {
                        task: task.to_string(),
                        reason: format!("no result document at s3://{bucket}/{key}"),
                    }
                } else {
                    BraketError::S3Error(DisplayErrorContext(&e).to_string()).into()
                }
            })?;

        let body = object
            .body
            .collect()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        Ok(serde_json::from_slice(&body.into_bytes())?)
    }

    async fn cancel_task(&self, task: &TaskId) -> HalResult<()> {
        self.braket
            .cancel_quantum_task()
            .quantum_task_arn(task.as_str())
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

/// S3-backed blob store.
#[derive(Clone)]
pub struct S3BlobStore {
    s3: aws_sdk_s3::Client,
}

impl fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl S3BlobStore {
    /// Create a store from an already loaded SDK configuration.
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self {
            s3: aws_sdk_s3::Client::new(config),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn exists(&self, bucket: &str, key: &str) -> HalResult<bool> {
        let resp = self
            .s3
            .list_objects_v2()
            .bucket(bucket)
            .prefix(key)
            .send()
            .await
            .map_err(|e| BraketError::S3Error(DisplayErrorContext(&e).to_string()))?;

        Ok(resp.contents().iter().any(|o| o.key() == Some(key)))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> HalResult<()> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| BraketError::S3Error(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> HalResult<Vec<u8>> {
        let resp = self
            .s3
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    HalError::ObjectNotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    BraketError::S3Error(DisplayErrorContext(&e).to_string()).into()
                }
            })?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        Ok(body.into_bytes().to_vec())
    }

    async fn delete(&self, bucket: &str, key: &str) -> HalResult<()> {
        self.s3
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| BraketError::S3Error(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

//! The remote quantum service seam.
//!
//! [`RemoteService`] is everything qlink needs from the cloud: device
//! discovery, device snapshots and the task lifecycle. The AWS
//! implementation lives in `qlink-adapter-braket`; tests supply mocks.

use async_trait::async_trait;
use qlink_ir::Program;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HalResult;
use crate::task::{TaskId, TaskResult, TaskState};

/// Kind of device offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    /// Physical quantum processor.
    Qpu,
    /// Managed simulator.
    Simulator,
}

/// Availability of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    /// Accepting tasks.
    Online,
    /// Temporarily not accepting tasks.
    Offline,
    /// Permanently withdrawn.
    Retired,
}

/// Listing entry for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Device ARN.
    pub arn: String,
    /// Display name (`"SV1"`, `"Aria 1"`, ...).
    pub name: String,
    /// Provider name (`"Amazon Braket"`, `"IonQ"`, ...).
    pub provider_name: String,
    /// Device kind.
    pub device_type: DeviceType,
    /// Device availability.
    pub status: DeviceStatus,
}

/// Full device snapshot including the raw capabilities document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Listing fields.
    #[serde(flatten)]
    pub summary: DeviceSummary,
    /// Capabilities document as published by the service.
    pub capabilities: Value,
}

impl DeviceDescriptor {
    /// Device ARN.
    pub fn arn(&self) -> &str {
        &self.summary.arn
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.summary.name
    }
}

/// Object storage location for task outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Destination {
    /// Bucket name.
    pub bucket: String,
    /// Key prefix under which the service writes results.
    pub prefix: String,
}

impl S3Destination {
    /// Create a destination.
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }
}

/// Cloud quantum service.
///
/// Calls are independent request/response operations; implementations
/// hold no per-job state.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// List gate-model and annealing devices, optionally filtered by name.
    async fn search_devices(&self, name: Option<&str>) -> HalResult<Vec<DeviceSummary>>;

    /// Fetch the full snapshot of one device.
    async fn get_device(&self, device_arn: &str) -> HalResult<DeviceDescriptor>;

    /// Create a task running `program` for `shots` shots.
    async fn create_task(
        &self,
        device_arn: &str,
        program: &Program,
        destination: &S3Destination,
        shots: u32,
    ) -> HalResult<TaskId>;

    /// Current state of a task.
    async fn task_state(&self, task: &TaskId) -> HalResult<TaskState>;

    /// Result document of a completed task.
    async fn task_result(&self, task: &TaskId) -> HalResult<TaskResult>;

    /// Request cancellation of a task.
    async fn cancel_task(&self, task: &TaskId) -> HalResult<()>;
}

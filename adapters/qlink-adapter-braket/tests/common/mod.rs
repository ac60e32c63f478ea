//! In-process collaborators for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use qlink_adapter_braket::{BraketDevice, DeviceCapabilities};
use qlink_hal::{
    DeviceDescriptor, DeviceStatus, DeviceSummary, DeviceType, HalError, HalResult, RemoteService,
    S3Destination, TaskId, TaskResult, TaskState,
};
use qlink_ir::Program;
use serde_json::{Value, json};

pub const SV1_ARN: &str = "arn:aws:braket:::device/quantum-simulator/amazon/sv1";

/// Route library logs to the test output; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A task as the mock service saw it.
#[derive(Debug, Clone)]
pub struct CreatedTask {
    pub id: TaskId,
    pub device_arn: String,
    pub program: Program,
    pub destination: S3Destination,
    pub shots: u32,
}

/// Scriptable remote service.
#[derive(Default)]
pub struct MockService {
    /// Zero-based index of the `create_task` call that fails.
    pub fail_create_at: Option<usize>,
    /// Tasks whose cancellation fails.
    pub fail_cancel: Vec<TaskId>,
    /// Number of status polls per task before it reports `COMPLETED`.
    pub complete_after_polls: Option<usize>,
    pub devices: Vec<DeviceDescriptor>,
    pub created: Mutex<Vec<CreatedTask>>,
    pub cancelled: Mutex<Vec<TaskId>>,
    pub states: Mutex<HashMap<TaskId, TaskState>>,
    pub results: Mutex<HashMap<TaskId, TaskResult>>,
    pub polls: Mutex<HashMap<TaskId, usize>>,
    pub create_calls: Mutex<usize>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_ids(&self) -> Vec<TaskId> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn cancelled_ids(&self) -> Vec<TaskId> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn set_state(&self, task: &TaskId, state: TaskState) {
        self.states.lock().unwrap().insert(task.clone(), state);
    }

    pub fn set_counts(&self, task: &TaskId, counts: &[(&str, u64)]) {
        let result = TaskResult {
            measurement_counts: Some(counts.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()),
            ..Default::default()
        };
        self.results.lock().unwrap().insert(task.clone(), result);
    }
}

#[async_trait]
impl RemoteService for MockService {
    async fn search_devices(&self, name: Option<&str>) -> HalResult<Vec<DeviceSummary>> {
        Ok(self
            .devices
            .iter()
            .filter(|d| name.is_none_or(|n| d.name() == n))
            .map(|d| d.summary.clone())
            .collect())
    }

    async fn get_device(&self, device_arn: &str) -> HalResult<DeviceDescriptor> {
        self.devices
            .iter()
            .find(|d| d.arn() == device_arn)
            .cloned()
            .ok_or_else(|| HalError::DeviceNotFound(device_arn.to_string()))
    }

    async fn create_task(
        &self,
        device_arn: &str,
        program: &Program,
        destination: &S3Destination,
        shots: u32,
    ) -> HalResult<TaskId> {
        let call = {
            let mut calls = self.create_calls.lock().unwrap();
            *calls += 1;
            *calls - 1
        };
        if self.fail_create_at == Some(call) {
            return Err(HalError::Remote(format!("quota exceeded at task {call}")));
        }

        let id = TaskId::new(format!("arn:aws:braket:us-east-1:000:quantum-task/task-{call}"));
        self.created.lock().unwrap().push(CreatedTask {
            id: id.clone(),
            device_arn: device_arn.to_string(),
            program: program.clone(),
            destination: destination.clone(),
            shots,
        });
        self.set_state(&id, TaskState::Queued);
        Ok(id)
    }

    async fn task_state(&self, task: &TaskId) -> HalResult<TaskState> {
        if let Some(limit) = self.complete_after_polls {
            let mut polls = self.polls.lock().unwrap();
            let seen = polls.entry(task.clone()).or_insert(0);
            *seen += 1;
            return Ok(if *seen > limit {
                TaskState::Completed
            } else {
                TaskState::Running
            });
        }
        self.states
            .lock()
            .unwrap()
            .get(task)
            .copied()
            .ok_or_else(|| HalError::TaskNotFound(task.to_string()))
    }

    async fn task_result(&self, task: &TaskId) -> HalResult<TaskResult> {
        self.results
            .lock()
            .unwrap()
            .get(task)
            .cloned()
            .ok_or_else(|| HalError::TaskNotFound(task.to_string()))
    }

    async fn cancel_task(&self, task: &TaskId) -> HalResult<()> {
        self.cancelled.lock().unwrap().push(task.clone());
        if self.fail_cancel.contains(task) {
            return Err(HalError::Remote(format!("cannot cancel {task}")));
        }
        self.set_state(task, TaskState::Cancelled);
        Ok(())
    }
}

pub fn simulator_capabilities() -> Value {
    json!({
        "braketSchemaHeader": {
            "name": "braket.device_schema.simulators.gate_model_simulator_device_capabilities",
            "version": "1"
        },
        "service": {"shotsRange": [0, 100000], "updatedAt": "2024-01-01T00:00:00Z"},
        "action": {
            "braket.ir.jaqcd.program": {
                "supportedOperations": ["h", "x", "cnot", "rx", "ry", "rz", "swap", "unitary"]
            }
        },
        "paradigm": {"qubitCount": 34}
    })
}

pub fn annealer_capabilities() -> Value {
    json!({
        "service": {"shotsRange": [1, 10000]},
        "action": {"braket.ir.annealing.problem": {}},
        "paradigm": {"qubitCount": 5000}
    })
}

pub fn descriptor(arn: &str, name: &str, device_type: DeviceType, capabilities: Value) -> DeviceDescriptor {
    DeviceDescriptor {
        summary: DeviceSummary {
            arn: arn.to_string(),
            name: name.to_string(),
            provider_name: "Amazon Braket".to_string(),
            device_type,
            status: DeviceStatus::Online,
        },
        capabilities,
    }
}

pub fn sv1() -> BraketDevice {
    BraketDevice::try_from(descriptor(SV1_ARN, "SV1", DeviceType::Simulator, simulator_capabilities()))
        .unwrap()
}

pub fn sv1_capabilities() -> DeviceCapabilities {
    DeviceCapabilities::from_value(SV1_ARN, &simulator_capabilities()).unwrap()
}

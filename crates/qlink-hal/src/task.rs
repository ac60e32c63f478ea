//! Remote task handles, states and raw results.
//!
//! A task is the cloud service's unit of execution: one lowered circuit run
//! for a number of shots. Its state machine as seen by qlink:
//!
//! ```text
//!   CREATED ──→ QUEUED ──→ RUNNING ──→ COMPLETED
//!                  │           │
//!                  │           ├──→ FAILED
//!                  └───────────┴──→ CANCELLED
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Identifier of a remote task (the task ARN).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new task ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Observable state of a remote task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Task accepted but not yet queued.
    Created,
    /// Task waiting for the device.
    Queued,
    /// Task executing.
    Running,
    /// Task finished and its result is available.
    Completed,
    /// Task failed.
    Failed,
    /// Task was cancelled.
    Cancelled,
}

impl TaskState {
    /// Wire name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Created => "CREATED",
            TaskState::Queued => "QUEUED",
            TaskState::Running => "RUNNING",
            TaskState::Completed => "COMPLETED",
            TaskState::Failed => "FAILED",
            TaskState::Cancelled => "CANCELLED",
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled
        )
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw result document of a gate-model task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Measurement counts (bitstring -> count), qubit 0 leftmost.
    #[serde(default)]
    pub measurement_counts: Option<HashMap<String, u64>>,
    /// Measurement probabilities (bitstring -> probability).
    #[serde(default)]
    pub measurement_probabilities: Option<HashMap<String, f64>>,
    /// Per-shot measurements.
    #[serde(default)]
    pub measurements: Option<Vec<Vec<u8>>>,
    /// Qubits whose outcomes make up each bitstring, in string order.
    #[serde(default)]
    pub measured_qubits: Option<Vec<u32>>,
}

impl TaskResult {
    /// Bitstring counts, derived from whichever section the device returned.
    ///
    /// Preference order: `measurementCounts`, then `measurements`, then
    /// `measurementProbabilities` scaled by `shots`.
    pub fn counts(&self, task: &TaskId, shots: u32) -> HalResult<HashMap<String, u64>> {
        if let Some(counts) = &self.measurement_counts {
            return Ok(counts.clone());
        }

        if let Some(measurements) = &self.measurements {
            let mut counts = HashMap::new();
            for shot in measurements {
                let bitstring: String = shot
                    .iter()
                    .map(|b| if *b == 0 { '0' } else { '1' })
                    .collect();
                *counts.entry(bitstring).or_insert(0) += 1;
            }
            return Ok(counts);
        }

        if let Some(probabilities) = &self.measurement_probabilities {
            let total = f64::from(shots);
            return Ok(probabilities
                .iter()
                .filter_map(|(bits, p)| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let count = (p * total).max(0.0).round() as u64;
                    (count > 0).then(|| (bits.clone(), count))
                })
                .collect());
        }

        Err(HalError::InvalidTaskResult {
            task: task.to_string(),
            reason: "result carries no measurement data".into(),
        })
    }
}

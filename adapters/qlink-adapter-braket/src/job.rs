//! Jobs: one framework batch spread over one remote task per experiment.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use qlink_hal::{JobId, JobStatus, RemoteService, TaskId, TaskState};
use qlink_ir::{ExperimentResult, ExperimentResultData, QasmQobj, QobjResult};
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::error::{BraketError, BraketResult};
use crate::remap::{MeasurementMap, remap_counts};

/// Fold per-task states into one job status.
///
/// Rules apply in order and the first match wins:
/// all created, all queued, any running, all completed, any failed,
/// any cancelled. Anything else is still in progress.
pub fn aggregate_status(states: &[TaskState]) -> JobStatus {
    let all = |s: TaskState| !states.is_empty() && states.iter().all(|&t| t == s);
    let any = |s: TaskState| states.contains(&s);

    if all(TaskState::Created) {
        JobStatus::Initializing
    } else if all(TaskState::Queued) {
        JobStatus::Queued
    } else if any(TaskState::Running) {
        JobStatus::Running
    } else if all(TaskState::Completed) {
        JobStatus::Done
    } else if any(TaskState::Failed) {
        JobStatus::Error
    } else if any(TaskState::Cancelled) {
        JobStatus::Cancelled
    } else {
        JobStatus::InProgress
    }
}

/// Request cancellation of each task once, logging failures.
pub(crate) async fn cancel_tasks(service: &dyn RemoteService, job_id: &JobId, tasks: &[TaskId]) {
    for task in tasks {
        if let Err(e) = service.cancel_task(task).await {
            error!(job_id = %job_id, task = %task, error = %e, "Failed to cancel task");
        }
    }
}

/// Handle on a submitted batch.
///
/// Holds no cached state: every query goes to the remote service.
#[derive(Clone)]
pub struct BraketJob {
    job_id: JobId,
    qobj: QasmQobj,
    tasks: Vec<TaskId>,
    extra_data: Option<Map<String, Value>>,
    s3_bucket: String,
    backend_name: String,
    backend_version: String,
    created_at: DateTime<Utc>,
    service: Arc<dyn RemoteService>,
}

impl std::fmt::Debug for BraketJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraketJob")
            .field("job_id", &self.job_id)
            .field("tasks", &self.tasks)
            .field("s3_bucket", &self.s3_bucket)
            .field("backend_name", &self.backend_name)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl BraketJob {
    /// Assemble a job handle.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        job_id: JobId,
        qobj: QasmQobj,
        tasks: Vec<TaskId>,
        extra_data: Option<Map<String, Value>>,
        s3_bucket: impl Into<String>,
        backend_name: impl Into<String>,
        backend_version: impl Into<String>,
        service: Arc<dyn RemoteService>,
    ) -> Self {
        Self {
            job_id,
            qobj,
            tasks,
            extra_data,
            s3_bucket: s3_bucket.into(),
            backend_name: backend_name.into(),
            backend_version: backend_version.into(),
            created_at: Utc::now(),
            service,
        }
    }

    /// Job identifier.
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// The submitted batch.
    pub fn qobj(&self) -> &QasmQobj {
        &self.qobj
    }

    /// Task identifiers in experiment order.
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Metadata stored with the batch.
    pub fn extra_data(&self) -> Option<&Map<String, Value>> {
        self.extra_data.as_ref()
    }

    /// Bucket holding the job's records and task outputs.
    pub fn s3_bucket(&self) -> &str {
        &self.s3_bucket
    }

    /// Name of the device the job runs on.
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// When this handle was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current state of every task, in task order.
    pub async fn task_states(&self) -> BraketResult<Vec<TaskState>> {
        let mut states = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            states.push(self.service.task_state(task).await?);
        }
        Ok(states)
    }

    /// Current job status.
    pub async fn status(&self) -> BraketResult<JobStatus> {
        let states = self.task_states().await?;
        let status = aggregate_status(&states);
        debug!(job_id = %self.job_id, %status, "Job status");
        Ok(status)
    }

    /// Cancel every task.
    ///
    /// A failed cancellation is logged and the remaining tasks are still
    /// cancelled.
    pub async fn cancel(&self) {
        cancel_tasks(self.service.as_ref(), &self.job_id, &self.tasks).await;
    }

    /// Assemble the framework result.
    ///
    /// Counts are fetched only for tasks in `COMPLETED`. No result is
    /// requested for a task in any other state, including one that is
    /// still running: its experiment is reported with `success = false`,
    /// the task state as its status and empty counts. The call therefore
    /// succeeds on an unfinished job and returns the partial result.
    ///
    /// Fails if the task list and the experiments differ in length, or if
    /// a completed task's counts cannot be fetched or remapped.
    pub async fn result(&self) -> BraketResult<QobjResult> {
        if self.tasks.len() != self.qobj.experiments.len() {
            return Err(BraketError::InconsistentJob {
                job_id: self.job_id.to_string(),
                reason: format!(
                    "{} tasks for {} experiments",
                    self.tasks.len(),
                    self.qobj.experiments.len()
                ),
            });
        }

        let states = self.task_states().await?;
        let status = aggregate_status(&states);

        let mut results = Vec::with_capacity(self.tasks.len());
        for ((task, experiment), state) in self.tasks.iter().zip(&self.qobj.experiments).zip(states)
        {
            let shots = self.qobj.experiment_shots(experiment);
            let success = state == TaskState::Completed;

            let counts = if success {
                let raw = self.service.task_result(task).await?;
                let map = MeasurementMap::from_experiment(experiment)?;
                let raw_counts = raw.counts(task, shots)?;
                remap_counts(&raw_counts, &map, raw.measured_qubits.as_deref())?
            } else {
                warn!(job_id = %self.job_id, task = %task, %state, "Task has no result");
                Default::default()
            };

            results.push(ExperimentResult {
                shots,
                success,
                header: experiment.header.clone(),
                status: state.to_string(),
                data: ExperimentResultData { counts },
            });
        }

        Ok(QobjResult {
            backend_name: self.backend_name.clone(),
            backend_version: self.backend_version.clone(),
            qobj_id: self.qobj.qobj_id.clone(),
            job_id: self.job_id.to_string(),
            success: status == JobStatus::Done,
            status: status.to_string(),
            results,
        })
    }

    /// Poll until the job reaches a final status.
    pub async fn wait(&self, poll_interval: Duration, timeout: Duration) -> BraketResult<JobStatus> {
        let start = Instant::now();
        loop {
            let status = self.status().await?;
            if status.is_final() {
                return Ok(status);
            }
            if start.elapsed() >= timeout {
                return Err(BraketError::Timeout(format!(
                    "job {} still {status} after {timeout:?}",
                    self.job_id
                )));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlink_hal::TaskState::*;

    #[test]
    fn test_status_precedence() {
        assert_eq!(aggregate_status(&[Queued, Queued]), JobStatus::Queued);
        assert_eq!(aggregate_status(&[Running, Completed]), JobStatus::Running);
        assert_eq!(aggregate_status(&[Completed, Completed]), JobStatus::Done);
        assert_eq!(aggregate_status(&[Completed, Failed]), JobStatus::Error);
        assert_eq!(aggregate_status(&[Cancelled]), JobStatus::Cancelled);
        assert_eq!(aggregate_status(&[Completed, Queued]), JobStatus::InProgress);
    }

    #[test]
    fn test_status_initializing() {
        assert_eq!(aggregate_status(&[Created, Created]), JobStatus::Initializing);
        assert_eq!(aggregate_status(&[Created, Queued]), JobStatus::InProgress);
    }

    #[test]
    fn test_running_beats_failure() {
        assert_eq!(aggregate_status(&[Failed, Running]), JobStatus::Running);
        assert_eq!(aggregate_status(&[Failed, Cancelled]), JobStatus::Error);
    }

    #[test]
    fn test_empty_job_is_in_progress() {
        assert_eq!(aggregate_status(&[]), JobStatus::InProgress);
    }
}

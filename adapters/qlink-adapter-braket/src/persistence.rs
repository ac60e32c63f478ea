//! Job records in the blob store.
//!
//! A job leaves two records under `results-{device}-{job}/{job}/`:
//! `circuit_batch.json` with the submitted batch and its metadata, and
//! `task_arns.json` with the ordered task identifiers. Records are
//! write-once: writing over an existing record and reading or deleting a
//! missing one both fail.

use std::sync::Arc;

use qlink_hal::{BlobStore, JobId, S3Destination, TaskId};
use qlink_ir::QasmQobj;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{BraketError, BraketResult};

const TASK_IDS_FILE: &str = "task_arns.json";
const BATCH_FILE: &str = "circuit_batch.json";

/// Stored form of a submitted batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Batch identifier.
    pub qobj_id: String,
    /// The batch as submitted.
    pub qobj: QasmQobj,
    /// Caller metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<Map<String, Value>>,
}

/// Folder shared by a job's records and its task outputs.
pub fn job_data_root(device_name: &str, job_id: &JobId) -> String {
    format!("results-{device_name}-{job_id}")
}

/// Key of a job's task identifier list.
pub fn task_ids_key(device_name: &str, job_id: &JobId) -> String {
    format!("{}/{job_id}/{TASK_IDS_FILE}", job_data_root(device_name, job_id))
}

/// Key of a job's batch record.
pub fn batch_key(device_name: &str, job_id: &JobId) -> String {
    format!("{}/{job_id}/{BATCH_FILE}", job_data_root(device_name, job_id))
}

/// Job record access for one device.
#[derive(Clone)]
pub struct JobDataStore {
    store: Arc<dyn BlobStore>,
    device_name: String,
}

impl std::fmt::Debug for JobDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobDataStore")
            .field("device_name", &self.device_name)
            .finish_non_exhaustive()
    }
}

impl JobDataStore {
    /// Create a record store for `device_name`.
    pub fn new(store: Arc<dyn BlobStore>, device_name: impl Into<String>) -> Self {
        Self {
            store,
            device_name: device_name.into(),
        }
    }

    /// Where task outputs of a job go.
    pub fn destination(&self, bucket: &str, job_id: &JobId) -> S3Destination {
        S3Destination::new(bucket, job_data_root(&self.device_name, job_id))
    }

    async fn put_new(&self, bucket: &str, key: String, body: Vec<u8>) -> BraketResult<()> {
        if self.store.exists(bucket, &key).await? {
            return Err(BraketError::AlreadyExists {
                bucket: bucket.to_string(),
                key,
            });
        }
        debug!(bucket, key = %key, "Writing job record");
        self.store.put(bucket, &key, body).await?;
        Ok(())
    }

    async fn get_existing(&self, bucket: &str, key: String) -> BraketResult<Vec<u8>> {
        if !self.store.exists(bucket, &key).await? {
            return Err(BraketError::NotFound {
                bucket: bucket.to_string(),
                key,
            });
        }
        debug!(bucket, key = %key, "Reading job record");
        Ok(self.store.get(bucket, &key).await?)
    }

    async fn delete_existing(&self, bucket: &str, key: String) -> BraketResult<()> {
        if !self.store.exists(bucket, &key).await? {
            return Err(BraketError::NotFound {
                bucket: bucket.to_string(),
                key,
            });
        }
        debug!(bucket, key = %key, "Deleting job record");
        self.store.delete(bucket, &key).await?;
        Ok(())
    }

    /// Store a batch; the job identifier is the batch identifier.
    pub async fn save_batch(
        &self,
        bucket: &str,
        qobj: &QasmQobj,
        extra_data: Option<&Map<String, Value>>,
    ) -> BraketResult<S3Destination> {
        let job_id = JobId::new(qobj.qobj_id.clone());
        let record = JobRecord {
            qobj_id: qobj.qobj_id.clone(),
            qobj: qobj.clone(),
            extra_data: extra_data.filter(|m| !m.is_empty()).cloned(),
        };
        let body = serde_json::to_vec(&record)?;
        self.put_new(bucket, batch_key(&self.device_name, &job_id), body)
            .await?;
        Ok(self.destination(bucket, &job_id))
    }

    /// Load a stored batch.
    pub async fn load_batch(&self, bucket: &str, job_id: &JobId) -> BraketResult<JobRecord> {
        let body = self
            .get_existing(bucket, batch_key(&self.device_name, job_id))
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Delete a stored batch.
    pub async fn delete_batch(&self, bucket: &str, job_id: &JobId) -> BraketResult<()> {
        self.delete_existing(bucket, batch_key(&self.device_name, job_id))
            .await
    }

    /// Store the ordered task identifiers of a job.
    pub async fn save_task_ids(
        &self,
        bucket: &str,
        job_id: &JobId,
        tasks: &[TaskId],
    ) -> BraketResult<()> {
        let body = serde_json::to_vec(tasks)?;
        self.put_new(bucket, task_ids_key(&self.device_name, job_id), body)
            .await
    }

    /// Load the ordered task identifiers of a job.
    pub async fn load_task_ids(&self, bucket: &str, job_id: &JobId) -> BraketResult<Vec<TaskId>> {
        let body = self
            .get_existing(bucket, task_ids_key(&self.device_name, job_id))
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Delete the task identifiers of a job.
    pub async fn delete_task_ids(&self, bucket: &str, job_id: &JobId) -> BraketResult<()> {
        self.delete_existing(bucket, task_ids_key(&self.device_name, job_id))
            .await
    }
}

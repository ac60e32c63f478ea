//! AWS Braket backend: one device, batch submission and job retrieval.

use std::sync::Arc;

use qlink_hal::{BlobStore, JobId, RemoteService, TaskId};
use qlink_ir::{DeviceConfiguration, DeviceProperties, Program, QasmQobj};
use tracing::{debug, error, info};

use crate::api::{BraketClient, S3BlobStore, load_sdk_config, with_account_bucket};
use crate::capabilities::BraketDevice;
use crate::config::{BraketConfig, RunOptions};
use crate::conversions::{device_to_configuration, device_to_properties};
use crate::device::region_from_arn;
use crate::error::{BraketError, BraketResult};
use crate::job::{BraketJob, cancel_tasks};
use crate::persistence::JobDataStore;
use crate::transpile::lower_batch;

/// AWS Braket backend adapter.
///
/// Wraps one gate-model device. The backend configuration is translated
/// once at construction; calibration data is translated on request.
pub struct BraketBackend {
    device: BraketDevice,
    configuration: DeviceConfiguration,
    service: Arc<dyn RemoteService>,
    store: JobDataStore,
    config: BraketConfig,
}

impl std::fmt::Debug for BraketBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraketBackend")
            .field("name", &self.name())
            .field("arn", &self.arn())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BraketBackend {
    /// Create a backend from a device snapshot and its collaborators.
    pub fn new(
        device: BraketDevice,
        service: Arc<dyn RemoteService>,
        blobs: Arc<dyn BlobStore>,
        config: BraketConfig,
    ) -> Self {
        let configuration = device_to_configuration(&device);
        let store = JobDataStore::new(blobs, device.name());
        Self {
            device,
            configuration,
            service,
            store,
            config,
        }
    }

    /// Connect to a Braket device.
    ///
    /// Reads configuration from environment variables:
    /// - `QLINK_BRAKET_S3_BUCKET` (optional): default bucket for job data,
    ///   else the account's `amazon-braket-{account_id}` bucket
    /// - `AWS_REGION` (optional, default: `"us-east-1"`), overridden by the
    ///   region in `device_arn` when it carries one
    ///
    /// AWS credentials are loaded from the default chain (environment,
    /// SSO, config files, IAM role).
    pub async fn connect(device_arn: impl Into<String>) -> BraketResult<Self> {
        let device_arn = device_arn.into();
        let config = BraketConfig::from_env()?;

        // Devices answer only in their own region; simulators have none.
        let region = region_from_arn(&device_arn).unwrap_or(&config.region);
        let sdk_config = load_sdk_config(region).await;
        let config = with_account_bucket(config, &sdk_config).await;
        let service: Arc<dyn RemoteService> = Arc::new(BraketClient::from_sdk_config(&sdk_config));
        let blobs: Arc<dyn BlobStore> = Arc::new(S3BlobStore::from_sdk_config(&sdk_config));

        let device = BraketDevice::try_from(service.get_device(&device_arn).await?)?;
        info!(device = device.name(), arn = %device_arn, "Connected to Braket device");
        Ok(Self::new(device, service, blobs, config))
    }

    /// Device name.
    pub fn name(&self) -> &str {
        self.device.name()
    }

    /// Device ARN.
    pub fn arn(&self) -> &str {
        self.device.arn()
    }

    /// The wrapped device snapshot.
    pub fn device(&self) -> &BraketDevice {
        &self.device
    }

    /// Provider-wide settings.
    pub fn config(&self) -> &BraketConfig {
        &self.config
    }

    /// Backend configuration of the device.
    pub fn configuration(&self) -> &DeviceConfiguration {
        &self.configuration
    }

    /// Calibration snapshot of the device.
    pub fn properties(&self) -> DeviceProperties {
        device_to_properties(&self.device, &self.configuration)
    }

    /// Submit a batch: one task per experiment, in experiment order.
    ///
    /// Every experiment is lowered and the batch is stored before any task
    /// is created. If a task cannot be created, or the task list cannot be
    /// stored, the tasks created so far are cancelled and the original
    /// error is returned.
    pub async fn run(&self, mut qobj: QasmQobj, options: RunOptions) -> BraketResult<BraketJob> {
        let bucket = self.config.resolve_bucket(options.s3_bucket.as_deref())?;
        if qobj.qobj_id.is_empty() {
            qobj.qobj_id = uuid::Uuid::new_v4().to_string();
        }
        let job_id = JobId::new(qobj.qobj_id.clone());
        let extra_data = options.extra_data.filter(|m| !m.is_empty());

        let programs = lower_batch(&qobj).collect::<BraketResult<Vec<Program>>>()?;
        let destination = self
            .store
            .save_batch(&bucket, &qobj, extra_data.as_ref())
            .await?;

        let mut tasks: Vec<TaskId> = Vec::with_capacity(programs.len());
        for (index, (program, experiment)) in programs.iter().zip(&qobj.experiments).enumerate() {
            let shots = qobj.experiment_shots(experiment);
            match self
                .service
                .create_task(self.arn(), program, &destination, shots)
                .await
            {
                Ok(task) => {
                    debug!(job_id = %job_id, task = %task, index, shots, "Created task");
                    tasks.push(task);
                }
                Err(e) => {
                    error!(
                        job_id = %job_id,
                        index,
                        created = tasks.len(),
                        error = %e,
                        "Task creation failed, cancelling created tasks"
                    );
                    cancel_tasks(self.service.as_ref(), &job_id, &tasks).await;
                    return Err(e.into());
                }
            }
        }

        if let Err(e) = self.store.save_task_ids(&bucket, &job_id, &tasks).await {
            error!(job_id = %job_id, error = %e, "Failed to store task list, cancelling tasks");
            cancel_tasks(self.service.as_ref(), &job_id, &tasks).await;
            return Err(e);
        }

        info!(job_id = %job_id, device = self.name(), tasks = tasks.len(), "Submitted job");
        Ok(BraketJob::new(
            job_id,
            qobj,
            tasks,
            extra_data,
            bucket,
            self.configuration.backend_name.clone(),
            self.configuration.backend_version.clone(),
            Arc::clone(&self.service),
        ))
    }

    /// Rebuild a job handle from its stored records.
    pub async fn retrieve_job(&self, job_id: &JobId, options: RunOptions) -> BraketResult<BraketJob> {
        let bucket = self.config.resolve_bucket(options.s3_bucket.as_deref())?;
        let record = self.store.load_batch(&bucket, job_id).await?;
        let tasks = self.store.load_task_ids(&bucket, job_id).await?;

        if record.qobj_id != job_id.as_str() {
            return Err(BraketError::InconsistentJob {
                job_id: job_id.to_string(),
                reason: format!("stored batch has id {}", record.qobj_id),
            });
        }

        info!(job_id = %job_id, tasks = tasks.len(), "Retrieved job");
        Ok(BraketJob::new(
            job_id.clone(),
            record.qobj,
            tasks,
            record.extra_data,
            bucket,
            self.configuration.backend_name.clone(),
            self.configuration.backend_version.clone(),
            Arc::clone(&self.service),
        ))
    }

    /// Delete the stored records of a job. Task outputs are left alone.
    pub async fn delete_job_data(&self, job_id: &JobId, options: RunOptions) -> BraketResult<()> {
        let bucket = self.config.resolve_bucket(options.s3_bucket.as_deref())?;
        self.store.delete_task_ids(&bucket, job_id).await?;
        self.store.delete_batch(&bucket, job_id).await?;
        info!(job_id = %job_id, "Deleted job data");
        Ok(())
    }
}

//! Device discovery.

use std::sync::Arc;

use qlink_hal::{BlobStore, RemoteService};
use tracing::{debug, info};

use crate::api::{BraketClient, S3BlobStore, load_sdk_config, with_account_bucket};
use crate::backend::BraketBackend;
use crate::capabilities::BraketDevice;
use crate::config::BraketConfig;
use crate::device::arn_for_name;
use crate::error::{BraketError, BraketResult};

/// Entry point listing the Braket devices usable as backends.
pub struct BraketProvider {
    service: Arc<dyn RemoteService>,
    blobs: Arc<dyn BlobStore>,
    config: BraketConfig,
}

impl std::fmt::Debug for BraketProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraketProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BraketProvider {
    /// Create a provider over the given collaborators.
    pub fn new(
        service: Arc<dyn RemoteService>,
        blobs: Arc<dyn BlobStore>,
        config: BraketConfig,
    ) -> Self {
        Self {
            service,
            blobs,
            config,
        }
    }

    /// Create a provider backed by AWS, configured from the environment.
    ///
    /// Without `QLINK_BRAKET_S3_BUCKET` the account's
    /// `amazon-braket-{account_id}` bucket is used.
    pub async fn from_env() -> BraketResult<Self> {
        let config = BraketConfig::from_env()?;
        let sdk_config = load_sdk_config(&config.region).await;
        let config = with_account_bucket(config, &sdk_config).await;
        Ok(Self::new(
            Arc::new(BraketClient::from_sdk_config(&sdk_config)),
            Arc::new(S3BlobStore::from_sdk_config(&sdk_config)),
            config,
        ))
    }

    /// Provider-wide settings.
    pub fn config(&self) -> &BraketConfig {
        &self.config
    }

    fn backend(&self, device: BraketDevice) -> BraketBackend {
        BraketBackend::new(
            device,
            Arc::clone(&self.service),
            Arc::clone(&self.blobs),
            self.config.clone(),
        )
    }

    /// Backends for every gate-model device, optionally filtered by name.
    ///
    /// Annealing devices are skipped.
    pub async fn backends(&self, name: Option<&str>) -> BraketResult<Vec<BraketBackend>> {
        let summaries = self.service.search_devices(name).await?;
        let mut backends = Vec::with_capacity(summaries.len());

        for summary in summaries {
            let descriptor = self.service.get_device(&summary.arn).await?;
            let device = BraketDevice::try_from(descriptor)?;
            if device.capabilities.is_annealer() {
                debug!(device = device.name(), "Skipping annealing device");
                continue;
            }
            backends.push(self.backend(device));
        }

        info!(count = backends.len(), filter = ?name, "Listed Braket backends");
        Ok(backends)
    }

    /// Backend for one device.
    ///
    /// Well-known short names (`"sv1"`, `"aria-1"`, ...) resolve directly to
    /// their ARN; any other name is looked up through the device listing.
    pub async fn get_backend(&self, name: &str) -> BraketResult<BraketBackend> {
        if let Some(arn) = arn_for_name(name) {
            let device = BraketDevice::try_from(self.service.get_device(arn).await?)?;
            return Ok(self.backend(device));
        }

        self.backends(Some(name))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BraketError::DeviceNotFound(name.to_string()))
    }
}

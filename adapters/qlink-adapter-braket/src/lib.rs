//! qlink provider for AWS Braket
//!
//! This crate exposes Braket devices as framework backends. It translates
//! device capability documents into backend configuration and calibration
//! data, lowers framework batches into native Braket programs, spreads a
//! batch over one remote task per experiment, and maps task results back
//! into framework counts.
//!
//! # Device Families
//!
//! | Family | Calibration source | Connectivity |
//! |--------|--------------------|--------------|
//! | Trapped ion (IonQ) | device-wide fidelity and timing | full |
//! | Fixed coupling (Rigetti, IQM) | per-qubit and per-pair specs | graph |
//! | Simulator (SV1, TN1, DM1) | none | full |
//!
//! # Authentication
//!
//! AWS credentials are loaded from the standard AWS credential chain:
//! environment variables, shared config, SSO, or IAM role.
//!
//! Optional environment variables:
//! - `QLINK_BRAKET_S3_BUCKET`: bucket for job records and task results,
//!   defaulting to the account's `amazon-braket-{account_id}` bucket
//! - `AWS_REGION`: AWS region (default: `"us-east-1"`)
//! - `QLINK_BRAKET_POLL_INTERVAL_MS`: `wait` poll interval (default: 500)
//! - `QLINK_BRAKET_WAIT_TIMEOUT_SECS`: `wait` deadline (default: 300)
//!
//! # Example
//!
//! ```ignore
//! use qlink_adapter_braket::{BraketProvider, RunOptions};
//! use qlink_ir::{Experiment, Instruction, QasmQobj};
//!
//! #[tokio::main]
//! async fn main() -> qlink_adapter_braket::BraketResult<()> {
//!     let provider = BraketProvider::from_env().await?;
//!     let backend = provider.get_backend("sv1").await?;
//!
//!     let bell = Experiment::new(
//!         "bell",
//!         vec![
//!             Instruction::gate("h", [0]),
//!             Instruction::gate("cx", [0, 1]),
//!             Instruction::measure([0, 1], [0, 1]),
//!         ],
//!     );
//!     let job = backend
//!         .run(QasmQobj::new("", 1000, vec![bell]), RunOptions::new())
//!         .await?;
//!
//!     let config = provider.config();
//!     job.wait(config.poll_interval, config.wait_timeout).await?;
//!     println!("{:?}", job.result().await?.counts(0));
//!     Ok(())
//! }
//! ```

pub mod api;
mod backend;
pub mod capabilities;
pub mod config;
pub mod conversions;
pub mod device;
mod error;
mod job;
pub mod persistence;
mod provider;
pub mod remap;
pub mod transpile;
pub mod units;

pub use api::{BraketClient, S3BlobStore};
pub use backend::BraketBackend;
pub use capabilities::{BraketDevice, DeviceCapabilities, DeviceFamily};
pub use config::{BraketConfig, RunOptions};
pub use conversions::{device_to_configuration, device_to_properties};
pub use error::{BraketError, BraketResult};
pub use job::{BraketJob, aggregate_status};
pub use provider::BraketProvider;
pub use remap::{MeasurementMap, remap_counts};
pub use transpile::{lower_batch, lower_experiment};

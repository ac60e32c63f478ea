//! Error types for the Braket provider.

use qlink_hal::HalError;
use qlink_ir::IrError;
use thiserror::Error;

/// Result type for Braket operations.
pub type BraketResult<T> = Result<T, BraketError>;

/// Errors that can occur when translating to and from AWS Braket.
#[derive(Debug, Error)]
pub enum BraketError {
    /// Missing S3 bucket configuration.
    #[error("S3 bucket not configured. Set QLINK_BRAKET_S3_BUCKET or pass a bucket per call.")]
    MissingS3Bucket,

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Instruction has no lowering to the native gate set.
    #[error("Gate '{0}' has no native lowering")]
    UnsupportedGate(String),

    /// Instruction is malformed (arity, measure shape).
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(#[from] IrError),

    /// Capability document could not be read.
    #[error("Invalid capabilities for {device}: {reason}")]
    InvalidCapabilities {
        /// Device ARN.
        device: String,
        /// What was wrong.
        reason: String,
    },

    /// Record already stored.
    #[error("An object '{key}' already exists in the bucket {bucket}")]
    AlreadyExists {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
    },

    /// Record missing.
    #[error("An object '{key}' does not exist in the bucket {bucket}")]
    NotFound {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
    },

    /// Two measurements write the same classical bit.
    #[error("Classical bit {clbit} is written by qubits {first} and {second}")]
    NonInjectiveMeasurement {
        /// The classical bit.
        clbit: u32,
        /// First qubit measured into it.
        first: u32,
        /// Second qubit measured into it.
        second: u32,
    },

    /// A measured qubit has no position in the raw bitstring.
    #[error("Qubit {qubit} is not part of the {width}-bit raw result")]
    QubitOutOfRange {
        /// The measured qubit.
        qubit: u32,
        /// Width of the raw bitstrings.
        width: usize,
    },

    /// Raw bitstrings of one result differ in length.
    #[error("Raw bitstring '{bitstring}' has length {got}, expected {expected}")]
    BitstringLength {
        /// Offending bitstring.
        bitstring: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Job records do not line up (task list vs. experiments).
    #[error("Job {job_id} is inconsistent: {reason}")]
    InconsistentJob {
        /// Job identifier.
        job_id: String,
        /// What was wrong.
        reason: String,
    },

    /// Device not found.
    #[error("No device matches '{0}'")]
    DeviceNotFound(String),

    /// Braket API error.
    #[error("Braket API error: {0}")]
    BraketApi(String),

    /// S3 error.
    #[error("S3 error: {0}")]
    S3Error(String),

    /// STS error.
    #[error("STS error: {0}")]
    StsError(String),

    /// Remote service or store error reported through the HAL seams.
    #[error(transparent)]
    Remote(#[from] HalError),

    /// Timeout waiting for a job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<BraketError> for HalError {
    fn from(e: BraketError) -> Self {
        match e {
            BraketError::Remote(inner) => inner,
            BraketError::DeviceNotFound(name) => HalError::DeviceNotFound(name),
            BraketError::NotFound { bucket, key } => HalError::ObjectNotFound { bucket, key },
            BraketError::Timeout(id) => HalError::Timeout(format!("job {id}")),
            BraketError::JsonError(err) => HalError::Serialization(err),
            BraketError::S3Error(msg) => HalError::Storage(msg),
            BraketError::BraketApi(msg) => HalError::Remote(msg),
            other => HalError::Remote(other.to_string()),
        }
    }
}

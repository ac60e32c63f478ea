//! Error types for the HAL crate.

use thiserror::Error;

/// Errors reported by the remote service and blob store seams.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The remote service rejected or failed a request.
    #[error("Remote service error: {0}")]
    Remote(String),

    /// Device not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Task result is not available or malformed.
    #[error("Invalid task result for {task}: {reason}")]
    InvalidTaskResult {
        /// Task identifier.
        task: String,
        /// What was wrong.
        reason: String,
    },

    /// Object not found in the blob store.
    #[error("Object '{key}' not found in bucket {bucket}")]
    ObjectNotFound {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
    },

    /// Blob store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout waiting for a task or job.
    #[error("Timeout waiting for {0}")]
    Timeout(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

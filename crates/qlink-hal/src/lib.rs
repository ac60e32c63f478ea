//! qlink hardware abstraction layer
//!
//! The seams between qlink's translation logic and the outside world:
//!
//! - [`RemoteService`]: device discovery and the remote task lifecycle
//! - [`BlobStore`]: bucket/key storage for job records
//! - [`TaskState`] and [`JobStatus`]: the two status vocabularies qlink
//!   translates between
//!
//! Both seams are async traits so AWS-backed and in-memory implementations
//! are interchangeable.
//!
//! # Example: Using the in-memory store
//!
//! ```rust
//! use qlink_hal::{BlobStore, MemoryBlobStore};
//!
//! # async fn demo() -> qlink_hal::HalResult<()> {
//! let store = MemoryBlobStore::new();
//! store.put("bucket", "key", b"{}".to_vec()).await?;
//! assert!(store.exists("bucket", "key").await?);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod job;
pub mod service;
pub mod storage;
pub mod task;

pub use error::{HalError, HalResult};
pub use job::{JobId, JobStatus};
pub use service::{
    DeviceDescriptor, DeviceStatus, DeviceSummary, DeviceType, RemoteService, S3Destination,
};
pub use storage::{BlobStore, MemoryBlobStore};
pub use task::{TaskId, TaskResult, TaskState};

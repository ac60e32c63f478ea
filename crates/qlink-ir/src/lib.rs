//! qlink shared data models
//!
//! This crate holds the fixed schemas qlink translates between. None of
//! them carry behavior beyond construction, lookup and (de)serialization.
//!
//! # Core Components
//!
//! - **Framework batches**: [`QasmQobj`], [`Experiment`], [`Instruction`]
//! - **Gate vocabulary**: [`StandardGate`] names the gates the framework
//!   recognizes
//! - **Cloud programs**: [`Program`], [`JaqcdInstruction`], [`NativeGate`],
//!   [`ResultType`] in the `braket.ir.jaqcd.program` format
//! - **Backend models**: [`DeviceConfiguration`], [`DeviceProperties`],
//!   [`Nduv`]
//! - **Results**: [`QobjResult`], [`ExperimentResult`], [`Counts`]
//!
//! # Example: Building a Bell batch
//!
//! ```rust
//! use qlink_ir::{Experiment, Instruction, QasmQobj};
//!
//! let bell = Experiment::new(
//!     "bell",
//!     vec![
//!         Instruction::gate("h", [0]),
//!         Instruction::gate("cx", [0, 1]),
//!         Instruction::measure([0, 1], [0, 1]),
//!     ],
//! );
//! let qobj = QasmQobj::new("bell-batch", 1000, vec![bell]);
//!
//! assert_eq!(qobj.shots(), 1000);
//! assert_eq!(
//!     qobj.experiments[0].measurement_pairs().unwrap(),
//!     vec![(0, 0), (1, 1)]
//! );
//! ```

pub mod backend;
pub mod error;
pub mod gate;
pub mod jaqcd;
pub mod qobj;
pub mod result;

pub use backend::{DeviceConfiguration, DeviceProperties, GateConfig, GateProperties, Nduv};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use jaqcd::{JaqcdInstruction, NativeGate, OperandLayout, Program, ResultType};
pub use qobj::{Experiment, ExperimentConfig, Instruction, QasmQobj, QobjConfig};
pub use result::{Counts, ExperimentResult, ExperimentResultData, QobjResult};

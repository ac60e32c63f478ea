//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while reading or validating the shared models.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate name is not part of the framework's vocabulary.
    #[error("Gate '{0}' not known")]
    UnknownGate(String),

    /// Instruction has the wrong number of qubits or parameters.
    #[error("Instruction '{name}' expects {expected} {what}, got {got}")]
    ArityMismatch {
        /// Name of the instruction.
        name: String,
        /// What was counted ("qubits" or "parameters").
        what: &'static str,
        /// Expected count.
        expected: usize,
        /// Actual count.
        got: usize,
    },

    /// A measure instruction's qubit and memory lists differ in length.
    #[error("Measure instruction maps {qubits} qubits onto {memory} memory slots")]
    MeasureShape {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of memory slots.
        memory: usize,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

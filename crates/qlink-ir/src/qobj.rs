//! QASM QObj: the framework's serialized circuit batch.
//!
//! A [`QasmQobj`] bundles one or more [`Experiment`]s that share a run
//! configuration. Each experiment is a flat list of [`Instruction`]s; gate
//! names are plain strings (see [`StandardGate`](crate::StandardGate)) and
//! `measure` instructions carry the classical memory slots their qubits are
//! written into.
//!
//! Fields this crate does not interpret are preserved verbatim in `extra`
//! maps so a batch survives a store/load roundtrip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{IrError, IrResult};

/// Name of the measurement instruction.
pub const MEASURE: &str = "measure";

/// Name of the barrier instruction.
pub const BARRIER: &str = "barrier";

/// A batch of experiments submitted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QasmQobj {
    /// Batch identifier, also used as the job identifier.
    pub qobj_id: String,
    /// Shared run configuration.
    pub config: QobjConfig,
    /// Experiments in submission order.
    pub experiments: Vec<Experiment>,
    /// Free-form batch header.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub header: Map<String, Value>,
    /// Schema type tag, `"QASM"` for gate-model batches.
    #[serde(rename = "type", default = "default_qobj_type")]
    pub kind: String,
    /// Schema version of the batch.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

fn default_qobj_type() -> String {
    "QASM".to_string()
}

fn default_schema_version() -> String {
    "1.3.0".to_string()
}

impl QasmQobj {
    /// Create a batch with the given identifier, shot count and experiments.
    pub fn new(qobj_id: impl Into<String>, shots: u32, experiments: Vec<Experiment>) -> Self {
        Self {
            qobj_id: qobj_id.into(),
            config: QobjConfig::with_shots(shots),
            experiments,
            header: Map::new(),
            kind: default_qobj_type(),
            schema_version: default_schema_version(),
        }
    }

    /// Shot count requested for the whole batch.
    pub fn shots(&self) -> u32 {
        self.config.shots
    }

    /// Shot count for one experiment, honoring a per-experiment override.
    pub fn experiment_shots(&self, experiment: &Experiment) -> u32 {
        experiment
            .config
            .as_ref()
            .and_then(|c| c.shots)
            .unwrap_or(self.config.shots)
    }

    /// Parse a batch from its JSON form.
    pub fn from_json(value: Value) -> IrResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize the batch to its JSON form.
    pub fn to_json(&self) -> IrResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Run configuration shared by all experiments of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QobjConfig {
    /// Number of repetitions of each experiment.
    pub shots: u32,
    /// Number of classical memory slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_slots: Option<u32>,
    /// Number of qubits used by the batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_qubits: Option<u32>,
    /// Remaining configuration entries.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QobjConfig {
    /// Configuration with only a shot count.
    pub fn with_shots(shots: u32) -> Self {
        Self {
            shots,
            memory_slots: None,
            n_qubits: None,
            extra: Map::new(),
        }
    }
}

/// One circuit of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment header (name, register layout, ...), echoed into results.
    #[serde(default)]
    pub header: Map<String, Value>,
    /// Per-experiment configuration overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ExperimentConfig>,
    /// Ordered instruction list.
    pub instructions: Vec<Instruction>,
}

impl Experiment {
    /// Create an experiment with a name and instructions.
    pub fn new(name: impl Into<String>, instructions: Vec<Instruction>) -> Self {
        let mut header = Map::new();
        header.insert("name".into(), Value::String(name.into()));
        Self {
            header,
            config: None,
            instructions,
        }
    }

    /// Experiment name from the header, if present.
    pub fn name(&self) -> Option<&str> {
        self.header.get("name").and_then(Value::as_str)
    }

    /// Iterate over the measure instructions in program order.
    pub fn measurements(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().filter(|i| i.is_measure())
    }

    /// All `(qubit, memory slot)` pairs written by measure instructions,
    /// in program order.
    pub fn measurement_pairs(&self) -> IrResult<Vec<(u32, u32)>> {
        let mut pairs = Vec::new();
        for inst in self.measurements() {
            if inst.qubits.len() != inst.memory.len() {
                return Err(IrError::MeasureShape {
                    qubits: inst.qubits.len(),
                    memory: inst.memory.len(),
                });
            }
            pairs.extend(inst.qubits.iter().copied().zip(inst.memory.iter().copied()));
        }
        Ok(pairs)
    }
}

/// Per-experiment configuration overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Shot count override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
    /// Remaining configuration entries.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single QObj instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Operation name (`"h"`, `"cx"`, `"measure"`, ...).
    pub name: String,
    /// Target qubits, in operand order.
    #[serde(default)]
    pub qubits: Vec<u32>,
    /// Numeric gate parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Memory slots written by a `measure`, aligned with `qubits`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memory: Vec<u32>,
    /// Remaining instruction fields (registers, conditionals, labels).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(name: impl Into<String>, qubits: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            qubits: qubits.into_iter().collect(),
            params: Vec::new(),
            memory: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Create a parameterized gate instruction.
    pub fn parameterized(
        name: impl Into<String>,
        qubits: impl IntoIterator<Item = u32>,
        params: impl IntoIterator<Item = f64>,
    ) -> Self {
        let mut inst = Self::gate(name, qubits);
        inst.params = params.into_iter().collect();
        inst
    }

    /// Create a measure instruction writing `qubits[i]` into `memory[i]`.
    pub fn measure(
        qubits: impl IntoIterator<Item = u32>,
        memory: impl IntoIterator<Item = u32>,
    ) -> Self {
        let mut inst = Self::gate(MEASURE, qubits);
        inst.memory = memory.into_iter().collect();
        inst
    }

    /// Check if this is a measurement.
    #[inline]
    pub fn is_measure(&self) -> bool {
        self.name == MEASURE
    }

    /// Check if this is a barrier.
    #[inline]
    pub fn is_barrier(&self) -> bool {
        self.name == BARRIER
    }

    /// Verify the operand and parameter counts.
    pub fn check_arity(&self, qubits: usize, params: usize) -> IrResult<()> {
        if self.qubits.len() != qubits {
            return Err(IrError::ArityMismatch {
                name: self.name.clone(),
                what: "qubits",
                expected: qubits,
                got: self.qubits.len(),
            });
        }
        if self.params.len() != params {
            return Err(IrError::ArityMismatch {
                name: self.name.clone(),
                what: "parameters",
                expected: params,
                got: self.params.len(),
            });
        }
        Ok(())
    }
}

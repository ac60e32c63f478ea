//! JAQCD programs: the gate-model task format accepted by the cloud service.
//!
//! A [`Program`] is an ordered list of native [`JaqcdInstruction`]s plus the
//! [`ResultType`]s requested from the device. Serialization follows the
//! `braket.ir.jaqcd.program` schema, where the operand field names depend on
//! the gate (`target`, `control`/`target`, `targets`, `controls`/`target`).

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Schema header name for JAQCD programs.
pub const JAQCD_SCHEMA_NAME: &str = "braket.ir.jaqcd.program";

/// Schema header version for JAQCD programs.
pub const JAQCD_SCHEMA_VERSION: &str = "1";

/// Native gates of the JAQCD instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeGate {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// S gate.
    S,
    /// S-dagger.
    Si,
    /// T gate.
    T,
    /// T-dagger.
    Ti,
    /// sqrt(X).
    V,
    /// sqrt(X)-dagger.
    Vi,
    /// X rotation.
    Rx,
    /// Y rotation.
    Ry,
    /// Z rotation.
    Rz,
    /// Phase shift diag(1, e^{iθ}).
    PhaseShift,
    /// Controlled NOT.
    CNot,
    /// Controlled Y.
    CY,
    /// Controlled Z.
    CZ,
    /// Controlled phase shift.
    CPhaseShift,
    /// SWAP.
    Swap,
    /// iSWAP.
    ISwap,
    /// Ising XX coupling.
    XX,
    /// Ising YY coupling.
    YY,
    /// Ising ZZ coupling.
    ZZ,
    /// Toffoli.
    CCNot,
    /// Controlled SWAP.
    CSwap,
}

/// How a native gate names its operands on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandLayout {
    /// `{"target": q}`
    Target,
    /// `{"control": c, "target": t}`
    ControlTarget,
    /// `{"targets": [a, b]}`
    Targets,
    /// `{"controls": [c0, c1], "target": t}`
    ControlsTarget,
    /// `{"control": c, "targets": [a, b]}`
    ControlTargets,
}

impl NativeGate {
    /// Wire name of the gate (`"type"` field).
    pub fn name(self) -> &'static str {
        match self {
            NativeGate::I => "i",
            NativeGate::X => "x",
            NativeGate::Y => "y",
            NativeGate::Z => "z",
            NativeGate::H => "h",
            NativeGate::S => "s",
            NativeGate::Si => "si",
            NativeGate::T => "t",
            NativeGate::Ti => "ti",
            NativeGate::V => "v",
            NativeGate::Vi => "vi",
            NativeGate::Rx => "rx",
            NativeGate::Ry => "ry",
            NativeGate::Rz => "rz",
            NativeGate::PhaseShift => "phaseshift",
            NativeGate::CNot => "cnot",
            NativeGate::CY => "cy",
            NativeGate::CZ => "cz",
            NativeGate::CPhaseShift => "cphaseshift",
            NativeGate::Swap => "swap",
            NativeGate::ISwap => "iswap",
            NativeGate::XX => "xx",
            NativeGate::YY => "yy",
            NativeGate::ZZ => "zz",
            NativeGate::CCNot => "ccnot",
            NativeGate::CSwap => "cswap",
        }
    }

    /// Operand naming used on the wire.
    pub fn layout(self) -> OperandLayout {
        match self {
            NativeGate::CNot | NativeGate::CY | NativeGate::CZ | NativeGate::CPhaseShift => {
                OperandLayout::ControlTarget
            }
            NativeGate::Swap | NativeGate::ISwap | NativeGate::XX | NativeGate::YY | NativeGate::ZZ => {
                OperandLayout::Targets
            }
            NativeGate::CCNot => OperandLayout::ControlsTarget,
            NativeGate::CSwap => OperandLayout::ControlTargets,
            _ => OperandLayout::Target,
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(self) -> usize {
        match self.layout() {
            OperandLayout::Target => 1,
            OperandLayout::ControlTarget | OperandLayout::Targets => 2,
            OperandLayout::ControlsTarget | OperandLayout::ControlTargets => 3,
        }
    }

    /// Whether the gate carries an `angle` field.
    pub fn takes_angle(self) -> bool {
        matches!(
            self,
            NativeGate::Rx
                | NativeGate::Ry
                | NativeGate::Rz
                | NativeGate::PhaseShift
                | NativeGate::CPhaseShift
                | NativeGate::XX
                | NativeGate::YY
                | NativeGate::ZZ
        )
    }
}

impl std::fmt::Display for NativeGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A native gate applied to concrete qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct JaqcdInstruction {
    /// The native gate.
    pub gate: NativeGate,
    /// Operand qubits in gate order (controls first).
    pub qubits: Vec<u32>,
    /// Rotation angle for parameterized gates.
    pub angle: Option<f64>,
}

impl JaqcdInstruction {
    /// Create an instruction.
    pub fn new(gate: NativeGate, qubits: Vec<u32>, angle: Option<f64>) -> Self {
        Self {
            gate,
            qubits,
            angle,
        }
    }
}

impl Serialize for JaqcdInstruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.gate.name())?;
        match (self.gate.layout(), self.qubits.as_slice()) {
            (OperandLayout::Target, [t]) => map.serialize_entry("target", t)?,
            (OperandLayout::ControlTarget, [c, t]) => {
                map.serialize_entry("control", c)?;
                map.serialize_entry("target", t)?;
            }
            (OperandLayout::Targets, [a, b]) => map.serialize_entry("targets", &[a, b])?,
            (OperandLayout::ControlsTarget, [c0, c1, t]) => {
                map.serialize_entry("controls", &[c0, c1])?;
                map.serialize_entry("target", t)?;
            }
            (OperandLayout::ControlTargets, [c, a, b]) => {
                map.serialize_entry("control", c)?;
                map.serialize_entry("targets", &[a, b])?;
            }
            (_, qubits) => {
                return Err(serde::ser::Error::custom(format!(
                    "{} expects {} qubits, got {}",
                    self.gate,
                    self.gate.num_qubits(),
                    qubits.len()
                )));
            }
        }
        if let Some(angle) = self.angle {
            map.serialize_entry("angle", &angle)?;
        }
        map.end()
    }
}

/// Result requested from the device alongside the gate stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResultType {
    /// Probability distribution over the computational basis of `targets`.
    Probability {
        /// Qubits the distribution is taken over.
        targets: Vec<u32>,
    },
}

impl ResultType {
    /// Qubits this result type reads.
    pub fn targets(&self) -> &[u32] {
        match self {
            ResultType::Probability { targets } => targets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SchemaHeader {
    name: &'static str,
    version: &'static str,
}

/// A lowered circuit ready for task submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    #[serde(rename = "braketSchemaHeader")]
    header: SchemaHeader,
    instructions: Vec<JaqcdInstruction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    results: Vec<ResultType>,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self {
            header: SchemaHeader {
                name: JAQCD_SCHEMA_NAME,
                version: JAQCD_SCHEMA_VERSION,
            },
            instructions: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Append a native instruction.
    pub fn push(&mut self, instruction: JaqcdInstruction) {
        self.instructions.push(instruction);
    }

    /// Append a requested result type.
    pub fn push_result(&mut self, result: ResultType) {
        self.results.push(result);
    }

    /// Native instructions in execution order.
    pub fn instructions(&self) -> &[JaqcdInstruction] {
        &self.instructions
    }

    /// Requested result types.
    pub fn result_types(&self) -> &[ResultType] {
        &self.results
    }

    /// Number of qubits addressed (highest index + 1).
    pub fn qubit_count(&self) -> usize {
        self.instructions
            .iter()
            .flat_map(|i| i.qubits.iter())
            .chain(self.results.iter().flat_map(|r| r.targets().iter()))
            .max()
            .map_or(0, |&q| q as usize + 1)
    }

    /// Serialize to the JSON action document.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

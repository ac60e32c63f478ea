//! Backend configuration and calibration models of the framework.
//!
//! [`DeviceConfiguration`] is what the framework's transpiler consumes as
//! target constraints: qubit count, basis gates and coupling maps.
//! [`DeviceProperties`] carries calibration data as lists of [`Nduv`]
//! (name, date, unit, value) records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration of one gate on a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Framework gate name.
    pub name: String,
    /// Parameter names, in positional order.
    pub parameters: Vec<String>,
    /// Qubit tuples the gate can be applied to.
    pub coupling_map: Vec<Vec<u32>>,
}

/// Static configuration of a backend, derived from a device snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfiguration {
    /// Device name.
    pub backend_name: String,
    /// Device version (the device ARN).
    pub backend_version: String,
    /// Number of qubits.
    pub n_qubits: u32,
    /// Basis gate names understood by the framework.
    pub basis_gates: Vec<String>,
    /// Per-gate configuration; every entry has a non-empty coupling map.
    pub gates: Vec<GateConfig>,
    /// Directed qubit pairs that can interact.
    pub coupling_map: Vec<[u32; 2]>,
    /// Whether the device is a simulator.
    pub simulator: bool,
    /// Whether the backend runs locally.
    pub local: bool,
    /// Whether classically conditioned gates are supported.
    pub conditional: bool,
    /// Whether pulse-level programs are supported.
    pub open_pulse: bool,
    /// Whether per-shot memory is returned.
    pub memory: bool,
    /// Maximum shots per task.
    pub max_shots: u64,
    /// Maximum experiments per batch, `None` when unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_experiments: Option<u32>,
    /// Device qubit label → canonical index.
    pub device_to_canonical: BTreeMap<String, u32>,
    /// Canonical index → device qubit label.
    pub canonical_to_device: BTreeMap<u32, String>,
}

impl DeviceConfiguration {
    /// Look up a gate configuration by name.
    pub fn gate(&self, name: &str) -> Option<&GateConfig> {
        self.gates.iter().find(|g| g.name == name)
    }

    /// Device label of a canonical qubit index.
    pub fn device_label(&self, canonical: u32) -> Option<&str> {
        self.canonical_to_device.get(&canonical).map(String::as_str)
    }

    /// Canonical index of a device qubit label.
    pub fn canonical_index(&self, label: &str) -> Option<u32> {
        self.device_to_canonical.get(label).copied()
    }
}

/// A named, dated, unit-bearing calibration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nduv {
    /// Calibration timestamp.
    pub date: DateTime<Utc>,
    /// Metric name (`"T1"`, `"gate_error"`, ...).
    pub name: String,
    /// Unit of `value` (`"ms"` for times, `""` for ratios).
    pub unit: String,
    /// Measured value; `None` when the device did not report it.
    pub value: Option<f64>,
}

impl Nduv {
    /// Create a record.
    pub fn new(
        date: DateTime<Utc>,
        name: impl Into<String>,
        unit: impl Into<String>,
        value: Option<f64>,
    ) -> Self {
        Self {
            date,
            name: name.into(),
            unit: unit.into(),
            value,
        }
    }
}

/// Calibration of one gate on one qubit tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateProperties {
    /// Framework gate name.
    pub gate: String,
    /// Canonical qubits the gate acts on.
    pub qubits: Vec<u32>,
    /// `gate_error` and `gate_length` records.
    pub parameters: Vec<Nduv>,
}

impl GateProperties {
    /// Find a parameter record by name.
    pub fn parameter(&self, name: &str) -> Option<&Nduv> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Calibration snapshot of a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProperties {
    /// Device name.
    pub backend_name: String,
    /// Device version.
    pub backend_version: String,
    /// When the calibration was taken.
    pub last_update_date: DateTime<Utc>,
    /// Per canonical qubit records (T1, T2, readout error).
    pub qubits: Vec<Vec<Nduv>>,
    /// Per gate and qubit tuple records.
    pub gates: Vec<GateProperties>,
    /// Device-wide records (SPAM fidelity, readout and reset times).
    pub general: Vec<Nduv>,
}

impl DeviceProperties {
    /// Properties without any calibration data.
    pub fn empty(
        backend_name: impl Into<String>,
        backend_version: impl Into<String>,
        last_update_date: DateTime<Utc>,
    ) -> Self {
        Self {
            backend_name: backend_name.into(),
            backend_version: backend_version.into(),
            last_update_date,
            qubits: Vec::new(),
            gates: Vec::new(),
            general: Vec::new(),
        }
    }

    /// Find a per-qubit record.
    pub fn qubit_property(&self, qubit: u32, name: &str) -> Option<&Nduv> {
        self.qubits
            .get(qubit as usize)
            .and_then(|records| records.iter().find(|r| r.name == name))
    }

    /// Find the calibration of a gate on specific qubits.
    pub fn gate_property(&self, gate: &str, qubits: &[u32]) -> Option<&GateProperties> {
        self.gates
            .iter()
            .find(|g| g.gate == gate && g.qubits == qubits)
    }

    /// Find a device-wide record.
    pub fn general_property(&self, name: &str) -> Option<&Nduv> {
        self.general.iter().find(|r| r.name == name)
    }
}

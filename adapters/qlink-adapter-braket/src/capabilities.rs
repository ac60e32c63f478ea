//! Braket device capability documents.
//!
//! The service publishes one JSON document per device. Only the sections
//! qlink reads are modeled; unknown fields are ignored. The calibration
//! section (`provider`) differs per device family:
//!
//! - trapped-ion devices report `fidelity` and `timing` tables that apply
//!   to every qubit
//! - fixed-coupling devices report per-qubit and per-pair `specs`
//! - simulators report no calibration at all

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use qlink_hal::{DeviceDescriptor, DeviceSummary, DeviceType};
use serde::Deserialize;

use crate::error::{BraketError, BraketResult};

/// Action key of gate-model programs.
pub const JAQCD_ACTION: &str = "braket.ir.jaqcd.program";

/// Action key of annealing problems.
pub const ANNEALING_ACTION: &str = "braket.ir.annealing.problem";

/// Device family, selected by the calibration data a device publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// Trapped-ion QPU with all-to-all connectivity.
    IonTrap,
    /// Superconducting QPU with a fixed coupling graph.
    FixedCoupling,
    /// Managed simulator.
    Simulator,
    /// Anything else.
    Unknown,
}

/// The capability document of a device.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapabilities {
    /// Schema header identifying the document type.
    #[serde(default)]
    pub braket_schema_header: Option<SchemaHeader>,
    /// Service limits.
    #[serde(default)]
    pub service: ServiceProperties,
    /// Supported actions keyed by action type.
    #[serde(default)]
    pub action: BTreeMap<String, ActionProperties>,
    /// Paradigm section (qubit count, connectivity).
    #[serde(default)]
    pub paradigm: Option<ParadigmProperties>,
    /// Vendor calibration section.
    #[serde(default)]
    pub provider: Option<ProviderProperties>,
}

/// Schema header of a capability document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaHeader {
    /// Schema name, e.g. `braket.device_schema.ionq.ionq_device_capabilities`.
    pub name: String,
    /// Schema version.
    #[serde(default)]
    pub version: String,
}

/// Service section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProperties {
    /// Inclusive `[min, max]` shot range.
    #[serde(default)]
    pub shots_range: Option<[u64; 2]>,
    /// Timestamp of the last calibration or document update.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ServiceProperties {
    /// Parsed `updatedAt`; naive timestamps are taken as UTC.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.updated_at.as_deref()?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// One supported action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProperties {
    /// Vendor gate names accepted in programs.
    #[serde(default)]
    pub supported_operations: Vec<String>,
}

/// Paradigm section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParadigmProperties {
    /// Number of qubits.
    #[serde(default)]
    pub qubit_count: u32,
    /// Connectivity, absent on simulators.
    #[serde(default)]
    pub connectivity: Option<Connectivity>,
}

/// Qubit connectivity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connectivity {
    /// Whether every qubit pair can interact.
    #[serde(default)]
    pub fully_connected: bool,
    /// Adjacency lists keyed by device qubit label.
    #[serde(default)]
    pub connectivity_graph: BTreeMap<String, Vec<String>>,
}

/// Mean of a fidelity benchmark.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FidelityStat {
    /// Mean fidelity.
    #[serde(default)]
    pub mean: Option<f64>,
}

/// Per-label calibration tables (`"1Q"` by qubit, `"2Q"` by `"a-b"` pair).
pub type CalibrationTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Vendor calibration section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderProperties {
    /// Trapped-ion fidelities keyed by `"1Q"`, `"2Q"`, `"spam"`.
    #[serde(default)]
    pub fidelity: Option<BTreeMap<String, FidelityStat>>,
    /// Trapped-ion timings in seconds keyed by `"T1"`, `"T2"`, `"1Q"`,
    /// `"2Q"`, `"readout"`, `"reset"`.
    #[serde(default)]
    pub timing: Option<BTreeMap<String, f64>>,
    /// Fixed-coupling specs keyed by `"1Q"` and `"2Q"`.
    #[serde(default)]
    pub specs: Option<BTreeMap<String, CalibrationTable>>,
}

impl DeviceCapabilities {
    /// Parse a capability document.
    pub fn from_value(device: &str, value: &serde_json::Value) -> BraketResult<Self> {
        Self::deserialize(value).map_err(|e| BraketError::InvalidCapabilities {
            device: device.to_string(),
            reason: e.to_string(),
        })
    }

    /// Classify the device.
    ///
    /// The schema header decides when it names a known family; otherwise
    /// the calibration sections present do.
    pub fn family(&self) -> DeviceFamily {
        if let Some(header) = &self.braket_schema_header {
            let name = header.name.as_str();
            if name.contains(".ionq.") {
                return DeviceFamily::IonTrap;
            }
            if name.contains(".rigetti.") {
                return DeviceFamily::FixedCoupling;
            }
            if name.contains("simulator") {
                return DeviceFamily::Simulator;
            }
        }

        match &self.provider {
            Some(p) if p.specs.is_some() => DeviceFamily::FixedCoupling,
            Some(p) if p.fidelity.is_some() && p.timing.is_some() => DeviceFamily::IonTrap,
            _ => DeviceFamily::Unknown,
        }
    }

    /// Vendor gate names of the gate-model action, if the device has one.
    pub fn supported_operations(&self) -> Option<&[String]> {
        self.action
            .get(JAQCD_ACTION)
            .map(|a| a.supported_operations.as_slice())
    }

    /// Whether the device only accepts annealing problems.
    pub fn is_annealer(&self) -> bool {
        self.action.contains_key(ANNEALING_ACTION) && !self.action.contains_key(JAQCD_ACTION)
    }

    /// Maximum shots per task (upper end of `shotsRange`).
    pub fn max_shots(&self) -> u64 {
        self.service.shots_range.map_or(0, |[_, max]| max)
    }

    /// Qubit count from the paradigm section.
    pub fn qubit_count(&self) -> u32 {
        self.paradigm.as_ref().map_or(0, |p| p.qubit_count)
    }

    /// Connectivity section, if any.
    pub fn connectivity(&self) -> Option<&Connectivity> {
        self.paradigm.as_ref().and_then(|p| p.connectivity.as_ref())
    }

    /// Trapped-ion timing entry in seconds.
    pub fn timing(&self, key: &str) -> Option<f64> {
        self.provider
            .as_ref()
            .and_then(|p| p.timing.as_ref())
            .and_then(|t| t.get(key).copied())
    }

    /// Trapped-ion mean fidelity.
    pub fn fidelity(&self, key: &str) -> Option<f64> {
        self.provider
            .as_ref()
            .and_then(|p| p.fidelity.as_ref())
            .and_then(|f| f.get(key))
            .and_then(|s| s.mean)
    }

    /// Fixed-coupling calibration table (`"1Q"` or `"2Q"`).
    pub fn specs(&self, key: &str) -> Option<&CalibrationTable> {
        self.provider
            .as_ref()
            .and_then(|p| p.specs.as_ref())
            .and_then(|s| s.get(key))
    }
}

/// A device listing entry together with its parsed capability document.
#[derive(Debug, Clone)]
pub struct BraketDevice {
    /// Listing fields.
    pub summary: DeviceSummary,
    /// Parsed capability document.
    pub capabilities: DeviceCapabilities,
}

impl BraketDevice {
    /// Device ARN.
    pub fn arn(&self) -> &str {
        &self.summary.arn
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    /// Whether the device is a managed simulator.
    pub fn is_simulator(&self) -> bool {
        self.summary.device_type == DeviceType::Simulator
            || self.capabilities.family() == DeviceFamily::Simulator
    }

    /// Device family.
    pub fn family(&self) -> DeviceFamily {
        self.capabilities.family()
    }
}

impl TryFrom<DeviceDescriptor> for BraketDevice {
    type Error = BraketError;

    fn try_from(descriptor: DeviceDescriptor) -> BraketResult<Self> {
        let capabilities =
            DeviceCapabilities::from_value(&descriptor.summary.arn, &descriptor.capabilities)?;
        Ok(Self {
            summary: descriptor.summary,
            capabilities,
        })
    }
}

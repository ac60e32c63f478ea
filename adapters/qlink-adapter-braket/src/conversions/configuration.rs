//! Device snapshot → backend configuration.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use qlink_ir::{DeviceConfiguration, GateConfig, StandardGate};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::capabilities::BraketDevice;

/// Vendor gate names that differ from the framework's names.
const VENDOR_GATE_NAMES: &[(&str, &str)] = &[
    ("i", "id"),
    ("cnot", "cx"),
    ("ccnot", "ccx"),
    ("si", "sdg"),
    ("ti", "tdg"),
    ("v", "sx"),
    ("vi", "sxdg"),
    ("phaseshift", "p"),
    ("cphaseshift", "cp"),
    ("xx", "rxx"),
    ("yy", "ryy"),
    ("zz", "rzz"),
];

/// Basis used when a device does not list gate-model operations.
pub const DEFAULT_BASIS: [&str; 5] = ["u1", "u2", "u3", "cx", "id"];

/// Translate a vendor gate name to the framework gate it denotes.
///
/// Names without a table entry are accepted when they already are
/// framework names (`h`, `rx`, `swap`, ...).
pub fn framework_gate(vendor: &str) -> Option<StandardGate> {
    let lower = vendor.to_ascii_lowercase();
    let name = VENDOR_GATE_NAMES
        .iter()
        .find(|(v, _)| *v == lower)
        .map_or(lower.as_str(), |(_, f)| *f);
    StandardGate::from_name(name)
}

/// Order device qubit labels: numeric labels by value first, then the rest
/// lexicographically.
fn label_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Canonical ↔ device qubit numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QubitLayout {
    /// Device label → canonical index.
    pub device_to_canonical: BTreeMap<String, u32>,
    /// Canonical index → device label.
    pub canonical_to_device: BTreeMap<u32, String>,
}

impl QubitLayout {
    /// Identity numbering `"i" ↔ i` for `n` qubits.
    pub fn identity(n: u32) -> Self {
        (0..n).map(|i| i.to_string()).collect()
    }

    /// Number of mapped qubits.
    pub fn len(&self) -> usize {
        self.canonical_to_device.len()
    }

    /// Whether no qubit is mapped.
    pub fn is_empty(&self) -> bool {
        self.canonical_to_device.is_empty()
    }

    fn canonical(&self, label: &str) -> Option<u32> {
        self.device_to_canonical.get(label).copied()
    }
}

impl FromIterator<String> for QubitLayout {
    /// Assign canonical indices to labels in ascending label order.
    fn from_iter<I: IntoIterator<Item = String>>(labels: I) -> Self {
        let mut labels: Vec<String> = labels.into_iter().collect();
        labels.sort_by(|a, b| label_order(a, b));
        labels.dedup();

        let mut layout = Self::default();
        for (index, label) in (0u32..).zip(labels) {
            layout.device_to_canonical.insert(label.clone(), index);
            layout.canonical_to_device.insert(index, label);
        }
        layout
    }
}

/// Resolve the framework basis from the device's operation list.
fn basis_gates(device: &BraketDevice) -> Vec<StandardGate> {
    let mut seen = FxHashSet::default();
    let mut basis = Vec::new();

    match device.capabilities.supported_operations() {
        Some(operations) => {
            for op in operations {
                match framework_gate(op) {
                    Some(gate) => {
                        if seen.insert(gate) {
                            basis.push(gate);
                        }
                    }
                    None => warn!(device = device.name(), gate = %op, "Dropping untranslatable gate"),
                }
            }
        }
        None => {
            debug!(device = device.name(), "No gate-model action, using default basis");
            basis.extend(DEFAULT_BASIS.iter().filter_map(|n| StandardGate::from_name(n)));
        }
    }

    basis
}

/// Build the backend configuration of a device.
pub fn device_to_configuration(device: &BraketDevice) -> DeviceConfiguration {
    let caps = &device.capabilities;
    let simulator = device.is_simulator();
    let connectivity = caps.connectivity();
    let fully_connected = simulator || connectivity.is_some_and(|c| c.fully_connected);

    let graph = connectivity
        .filter(|_| !fully_connected)
        .map(|c| &c.connectivity_graph);
    let labels: Vec<String> = graph
        .into_iter()
        .flat_map(|g| g.iter())
        .flat_map(|(label, neighbors)| std::iter::once(label).chain(neighbors))
        .cloned()
        .collect();

    let layout = if labels.is_empty() {
        QubitLayout::identity(caps.qubit_count())
    } else {
        labels.into_iter().collect()
    };
    #[allow(clippy::cast_possible_truncation)]
    let n_qubits = caps.qubit_count().max(layout.len() as u32);

    let mut coupling_map: Vec<[u32; 2]> = if fully_connected {
        (0..n_qubits)
            .flat_map(|a| (0..n_qubits).filter(move |&b| b != a).map(move |b| [a, b]))
            .collect()
    } else {
        graph
            .into_iter()
            .flat_map(|g| g.iter())
            .flat_map(|(label, neighbors)| neighbors.iter().map(move |n| (label, n)))
            .filter_map(|(a, b)| Some([layout.canonical(a)?, layout.canonical(b)?]))
            .filter(|[a, b]| a != b)
            .collect()
    };
    coupling_map.sort_unstable();
    coupling_map.dedup();

    let singles: Vec<Vec<u32>> = layout.canonical_to_device.keys().map(|&q| vec![q]).collect();
    let pairs: Vec<Vec<u32>> = coupling_map.iter().map(|p| p.to_vec()).collect();

    let mut basis = Vec::new();
    let mut gates = Vec::new();
    for gate in basis_gates(device) {
        let coupling = if gate.num_qubits() == 2 {
            pairs.clone()
        } else {
            singles.clone()
        };
        if coupling.is_empty() {
            warn!(device = device.name(), gate = %gate, "Dropping gate without usable qubits");
            continue;
        }
        basis.push(gate.name().to_string());
        gates.push(GateConfig {
            name: gate.name().to_string(),
            parameters: gate.parameter_names().iter().map(|p| (*p).to_string()).collect(),
            coupling_map: coupling,
        });
    }

    DeviceConfiguration {
        backend_name: device.name().to_string(),
        backend_version: device.arn().to_string(),
        n_qubits,
        basis_gates: basis,
        gates,
        coupling_map,
        simulator,
        local: false,
        conditional: false,
        open_pulse: false,
        memory: false,
        max_shots: caps.max_shots(),
        max_experiments: None,
        device_to_canonical: layout.device_to_canonical,
        canonical_to_device: layout.canonical_to_device,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::DeviceCapabilities;
    use qlink_hal::{DeviceStatus, DeviceSummary, DeviceType};
    use serde_json::json;

    fn device(device_type: DeviceType, doc: serde_json::Value) -> BraketDevice {
        BraketDevice {
            summary: DeviceSummary {
                arn: "arn:aws:braket:::device/test".into(),
                name: "test".into(),
                provider_name: "test".into(),
                device_type,
                status: DeviceStatus::Online,
            },
            capabilities: DeviceCapabilities::from_value("arn", &doc).unwrap(),
        }
    }

    #[test]
    fn test_framework_gate_names() {
        assert_eq!(framework_gate("cnot"), Some(StandardGate::CX));
        assert_eq!(framework_gate("CNOT"), Some(StandardGate::CX));
        assert_eq!(framework_gate("v"), Some(StandardGate::SX));
        assert_eq!(framework_gate("h"), Some(StandardGate::H));
        assert_eq!(framework_gate("xy"), None);
        assert_eq!(framework_gate("unitary"), None);
    }

    #[test]
    fn test_label_order() {
        let layout: QubitLayout = ["10", "2", "q1", "0", "a"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let order: Vec<&str> = layout.canonical_to_device.values().map(String::as_str).collect();
        assert_eq!(order, ["0", "2", "10", "a", "q1"]);
        assert_eq!(layout.canonical("10"), Some(2));
    }

    #[test]
    fn test_simulator_full_connectivity() {
        let doc = json!({
            "braketSchemaHeader": {"name": "braket.device_schema.simulators.gate_model_simulator_device_capabilities"},
            "service": {"shotsRange": [0, 100000]},
            "action": {"braket.ir.jaqcd.program": {"supportedOperations": ["h", "cnot", "unitary"]}},
            "paradigm": {"qubitCount": 3}
        });
        let config = device_to_configuration(&device(DeviceType::Simulator, doc));

        assert!(config.simulator);
        assert_eq!(config.n_qubits, 3);
        assert_eq!(config.max_shots, 100_000);
        assert_eq!(config.basis_gates, ["h", "cx"]);
        assert_eq!(config.coupling_map.len(), 6);
        assert_eq!(config.gate("h").unwrap().coupling_map, [[0], [1], [2]]);
        assert_eq!(config.gate("cx").unwrap().coupling_map.len(), 6);
        assert_eq!(config.device_label(2), Some("2"));
        assert_eq!(config.canonical_index("1"), Some(1));
    }

    #[test]
    fn test_coupled_device_relabels() {
        let doc = json!({
            "braketSchemaHeader": {"name": "braket.device_schema.rigetti.rigetti_device_capabilities"},
            "service": {"shotsRange": [1, 10000]},
            "action": {"braket.ir.jaqcd.program": {"supportedOperations": ["cz", "rx", "rz"]}},
            "paradigm": {
                "qubitCount": 3,
                "connectivity": {
                    "fullyConnected": false,
                    "connectivityGraph": {"10": ["11"], "11": ["10", "17"], "17": ["11"]}
                }
            }
        });
        let config = device_to_configuration(&device(DeviceType::Qpu, doc));

        assert!(!config.simulator);
        assert_eq!(config.canonical_index("10"), Some(0));
        assert_eq!(config.canonical_index("11"), Some(1));
        assert_eq!(config.canonical_index("17"), Some(2));
        assert_eq!(config.coupling_map, [[0, 1], [1, 0], [1, 2], [2, 1]]);
        assert_eq!(config.gate("cz").unwrap().coupling_map.len(), 4);
        assert_eq!(config.gate("rx").unwrap().coupling_map, [[0], [1], [2]]);
        assert_eq!(config.gate("rx").unwrap().parameters, ["theta"]);
    }

    #[test]
    fn test_basis_ignores_verbatim_gate_set() {
        let doc = json!({
            "action": {"braket.ir.jaqcd.program": {"supportedOperations": ["h", "cnot"]}},
            "paradigm": {
                "qubitCount": 2,
                "nativeGateSet": ["rx", "rz", "iswap"],
                "connectivity": {"fullyConnected": true}
            }
        });
        let config = device_to_configuration(&device(DeviceType::Qpu, doc));
        assert_eq!(config.basis_gates, ["h", "cx"]);
    }

    #[test]
    fn test_default_basis_without_jaqcd() {
        let doc = json!({
            "service": {"shotsRange": [1, 1000]},
            "paradigm": {"qubitCount": 2, "connectivity": {"fullyConnected": true}}
        });
        let config = device_to_configuration(&device(DeviceType::Qpu, doc));
        assert_eq!(config.basis_gates, ["u1", "u2", "u3", "cx", "id"]);
        assert_eq!(config.gate("u3").unwrap().parameters, ["theta", "phi", "lam"]);
    }

    #[test]
    fn test_gates_without_qubits_are_dropped() {
        let doc = json!({
            "action": {"braket.ir.jaqcd.program": {"supportedOperations": ["h", "cnot"]}},
            "paradigm": {"qubitCount": 1, "connectivity": {"fullyConnected": false, "connectivityGraph": {}}}
        });
        let config = device_to_configuration(&device(DeviceType::Qpu, doc));
        assert_eq!(config.basis_gates, ["h"]);
        assert!(config.gates.iter().all(|g| !g.coupling_map.is_empty()));
    }
}

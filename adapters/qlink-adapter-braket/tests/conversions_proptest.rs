//! Property-based tests for device-capability translation.
//!
//! Capability documents are generated with random gate lists and random
//! connectivity graphs over arbitrary device labels.

use std::collections::BTreeMap;

use proptest::prelude::*;
use qlink_adapter_braket::{BraketDevice, DeviceCapabilities, device_to_configuration};
use qlink_hal::{DeviceStatus, DeviceSummary, DeviceType};
use qlink_ir::{DeviceConfiguration, StandardGate};
use serde_json::json;

/// Vendor operation names, including some with no framework counterpart.
const OPERATIONS: &[&str] = &[
    "h", "x", "y", "z", "s", "si", "t", "ti", "v", "vi", "rx", "ry", "rz", "phaseshift", "cnot",
    "cy", "cz", "cphaseshift", "swap", "iswap", "xx", "yy", "zz", "ccnot", "cswap", "unitary",
    "xy", "pswap", "ecr", "start_verbatim_box",
];

/// Device labels: sparse numbers as vendors use them.
fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![(0_u32..200).prop_map(|n| n.to_string()), "[a-d][0-9]"]
}

fn arb_graph() -> impl Strategy<Value = BTreeMap<String, Vec<String>>> {
    prop::collection::vec((arb_label(), arb_label()), 0..24).prop_map(|edges| {
        let mut graph: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (a, b) in edges {
            graph.entry(a).or_default().push(b);
        }
        graph
    })
}

fn arb_device() -> impl Strategy<Value = BraketDevice> {
    (
        prop::sample::subsequence(OPERATIONS, 0..=OPERATIONS.len()),
        arb_graph(),
        any::<bool>(),
        any::<bool>(),
        0_u32..16,
    )
        .prop_map(|(ops, graph, fully_connected, simulator, qubit_count)| {
            let doc = json!({
                "service": {"shotsRange": [1, 1000]},
                "action": {"braket.ir.jaqcd.program": {"supportedOperations": ops}},
                "paradigm": {
                    "qubitCount": qubit_count,
                    "connectivity": {"fullyConnected": fully_connected, "connectivityGraph": graph}
                }
            });
            BraketDevice {
                summary: DeviceSummary {
                    arn: "arn:aws:braket:::device/qpu/generated/dev".into(),
                    name: "generated".into(),
                    provider_name: "generated".into(),
                    device_type: if simulator {
                        DeviceType::Simulator
                    } else {
                        DeviceType::Qpu
                    },
                    status: DeviceStatus::Online,
                },
                capabilities: DeviceCapabilities::from_value("generated", &doc)
                    .expect("generated document parses"),
            }
        })
}

fn in_range(config: &DeviceConfiguration, qubits: &[u32]) -> bool {
    qubits.iter().all(|&q| q < config.n_qubits)
}

proptest! {
    /// Every gate has at least one usable qubit tuple and every basis name
    /// is a framework gate.
    #[test]
    fn test_configuration_gates_are_usable(device in arb_device()) {
        let config = device_to_configuration(&device);

        for gate in &config.gates {
            prop_assert!(!gate.coupling_map.is_empty(), "{} has no qubits", gate.name);
            prop_assert!(gate.coupling_map.iter().all(|q| in_range(&config, q)));
        }
        for name in &config.basis_gates {
            prop_assert!(StandardGate::from_name(name).is_some(), "unknown basis gate {}", name);
        }
        let gate_names: Vec<&str> = config.gates.iter().map(|g| g.name.as_str()).collect();
        let basis: Vec<&str> = config.basis_gates.iter().map(String::as_str).collect();
        prop_assert_eq!(gate_names, basis);
    }

    /// Two-qubit gates only act on pairs of the device coupling map.
    #[test]
    fn test_two_qubit_gates_follow_coupling(device in arb_device()) {
        let config = device_to_configuration(&device);

        for pair in &config.coupling_map {
            prop_assert_ne!(pair[0], pair[1]);
            prop_assert!(in_range(&config, pair));
        }
        for gate in &config.gates {
            for qubits in &gate.coupling_map {
                if let [a, b] = qubits.as_slice() {
                    prop_assert!(config.coupling_map.contains(&[*a, *b]));
                }
            }
        }
    }

    /// The canonical numbering is a bijection onto `0..len`.
    #[test]
    fn test_qubit_numbering_is_bijective(device in arb_device()) {
        let config = device_to_configuration(&device);

        prop_assert_eq!(config.device_to_canonical.len(), config.canonical_to_device.len());
        let indices: Vec<u32> = config.canonical_to_device.keys().copied().collect();
        let expected: Vec<u32> = (0..u32::try_from(indices.len()).unwrap()).collect();
        prop_assert_eq!(indices, expected);
        for (label, &index) in &config.device_to_canonical {
            prop_assert_eq!(config.device_label(index), Some(label.as_str()));
        }
        prop_assert!(config.canonical_to_device.len() as u32 <= config.n_qubits);
    }

    /// Translation is deterministic.
    #[test]
    fn test_configuration_is_deterministic(device in arb_device()) {
        prop_assert_eq!(device_to_configuration(&device), device_to_configuration(&device));
    }
}

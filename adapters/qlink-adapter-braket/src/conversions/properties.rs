//! Device snapshot → backend properties (calibration data).
//!
//! Each device family publishes calibration differently, so translation
//! dispatches on [`DeviceFamily`]. Gates and qubits are addressed by
//! canonical index in the output and by device label in the document.

use chrono::{DateTime, Utc};
use qlink_ir::{DeviceConfiguration, DeviceProperties, GateProperties, Nduv};

use crate::capabilities::{BraketDevice, DeviceCapabilities, DeviceFamily};
use crate::units::{MILLISECONDS, seconds_to_ms};

/// Stand-in for a missing T1/T2 on fixed-coupling devices. Consumers divide
/// by these times, so a missing value must not become zero.
pub const MISSING_COHERENCE_SECONDS: f64 = 1e-9;

/// Nominal single-qubit gate duration on fixed-coupling devices.
pub const FIXED_COUPLING_1Q_SECONDS: f64 = 60e-9;

/// Nominal two-qubit gate duration on fixed-coupling devices.
pub const FIXED_COUPLING_2Q_SECONDS: f64 = 160e-9;

fn ratio(date: DateTime<Utc>, name: &str, value: Option<f64>) -> Nduv {
    Nduv::new(date, name, "", value)
}

fn duration(date: DateTime<Utc>, name: &str, seconds: Option<f64>) -> Nduv {
    Nduv::new(date, name, MILLISECONDS, seconds.map(seconds_to_ms))
}

fn error_rate(fidelity: Option<f64>) -> Option<f64> {
    fidelity.map(|f| 1.0 - f)
}

/// Build the calibration snapshot of a device.
pub fn device_to_properties(
    device: &BraketDevice,
    configuration: &DeviceConfiguration,
) -> DeviceProperties {
    let date = device
        .capabilities
        .service
        .updated_at()
        .unwrap_or_else(Utc::now);
    let mut properties = DeviceProperties::empty(
        configuration.backend_name.clone(),
        configuration.backend_version.clone(),
        date,
    );

    match device.family() {
        DeviceFamily::IonTrap => ion_trap(&device.capabilities, configuration, &mut properties),
        DeviceFamily::FixedCoupling => {
            fixed_coupling(&device.capabilities, configuration, &mut properties);
        }
        DeviceFamily::Simulator | DeviceFamily::Unknown => {}
    }

    properties
}

/// Trapped-ion devices publish one fidelity and timing table for all qubits.
fn ion_trap(
    caps: &DeviceCapabilities,
    configuration: &DeviceConfiguration,
    properties: &mut DeviceProperties,
) {
    let date = properties.last_update_date;

    properties.qubits = (0..configuration.n_qubits)
        .map(|_| {
            vec![
                duration(date, "T1", caps.timing("T1")),
                duration(date, "T2", caps.timing("T2")),
            ]
        })
        .collect();

    properties.gates = configuration
        .gates
        .iter()
        .flat_map(|gate| {
            gate.coupling_map.iter().map(move |qubits| {
                let key = if qubits.len() == 1 { "1Q" } else { "2Q" };
                GateProperties {
                    gate: gate.name.clone(),
                    qubits: qubits.clone(),
                    parameters: vec![
                        ratio(date, "gate_error", error_rate(caps.fidelity(key))),
                        duration(date, "gate_length", caps.timing(key)),
                    ],
                }
            })
        })
        .collect();

    properties.general = vec![
        ratio(date, "spam_fidelity", caps.fidelity("spam")),
        duration(date, "readout_time", caps.timing("readout")),
        duration(date, "reset_time", caps.timing("reset")),
    ];
}

/// Fixed-coupling devices publish per-qubit and per-pair specs keyed by
/// device label.
fn fixed_coupling(
    caps: &DeviceCapabilities,
    configuration: &DeviceConfiguration,
    properties: &mut DeviceProperties,
) {
    let date = properties.last_update_date;
    let one_qubit = caps.specs("1Q");
    let two_qubit = caps.specs("2Q");

    let qubit_metric = |canonical: u32, metric: &str| -> Option<f64> {
        let label = configuration.device_label(canonical)?;
        one_qubit?.get(label)?.get(metric).copied()
    };

    let pair_metric = |a: u32, b: u32, metric: &str| -> Option<f64> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = configuration.device_label(lo)?;
        let hi = configuration.device_label(hi)?;
        let table = two_qubit?;
        table
            .get(&format!("{lo}-{hi}"))
            .or_else(|| table.get(&format!("{hi}-{lo}")))?
            .get(metric)
            .copied()
    };

    properties.qubits = configuration
        .canonical_to_device
        .keys()
        .map(|&q| {
            vec![
                duration(
                    date,
                    "T1",
                    Some(qubit_metric(q, "T1").unwrap_or(MISSING_COHERENCE_SECONDS)),
                ),
                duration(
                    date,
                    "T2",
                    Some(qubit_metric(q, "T2").unwrap_or(MISSING_COHERENCE_SECONDS)),
                ),
                ratio(date, "readout_error", qubit_metric(q, "fRO")),
            ]
        })
        .collect();

    properties.gates = configuration
        .gates
        .iter()
        .flat_map(|gate| {
            gate.coupling_map.iter().map(move |qubits| {
                let (fidelity, length) = match qubits.as_slice() {
                    [q] => (
                        qubit_metric(*q, "f1Q_simultaneous_RB"),
                        Some(FIXED_COUPLING_1Q_SECONDS),
                    ),
                    [a, b] => (pair_metric(*a, *b, "fCZ"), Some(FIXED_COUPLING_2Q_SECONDS)),
                    _ => (None, None),
                };
                GateProperties {
                    gate: gate.name.clone(),
                    qubits: qubits.clone(),
                    parameters: vec![
                        ratio(date, "gate_error", error_rate(fidelity)),
                        duration(date, "gate_length", length),
                    ],
                }
            })
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::device_to_configuration;
    use qlink_hal::{DeviceStatus, DeviceSummary, DeviceType};
    use serde_json::json;

    fn device(device_type: DeviceType, doc: serde_json::Value) -> BraketDevice {
        BraketDevice {
            summary: DeviceSummary {
                arn: "arn:aws:braket:::device/qpu/test".into(),
                name: "test".into(),
                provider_name: "test".into(),
                device_type,
                status: DeviceStatus::Online,
            },
            capabilities: DeviceCapabilities::from_value("arn", &doc).unwrap(),
        }
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-12)
    }

    #[test]
    fn test_ion_trap_properties() {
        let doc = json!({
            "braketSchemaHeader": {"name": "braket.device_schema.ionq.ionq_device_capabilities"},
            "service": {"shotsRange": [1, 10000], "updatedAt": "2020-08-20T14:00:00Z"},
            "action": {"braket.ir.jaqcd.program": {"supportedOperations": ["x", "cnot"]}},
            "paradigm": {"qubitCount": 2, "connectivity": {"fullyConnected": true}},
            "provider": {
                "fidelity": {"1Q": {"mean": 0.99717}, "2Q": {"mean": 0.9696}, "spam": {"mean": 0.9961}},
                "timing": {"T1": 10000.0, "T2": 0.2, "1Q": 1.1e-5, "2Q": 2.1e-4, "readout": 1.75e-4, "reset": 3.5e-5}
            }
        });
        let device = device(DeviceType::Qpu, doc);
        let config = device_to_configuration(&device);
        let props = device_to_properties(&device, &config);

        assert_eq!(props.last_update_date.to_rfc3339(), "2020-08-20T14:00:00+00:00");
        assert_eq!(props.qubits.len(), 2);
        assert!(close(props.qubit_property(1, "T1").unwrap().value, 1.0e7));
        assert!(close(props.qubit_property(0, "T2").unwrap().value, 200.0));
        assert_eq!(props.qubit_property(0, "T2").unwrap().unit, "ms");

        let x = props.gate_property("x", &[0]).unwrap();
        assert!(close(x.parameter("gate_error").unwrap().value, 1.0 - 0.99717));
        assert!(close(x.parameter("gate_length").unwrap().value, 1.1e-2));

        let cx = props.gate_property("cx", &[1, 0]).unwrap();
        assert!(close(cx.parameter("gate_error").unwrap().value, 1.0 - 0.9696));
        assert!(close(cx.parameter("gate_length").unwrap().value, 0.21));

        assert!(close(props.general_property("spam_fidelity").unwrap().value, 0.9961));
        assert!(close(props.general_property("readout_time").unwrap().value, 0.175));
        assert!(close(props.general_property("reset_time").unwrap().value, 0.035));
    }

    #[test]
    fn test_fixed_coupling_properties() {
        let doc = json!({
            "braketSchemaHeader": {"name": "braket.device_schema.rigetti.rigetti_device_capabilities"},
            "service": {"shotsRange": [1, 10000]},
            "action": {"braket.ir.jaqcd.program": {"supportedOperations": ["rx", "cz"]}},
            "paradigm": {
                "qubitCount": 2,
                "connectivity": {"fullyConnected": false, "connectivityGraph": {"10": ["11"], "11": ["10"]}}
            },
            "provider": {
                "specs": {
                    "1Q": {
                        "10": {"T1": 2.0e-5, "T2": 1.5e-5, "fRO": 0.95, "f1Q_simultaneous_RB": 0.99},
                        "11": {"fRO": 0.9}
                    },
                    "2Q": {"10-11": {"fCZ": 0.9}}
                }
            }
        });
        let device = device(DeviceType::Qpu, doc);
        let config = device_to_configuration(&device);
        let props = device_to_properties(&device, &config);

        assert_eq!(props.qubits.len(), 2);
        assert!(close(props.qubit_property(0, "T1").unwrap().value, 2.0e-2));
        assert!(close(props.qubit_property(0, "readout_error").unwrap().value, 0.95));
        // missing coherence times get the placeholder, never zero
        assert!(close(props.qubit_property(1, "T1").unwrap().value, 1e-6));
        assert!(close(props.qubit_property(1, "T2").unwrap().value, 1e-6));

        let rx0 = props.gate_property("rx", &[0]).unwrap();
        assert!(close(rx0.parameter("gate_error").unwrap().value, 0.01));
        assert!(close(rx0.parameter("gate_length").unwrap().value, 6e-5));
        let rx1 = props.gate_property("rx", &[1]).unwrap();
        assert_eq!(rx1.parameter("gate_error").unwrap().value, None);

        let forward = props.gate_property("cz", &[0, 1]).unwrap();
        let reverse = props.gate_property("cz", &[1, 0]).unwrap();
        assert!(close(forward.parameter("gate_error").unwrap().value, 0.1));
        assert!(close(reverse.parameter("gate_error").unwrap().value, 0.1));
        assert!(close(forward.parameter("gate_length").unwrap().value, 1.6e-4));
        assert!(props.general.is_empty());
    }

    #[test]
    fn test_simulator_properties_are_empty() {
        let doc = json!({
            "braketSchemaHeader": {"name": "braket.device_schema.simulators.gate_model_simulator_device_capabilities"},
            "action": {"braket.ir.jaqcd.program": {"supportedOperations": ["h"]}},
            "paradigm": {"qubitCount": 4}
        });
        let device = device(DeviceType::Simulator, doc);
        let config = device_to_configuration(&device);
        let props = device_to_properties(&device, &config);

        assert_eq!(props.backend_name, "test");
        assert!(props.qubits.is_empty());
        assert!(props.gates.is_empty());
        assert!(props.general.is_empty());
    }
}

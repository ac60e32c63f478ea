//! Well-known Braket device ARNs and short names.

/// Rigetti Ankaa-3.
pub const RIGETTI_ANKAA_3: &str = "arn:aws:braket:us-west-1::device/qpu/rigetti/Ankaa-3";

/// IonQ Aria 1.
pub const IONQ_ARIA_1: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-1";

/// IonQ Aria 2.
pub const IONQ_ARIA_2: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-2";

/// IonQ Forte 1.
pub const IONQ_FORTE_1: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Forte-1";

/// IQM Garnet.
pub const IQM_GARNET: &str = "arn:aws:braket:eu-north-1::device/qpu/iqm/Garnet";

/// SV1 state vector simulator.
pub const SV1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/sv1";

/// TN1 tensor network simulator.
pub const TN1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/tn1";

/// DM1 density matrix simulator.
pub const DM1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/dm1";

/// Short names accepted by [`arn_for_name`].
const SHORT_NAMES: &[(&[&str], &str)] = &[
    (&["ankaa-3", "ankaa3", "ankaa"], RIGETTI_ANKAA_3),
    (&["aria-1", "aria1", "aria"], IONQ_ARIA_1),
    (&["aria-2", "aria2"], IONQ_ARIA_2),
    (&["forte-1", "forte1", "forte"], IONQ_FORTE_1),
    (&["garnet", "iqm-garnet"], IQM_GARNET),
    (&["sv1", "braket-sv1"], SV1),
    (&["tn1", "braket-tn1"], TN1),
    (&["dm1", "braket-dm1"], DM1),
];

/// Map a short device name to its ARN (case-insensitive).
pub fn arn_for_name(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    SHORT_NAMES
        .iter()
        .find(|(aliases, _)| aliases.contains(&name.as_str()))
        .map(|(_, arn)| *arn)
}

/// Provider segment of a device ARN.
///
/// ARN format: `arn:aws:braket:<region>::device/<type>/<provider>/<device>`.
pub fn provider_from_arn(device_arn: &str) -> &str {
    device_arn.split('/').nth(2).unwrap_or("unknown")
}

/// Region segment of a device ARN; empty for region-less simulators.
pub fn region_from_arn(device_arn: &str) -> Option<&str> {
    device_arn.split(':').nth(3).filter(|r| !r.is_empty())
}

//! Device discovery through the provider.

mod common;

use std::sync::Arc;

use common::{MockService, SV1_ARN, annealer_capabilities, descriptor, simulator_capabilities};
use qlink_adapter_braket::{BraketConfig, BraketError, BraketProvider, DeviceFamily};
use qlink_hal::{DeviceType, MemoryBlobStore};
use serde_json::json;

const ARIA_ARN: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-1";
const ADVANTAGE_ARN: &str = "arn:aws:braket:::device/qpu/d-wave/Advantage_system4";

fn ionq_capabilities() -> serde_json::Value {
    json!({
        "braketSchemaHeader": {"name": "braket.device_schema.ionq.ionq_device_capabilities", "version": "1"},
        "service": {"shotsRange": [1, 10000]},
        "action": {"braket.ir.jaqcd.program": {"supportedOperations": ["x", "y", "z", "rx", "ry", "rz", "h", "cnot", "xx", "yy", "zz", "swap"]}},
        "paradigm": {"qubitCount": 25, "connectivity": {"fullyConnected": true}},
        "provider": {
            "fidelity": {"1Q": {"mean": 0.9998}, "2Q": {"mean": 0.98}, "spam": {"mean": 0.9935}},
            "timing": {"T1": 100.0, "T2": 1.0, "1Q": 1.35e-4, "2Q": 6.0e-4, "readout": 3.0e-4, "reset": 2.0e-5}
        }
    })
}

fn provider() -> BraketProvider {
    common::init_tracing();
    let service = MockService {
        devices: vec![
            descriptor(SV1_ARN, "SV1", DeviceType::Simulator, simulator_capabilities()),
            descriptor(ARIA_ARN, "Aria 1", DeviceType::Qpu, ionq_capabilities()),
            descriptor(ADVANTAGE_ARN, "Advantage_system4.1", DeviceType::Qpu, annealer_capabilities()),
        ],
        ..MockService::new()
    };
    BraketProvider::new(
        Arc::new(service),
        Arc::new(MemoryBlobStore::new()),
        BraketConfig::default().with_s3_bucket("bucket"),
    )
}

#[tokio::test]
async fn test_backends_skip_annealers() {
    let backends = provider().backends(None).await.unwrap();
    let names: Vec<&str> = backends.iter().map(|b| b.name()).collect();
    assert_eq!(names, ["SV1", "Aria 1"]);
}

#[tokio::test]
async fn test_backends_by_name() {
    let backends = provider().backends(Some("Aria 1")).await.unwrap();
    assert_eq!(backends.len(), 1);

    let aria = &backends[0];
    assert_eq!(aria.arn(), ARIA_ARN);
    assert_eq!(aria.device().family(), DeviceFamily::IonTrap);
    assert_eq!(aria.configuration().n_qubits, 25);
    assert_eq!(aria.configuration().max_shots, 10_000);
    assert!(aria.configuration().basis_gates.iter().any(|g| g == "rxx"));

    let props = aria.properties();
    assert_eq!(props.qubits.len(), 25);
    assert!(props.general_property("spam_fidelity").is_some());
}

#[tokio::test]
async fn test_get_backend_by_short_name() {
    let backend = provider().get_backend("sv1").await.unwrap();
    assert_eq!(backend.arn(), SV1_ARN);
    assert!(backend.configuration().simulator);
    assert!(backend.properties().gates.is_empty());
}

#[tokio::test]
async fn test_get_backend_by_listing_name() {
    let backend = provider().get_backend("Aria 1").await.unwrap();
    assert_eq!(backend.name(), "Aria 1");
}

#[tokio::test]
async fn test_get_backend_unknown() {
    assert!(matches!(
        provider().get_backend("Ankaa-9").await,
        Err(BraketError::DeviceNotFound(name)) if name == "Ankaa-9"
    ));
    assert!(matches!(
        provider().get_backend("Advantage_system4.1").await,
        Err(BraketError::DeviceNotFound(_))
    ));
}

//! Device-capability translation.
//!
//! - [`device_to_configuration`]: qubit count, basis gates, coupling maps and
//!   the canonical ↔ device qubit numbering
//! - [`device_to_properties`]: per-qubit, per-gate and device-wide
//!   calibration, with all durations in milliseconds

mod configuration;
mod properties;

pub use configuration::{DEFAULT_BASIS, QubitLayout, device_to_configuration, framework_gate};
pub use properties::{
    FIXED_COUPLING_1Q_SECONDS, FIXED_COUPLING_2Q_SECONDS, MISSING_COHERENCE_SECONDS,
    device_to_properties,
};

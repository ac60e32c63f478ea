//! Canonical gate vocabulary of the circuit framework.
//!
//! Instructions in a QObj carry their gate as a plain string. This module
//! is the authority on which of those strings the framework recognizes, how
//! many qubits each gate acts on and what its parameters are called.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Standard gates known to the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    #[serde(rename = "id")]
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    #[serde(rename = "sx")]
    SX,
    /// sqrt(X)-dagger gate.
    #[serde(rename = "sxdg")]
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Phase gate.
    P,
    /// Legacy phase gate U1(λ).
    U1,
    /// Legacy U2(φ, λ) = U(π/2, φ, λ).
    U2,
    /// Legacy U3(θ, φ, λ).
    U3,
    /// Universal single-qubit gate U(θ, φ, λ).
    U,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    #[serde(rename = "cx")]
    CX,
    /// Controlled-Y gate.
    #[serde(rename = "cy")]
    CY,
    /// Controlled-Z gate.
    #[serde(rename = "cz")]
    CZ,
    /// Controlled-Hadamard gate.
    #[serde(rename = "ch")]
    CH,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    #[serde(rename = "iswap")]
    ISwap,
    /// Controlled rotation around X.
    #[serde(rename = "crx")]
    CRx,
    /// Controlled rotation around Y.
    #[serde(rename = "cry")]
    CRy,
    /// Controlled rotation around Z.
    #[serde(rename = "crz")]
    CRz,
    /// Controlled phase gate.
    #[serde(rename = "cp")]
    CP,
    /// Legacy controlled phase gate.
    #[serde(rename = "cu1")]
    CU1,
    /// Legacy controlled U3.
    #[serde(rename = "cu3")]
    CU3,
    /// XX rotation gate.
    #[serde(rename = "rxx")]
    RXX,
    /// YY rotation gate.
    #[serde(rename = "ryy")]
    RYY,
    /// ZZ rotation gate.
    #[serde(rename = "rzz")]
    RZZ,

    // Three-qubit gates
    /// Toffoli gate (CCX).
    #[serde(rename = "ccx")]
    CCX,
    /// Fredkin gate (CSWAP).
    #[serde(rename = "cswap")]
    CSwap,
}

impl StandardGate {
    /// Every gate the framework recognizes.
    pub const ALL: [StandardGate; 36] = [
        StandardGate::I,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::H,
        StandardGate::S,
        StandardGate::Sdg,
        StandardGate::T,
        StandardGate::Tdg,
        StandardGate::SX,
        StandardGate::SXdg,
        StandardGate::Rx,
        StandardGate::Ry,
        StandardGate::Rz,
        StandardGate::P,
        StandardGate::U1,
        StandardGate::U2,
        StandardGate::U3,
        StandardGate::U,
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
        StandardGate::ISwap,
        StandardGate::CRx,
        StandardGate::CRy,
        StandardGate::CRz,
        StandardGate::CP,
        StandardGate::CU1,
        StandardGate::CU3,
        StandardGate::RXX,
        StandardGate::RYY,
        StandardGate::RZZ,
        StandardGate::CCX,
        StandardGate::CSwap,
    ];

    /// Look up a gate by its framework name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.name() == name)
    }

    /// Look up a gate by name, failing with [`IrError::UnknownGate`].
    pub fn parse(name: &str) -> IrResult<Self> {
        Self::from_name(name).ok_or_else(|| IrError::UnknownGate(name.to_string()))
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx => "rx",
            StandardGate::Ry => "ry",
            StandardGate::Rz => "rz",
            StandardGate::P => "p",
            StandardGate::U1 => "u1",
            StandardGate::U2 => "u2",
            StandardGate::U3 => "u3",
            StandardGate::U => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::CRx => "crx",
            StandardGate::CRy => "cry",
            StandardGate::CRz => "crz",
            StandardGate::CP => "cp",
            StandardGate::CU1 => "cu1",
            StandardGate::CU3 => "cu3",
            StandardGate::RXX => "rxx",
            StandardGate::RYY => "ryy",
            StandardGate::RZZ => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(self) -> usize {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::P
            | StandardGate::U1
            | StandardGate::U2
            | StandardGate::U3
            | StandardGate::U => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::CRx
            | StandardGate::CRy
            | StandardGate::CRz
            | StandardGate::CP
            | StandardGate::CU1
            | StandardGate::CU3
            | StandardGate::RXX
            | StandardGate::RYY
            | StandardGate::RZZ => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Names of the gate's parameters, in positional order.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::P
            | StandardGate::U1
            | StandardGate::CRx
            | StandardGate::CRy
            | StandardGate::CRz
            | StandardGate::CP
            | StandardGate::CU1
            | StandardGate::RXX
            | StandardGate::RYY
            | StandardGate::RZZ => &["theta"],
            StandardGate::U2 => &["phi", "lam"],
            StandardGate::U3 | StandardGate::U | StandardGate::CU3 => &["theta", "phi", "lam"],
            _ => &[],
        }
    }

    /// Number of numeric parameters the gate takes.
    #[inline]
    pub fn num_params(self) -> usize {
        self.parameter_names().len()
    }
}

impl std::fmt::Display for StandardGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for gate in StandardGate::ALL {
            assert_eq!(StandardGate::from_name(gate.name()), Some(gate));
        }
    }

    #[test]
    fn test_unknown_gate() {
        assert!(StandardGate::from_name("cnot").is_none());
        assert!(matches!(
            StandardGate::parse("frobnicate"),
            Err(IrError::UnknownGate(name)) if name == "frobnicate"
        ));
    }

    #[test]
    fn test_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::U3.num_params(), 3);
        assert_eq!(StandardGate::U2.parameter_names(), &["phi", "lam"]);
        assert_eq!(StandardGate::CX.num_params(), 0);
    }

    #[test]
    fn test_serde_uses_framework_names() {
        let json = serde_json::to_string(&StandardGate::SXdg).unwrap();
        assert_eq!(json, "\"sxdg\"");
        let gate: StandardGate = serde_json::from_str("\"id\"").unwrap();
        assert_eq!(gate, StandardGate::I);
    }
}

//! Numeric checks of single-qubit lowerings.
//!
//! The native sequence a gate lowers to is multiplied out and compared with
//! the framework definition of the gate, up to a global phase.

use std::f64::consts::PI;

use num_complex::Complex64;
use proptest::prelude::*;
use qlink_adapter_braket::lower_experiment;
use qlink_ir::{Experiment, Instruction, NativeGate};

type Matrix = [[Complex64; 2]; 2];

const TOLERANCE: f64 = 1e-9;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn phase(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

fn mul(a: &Matrix, b: &Matrix) -> Matrix {
    let mut out = [[c(0.0, 0.0); 2]; 2];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
        }
    }
    out
}

/// `|Tr(A† B)| / 2`; equals 1 exactly when `A` and `B` differ by a phase.
fn overlap(a: &Matrix, b: &Matrix) -> f64 {
    let trace: Complex64 = (0..2)
        .flat_map(|i| (0..2).map(move |k| (i, k)))
        .map(|(i, k)| a[k][i].conj() * b[k][i])
        .sum();
    trace.norm() / 2.0
}

fn native(gate: NativeGate, angle: Option<f64>) -> Matrix {
    let a = angle.unwrap_or_default();
    let (cos, sin) = ((a / 2.0).cos(), (a / 2.0).sin());
    match gate {
        NativeGate::Rz => [[phase(-a / 2.0), c(0.0, 0.0)], [c(0.0, 0.0), phase(a / 2.0)]],
        NativeGate::Ry => [[c(cos, 0.0), c(-sin, 0.0)], [c(sin, 0.0), c(cos, 0.0)]],
        NativeGate::Rx => [[c(cos, 0.0), c(0.0, -sin)], [c(0.0, -sin), c(cos, 0.0)]],
        NativeGate::PhaseShift => [[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), phase(a)]],
        other => panic!("no matrix for {other}"),
    }
}

fn u3(theta: f64, phi: f64, lam: f64) -> Matrix {
    let (cos, sin) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    [
        [c(cos, 0.0), -phase(lam) * sin],
        [phase(phi) * sin, phase(phi + lam) * cos],
    ]
}

/// Multiply out the lowering of a single one-qubit instruction.
fn lowered(name: &str, params: &[f64]) -> Matrix {
    let exp = Experiment::new(name, vec![Instruction::parameterized(name, [0], params.iter().copied())]);
    let program = lower_experiment(&exp).unwrap();
    program
        .instructions()
        .iter()
        .fold([[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]], |acc, inst| {
            mul(&native(inst.gate, inst.angle), &acc)
        })
}

fn angle() -> impl Strategy<Value = f64> {
    -2.0 * PI..2.0 * PI
}

proptest! {
    #[test]
    fn test_u3_matches_euler_sequence(theta in angle(), phi in angle(), lam in angle()) {
        let got = lowered("u3", &[theta, phi, lam]);
        prop_assert!((overlap(&got, &u3(theta, phi, lam)) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_u_matches_u3(theta in angle(), phi in angle(), lam in angle()) {
        let got = lowered("u", &[theta, phi, lam]);
        prop_assert!((overlap(&got, &u3(theta, phi, lam)) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_u2_is_u3_at_half_pi(phi in angle(), lam in angle()) {
        let got = lowered("u2", &[phi, lam]);
        prop_assert!((overlap(&got, &u3(PI / 2.0, phi, lam)) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_phase_gates_are_exact(lam in angle()) {
        let expected = u3(0.0, 0.0, lam);
        for name in ["p", "u1"] {
            let got = lowered(name, &[lam]);
            for i in 0..2 {
                for j in 0..2 {
                    prop_assert!((got[i][j] - expected[i][j]).norm() < TOLERANCE);
                }
            }
        }
    }
}

#[test]
fn test_rotations_match_u3_special_cases() {
    let theta = 0.731;
    assert!((overlap(&lowered("ry", &[theta]), &u3(theta, 0.0, 0.0)) - 1.0).abs() < TOLERANCE);
    assert!(
        (overlap(&lowered("rx", &[theta]), &u3(theta, -PI / 2.0, PI / 2.0)) - 1.0).abs()
            < TOLERANCE
    );
    assert!((overlap(&lowered("rz", &[theta]), &u3(0.0, 0.0, theta)) - 1.0).abs() < TOLERANCE);
}

#[test]
fn test_overlap_detects_different_gates() {
    let x = u3(PI, 0.0, PI);
    let z = u3(0.0, 0.0, PI);
    assert!(overlap(&x, &z) < 0.5);
}

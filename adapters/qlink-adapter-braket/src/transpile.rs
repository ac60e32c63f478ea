//! Circuit lowering: QObj experiments → JAQCD programs.
//!
//! Every framework gate name maps to an ordered list of native steps in
//! [`LOWERING_TABLE`]. A step names the native gate and where its angle
//! comes from: a positional parameter of the instruction, a constant, or
//! nowhere. Qubit operands are passed through in their original order.
//!
//! General single-qubit unitaries become the Euler sequence
//! `rz(λ) · ry(θ) · rz(φ)` (applied left to right), which equals
//! `u3(θ, φ, λ)` up to a global phase.
//!
//! `measure` instructions turn into probability result requests on their
//! qubits; `barrier` is dropped.

use std::f64::consts::FRAC_PI_2;

use qlink_ir::{Experiment, Instruction, JaqcdInstruction, NativeGate, Program, QasmQobj, ResultType};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{BraketError, BraketResult};
use crate::remap::MeasurementMap;

/// Where a native step takes its angle from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamSource {
    /// The native gate takes no angle.
    None,
    /// The instruction parameter at this position.
    Param(usize),
    /// A fixed angle.
    Const(f64),
}

/// One native gate emitted by a lowering rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeStep {
    /// Native gate.
    pub gate: NativeGate,
    /// Angle source.
    pub angle: ParamSource,
}

/// Lowering of one framework gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoweringRule {
    /// Framework gate name.
    pub name: &'static str,
    /// Number of parameters the framework gate takes.
    pub params: usize,
    /// Native steps, in application order.
    pub steps: &'static [NativeStep],
}

impl LoweringRule {
    /// Number of qubits the rule applies to.
    pub fn num_qubits(&self) -> usize {
        self.steps.first().map_or(0, |s| s.gate.num_qubits())
    }
}

const fn fixed(gate: NativeGate) -> NativeStep {
    NativeStep {
        gate,
        angle: ParamSource::None,
    }
}

const fn param(gate: NativeGate, index: usize) -> NativeStep {
    NativeStep {
        gate,
        angle: ParamSource::Param(index),
    }
}

const fn constant(gate: NativeGate, angle: f64) -> NativeStep {
    NativeStep {
        gate,
        angle: ParamSource::Const(angle),
    }
}

macro_rules! rule {
    ($name:literal, $params:literal, [$($step:expr),+ $(,)?] $(,)?) => {
        LoweringRule {
            name: $name,
            params: $params,
            steps: &[$($step),+],
        }
    };
}

/// Framework gate → native steps.
pub static LOWERING_TABLE: &[LoweringRule] = &[
    rule!("id", 0, [fixed(NativeGate::I)]),
    rule!("x", 0, [fixed(NativeGate::X)]),
    rule!("y", 0, [fixed(NativeGate::Y)]),
    rule!("z", 0, [fixed(NativeGate::Z)]),
    rule!("h", 0, [fixed(NativeGate::H)]),
    rule!("s", 0, [fixed(NativeGate::S)]),
    rule!("sdg", 0, [fixed(NativeGate::Si)]),
    rule!("t", 0, [fixed(NativeGate::T)]),
    rule!("tdg", 0, [fixed(NativeGate::Ti)]),
    rule!("sx", 0, [fixed(NativeGate::V)]),
    rule!("sxdg", 0, [fixed(NativeGate::Vi)]),
    rule!("rx", 1, [param(NativeGate::Rx, 0)]),
    rule!("ry", 1, [param(NativeGate::Ry, 0)]),
    rule!("rz", 1, [param(NativeGate::Rz, 0)]),
    rule!("p", 1, [param(NativeGate::PhaseShift, 0)]),
    rule!("u1", 1, [param(NativeGate::PhaseShift, 0)]),
    // u2(φ, λ) = u3(π/2, φ, λ)
    rule!(
        "u2",
        2,
        [
            param(NativeGate::Rz, 1),
            constant(NativeGate::Ry, FRAC_PI_2),
            param(NativeGate::Rz, 0),
        ],
    ),
    rule!(
        "u3",
        3,
        [
            param(NativeGate::Rz, 2),
            param(NativeGate::Ry, 0),
            param(NativeGate::Rz, 1),
        ],
    ),
    rule!(
        "u",
        3,
        [
            param(NativeGate::Rz, 2),
            param(NativeGate::Ry, 0),
            param(NativeGate::Rz, 1),
        ],
    ),
    rule!("cx", 0, [fixed(NativeGate::CNot)]),
    rule!("cy", 0, [fixed(NativeGate::CY)]),
    rule!("cz", 0, [fixed(NativeGate::CZ)]),
    rule!("cp", 1, [param(NativeGate::CPhaseShift, 0)]),
    rule!("cu1", 1, [param(NativeGate::CPhaseShift, 0)]),
    rule!("swap", 0, [fixed(NativeGate::Swap)]),
    rule!("iswap", 0, [fixed(NativeGate::ISwap)]),
    rule!("rxx", 1, [param(NativeGate::XX, 0)]),
    rule!("ryy", 1, [param(NativeGate::YY, 0)]),
    rule!("rzz", 1, [param(NativeGate::ZZ, 0)]),
    rule!("ccx", 0, [fixed(NativeGate::CCNot)]),
    rule!("cswap", 0, [fixed(NativeGate::CSwap)]),
];

/// Look up the lowering rule of a framework gate.
pub fn lowering_rule(name: &str) -> Option<&'static LoweringRule> {
    LOWERING_TABLE.iter().find(|r| r.name == name)
}

fn lower_gate(inst: &Instruction, program: &mut Program) -> BraketResult<()> {
    let rule =
        lowering_rule(&inst.name).ok_or_else(|| BraketError::UnsupportedGate(inst.name.clone()))?;
    inst.check_arity(rule.num_qubits(), rule.params)?;

    for step in rule.steps {
        let angle = match step.angle {
            ParamSource::None => None,
            ParamSource::Param(i) => inst.params.get(i).copied(),
            ParamSource::Const(value) => Some(value),
        };
        program.push(JaqcdInstruction::new(step.gate, inst.qubits.clone(), angle));
    }
    Ok(())
}

fn lower_measure(inst: &Instruction, requested: &mut FxHashSet<u32>, program: &mut Program) {
    let targets: Vec<u32> = inst
        .qubits
        .iter()
        .copied()
        .filter(|q| requested.insert(*q))
        .collect();
    if !targets.is_empty() {
        program.push_result(ResultType::Probability { targets });
    }
}

/// Lower one experiment.
///
/// Fails on the first instruction without a lowering, with the wrong
/// operand or parameter count, on a malformed measurement, or when two
/// qubits are measured into the same classical bit.
pub fn lower_experiment(experiment: &Experiment) -> BraketResult<Program> {
    MeasurementMap::from_experiment(experiment)?;

    let mut program = Program::new();
    let mut requested = FxHashSet::default();

    for inst in &experiment.instructions {
        if inst.is_barrier() {
            continue;
        }
        if inst.is_measure() {
            lower_measure(inst, &mut requested, &mut program);
            continue;
        }
        lower_gate(inst, &mut program)?;
    }

    debug!(
        experiment = experiment.name().unwrap_or_default(),
        instructions = program.instructions().len(),
        qubits = program.qubit_count(),
        "Lowered experiment"
    );
    Ok(program)
}

/// Lower every experiment of a batch, lazily and in batch order.
pub fn lower_batch(qobj: &QasmQobj) -> impl Iterator<Item = BraketResult<Program>> + '_ {
    qobj.experiments.iter().map(lower_experiment)
}

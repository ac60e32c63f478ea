//! Measurement remapping: raw device bitstrings → framework counts.
//!
//! The device reports one character per measured position with qubit 0
//! leftmost. The framework keys counts by classical bits, highest bit
//! leftmost, and reaches those bits through the `measure` instructions'
//! qubit → memory-slot pairs.
//!
//! Output bitstrings are as wide as the number of distinct classical bits
//! written. Qubits that are not measured are dropped, and raw outcomes that
//! collapse onto the same output have their counts summed.

use std::collections::{BTreeMap, HashMap};

use qlink_ir::{Counts, Experiment};

use crate::error::{BraketError, BraketResult};

/// Qubit → classical bit assignment of one experiment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementMap {
    /// `(qubit, output position)` pairs; positions count from the left.
    slots: Vec<(u32, usize)>,
    width: usize,
}

impl MeasurementMap {
    /// Build a map from `(qubit, classical bit)` pairs.
    ///
    /// A classical bit written from two different qubits is rejected.
    pub fn new(pairs: impl IntoIterator<Item = (u32, u32)>) -> BraketResult<Self> {
        let mut writers: BTreeMap<u32, u32> = BTreeMap::new();
        let mut assignments: Vec<(u32, u32)> = Vec::new();

        for (qubit, clbit) in pairs {
            match writers.get(&clbit) {
                Some(&first) if first != qubit => {
                    return Err(BraketError::NonInjectiveMeasurement {
                        clbit,
                        first,
                        second: qubit,
                    });
                }
                Some(_) => {}
                None => {
                    writers.insert(clbit, qubit);
                    assignments.push((qubit, clbit));
                }
            }
        }

        // BTreeMap keys are ascending, so the rank of a bit is its position.
        let rank: BTreeMap<u32, usize> = writers.keys().enumerate().map(|(r, &c)| (c, r)).collect();
        let width = rank.len();
        let slots = assignments
            .into_iter()
            .map(|(qubit, clbit)| (qubit, width - 1 - rank[&clbit]))
            .collect();

        Ok(Self { slots, width })
    }

    /// Build the map from an experiment's `measure` instructions.
    pub fn from_experiment(experiment: &Experiment) -> BraketResult<Self> {
        Self::new(experiment.measurement_pairs()?)
    }

    /// Width of the remapped bitstrings.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Remap one raw bitstring.
    ///
    /// `measured_qubits` lists the qubit behind each raw position when the
    /// device reports it; otherwise position `q` holds qubit `q`.
    pub fn remap(&self, raw: &str, measured_qubits: Option<&[u32]>) -> BraketResult<String> {
        let raw: Vec<char> = raw.chars().collect();
        let mut out = vec!['0'; self.width];

        for &(qubit, slot) in &self.slots {
            let position = match measured_qubits {
                Some(list) => list.iter().position(|&q| q == qubit),
                None => Some(qubit as usize).filter(|&p| p < raw.len()),
            };
            let bit = position
                .and_then(|p| raw.get(p))
                .ok_or(BraketError::QubitOutOfRange {
                    qubit,
                    width: raw.len(),
                })?;
            out[slot] = *bit;
        }

        Ok(out.into_iter().collect())
    }
}

/// Remap raw device counts into framework counts.
pub fn remap_counts(
    raw_counts: &HashMap<String, u64>,
    map: &MeasurementMap,
    measured_qubits: Option<&[u32]>,
) -> BraketResult<Counts> {
    let expected = measured_qubits
        .map(<[u32]>::len)
        .or_else(|| raw_counts.keys().next().map(|k| k.chars().count()));

    let mut counts = Counts::new();
    for (raw, &count) in raw_counts {
        let got = raw.chars().count();
        if let Some(expected) = expected.filter(|&e| e != got) {
            return Err(BraketError::BitstringLength {
                bitstring: raw.clone(),
                expected,
                got,
            });
        }
        *counts.entry(map.remap(raw, measured_qubits)?).or_insert(0) += count;
    }
    Ok(counts)
}

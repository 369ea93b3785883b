#[cfg(feature = "parallel")]
pub(crate) use rayon::prelude::*;

use crate::errors::{RegisterError, RegisterResult};
use crate::gates::{Matrix2, Matrix4, OneQubitGate, TwoQubitGate, Unitary};
use crate::types::{from_f64, Representation};
use crate::utils::{consolidate_vec, flip_bits, get_bit, set_bit};
use crate::{Complex, Precision};
use num_traits::{One, Zero};
use std::fmt;
use tracing::trace;

/// Largest register width whose basis indices still fit in a `usize`.
pub const MAX_WIDTH: usize = (usize::BITS - 1) as usize;

/// Allowed deviation of the total probability from one.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-3;

/// Entries with a squared magnitude at or below this are dropped after each gate.
pub const DEFAULT_PRUNE_THRESHOLD: f64 = 1e-20;

/// A quantum register which only stores basis states with nonzero amplitude.
///
/// Qubit `i` is bit `i` of each basis index. Entries are kept sorted by index with no
/// duplicates.
#[derive(Debug, Clone)]
pub struct QuantumRegister<P: Precision> {
    pub(crate) width: usize,
    pub(crate) states: Vec<(usize, Complex<P>)>,
    pub(crate) scratch_start: Option<usize>,
    pub(crate) prune_threshold: P,
}

impl<P: Precision> QuantumRegister<P> {
    /// Allocate a register over `width` qubits with no amplitude anywhere. Call `set` before use.
    pub fn new(width: usize) -> RegisterResult<Self> {
        if width == 0 || width > MAX_WIDTH {
            return Err(RegisterError::InvalidWidth { width });
        }
        Ok(Self {
            width,
            states: vec![],
            scratch_start: None,
            prune_threshold: from_f64(DEFAULT_PRUNE_THRESHOLD),
        })
    }

    /// Use a different pruning threshold on squared magnitudes.
    pub fn with_prune_threshold(mut self, threshold: P) -> Self {
        self.prune_threshold = threshold;
        self
    }

    /// Total number of qubits, scratch included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// First scratch qubit, if a scratch region is allocated.
    pub fn scratch_start(&self) -> Option<usize> {
        self.scratch_start
    }

    /// Number of qubits below the scratch region.
    pub fn input_width(&self) -> usize {
        self.scratch_start.unwrap_or(self.width)
    }

    /// Number of stored (nonzero) basis states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Stored basis states, sorted by index.
    pub fn states(&self) -> &[(usize, Complex<P>)] {
        &self.states
    }

    /// Amplitude of `index`, zero if it isn't stored.
    pub fn amplitude(&self, index: usize) -> Complex<P> {
        self.states
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.states[pos].1)
            .unwrap_or_else(|_| Complex::zero())
    }

    /// Probability of measuring `index`.
    pub fn probability(&self, index: usize) -> P {
        self.amplitude(index).norm_sqr()
    }

    /// Sum of squared magnitudes over all stored states.
    pub fn total_probability(&self) -> P {
        iter!(self.states).map(|(_, v)| v.norm_sqr()).sum()
    }

    pub(crate) fn dimension(&self) -> usize {
        1 << self.width
    }

    /// Collapse the register onto basis state `index` with amplitude 1.
    pub fn set(&mut self, index: usize) -> RegisterResult<()> {
        let limit = self.dimension();
        if index >= limit {
            return Err(RegisterError::OutOfRange { index, limit });
        }
        self.states = vec![(index, Complex::one())];
        Ok(())
    }

    /// Apply `op` to every stored state, merging states which land on the same index.
    ///
    /// The matrix is not checked for unitarity outside debug builds.
    pub fn apply(&mut self, op: &Unitary<P>) -> RegisterResult<()> {
        op.validate(self.width)?;
        debug_assert!(
            op.is_unitary(from_f64(1e-6)),
            "non-unitary matrix applied: {:?}",
            op
        );
        let (controls, targets, matrix) = op.flatten();
        let k = targets.len();
        let dim = 1usize << k;

        let f = |(index, val): &(usize, Complex<P>)| -> Vec<(usize, Complex<P>)> {
            if !controls.iter().all(|c| get_bit(*index, *c)) {
                return vec![(*index, *val)];
            }
            let col = targets
                .iter()
                .fold(0, |acc, t| (acc << 1) | usize::from(get_bit(*index, *t)));
            (0..dim)
                .filter_map(|row| {
                    let m = matrix[row * dim + col];
                    if m.is_zero() {
                        None
                    } else {
                        let full_row = targets.iter().enumerate().fold(*index, |acc, (j, t)| {
                            set_bit(acc, *t, get_bit(row, k - 1 - j))
                        });
                        Some((full_row, m * *val))
                    }
                })
                .collect()
        };
        let flat: Vec<_> = iter!(self.states).map(f).flatten().collect();
        let threshold = self.prune_threshold;
        let mut states = consolidate_vec(flat);
        states.retain(|(_, v)| v.norm_sqr() > threshold);
        self.states = states;
        trace!(op = ?op, states = self.states.len(), "applied gate");
        Ok(())
    }

    /// Apply a named single qubit gate.
    pub fn apply_gate(&mut self, gate: OneQubitGate, target: usize) -> RegisterResult<()> {
        self.apply(&Unitary::one(gate, target))
    }

    /// Apply a named two qubit gate, `a` being the most significant bit of the matrix index.
    pub fn apply_two_qubit_gate(
        &mut self,
        gate: TwoQubitGate,
        a: usize,
        b: usize,
    ) -> RegisterResult<()> {
        self.apply(&Unitary::two(gate, a, b))
    }

    /// Apply an arbitrary 2x2 matrix to `target`.
    pub fn apply_matrix2(&mut self, target: usize, matrix: Matrix2<P>) -> RegisterResult<()> {
        self.apply(&Unitary::Single { target, matrix })
    }

    /// Apply an arbitrary 4x4 matrix to `a` and `b`.
    pub fn apply_matrix4(&mut self, a: usize, b: usize, matrix: Matrix4<P>) -> RegisterResult<()> {
        self.apply(&Unitary::Double {
            targets: [a, b],
            matrix,
        })
    }

    /// Pauli X on `q`.
    pub fn pauli_x(&mut self, q: usize) -> RegisterResult<()> {
        self.apply_gate(OneQubitGate::PauliX, q)
    }

    /// Pauli Y on `q`.
    pub fn pauli_y(&mut self, q: usize) -> RegisterResult<()> {
        self.apply_gate(OneQubitGate::PauliY, q)
    }

    /// Pauli Z on `q`.
    pub fn pauli_z(&mut self, q: usize) -> RegisterResult<()> {
        self.apply_gate(OneQubitGate::PauliZ, q)
    }

    /// Hadamard on `q`.
    pub fn hadamard(&mut self, q: usize) -> RegisterResult<()> {
        self.apply_gate(OneQubitGate::Hadamard, q)
    }

    /// Phase (S) gate on `q`.
    pub fn phase(&mut self, q: usize) -> RegisterResult<()> {
        self.apply_gate(OneQubitGate::Phase, q)
    }

    /// pi/8 (T) gate on `q`.
    pub fn pi_over_eight(&mut self, q: usize) -> RegisterResult<()> {
        self.apply_gate(OneQubitGate::PiOverEight, q)
    }

    /// `diag(1, e^{i theta})` on `q`.
    pub fn phase_shift(&mut self, q: usize, theta: f64) -> RegisterResult<()> {
        self.apply_gate(OneQubitGate::PhaseShift(theta), q)
    }

    /// Swap qubits `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> RegisterResult<()> {
        self.apply_two_qubit_gate(TwoQubitGate::Swap, a, b)
    }

    /// Flip `target` wherever `control` is set.
    pub fn controlled_not(&mut self, control: usize, target: usize) -> RegisterResult<()> {
        self.apply_two_qubit_gate(TwoQubitGate::ControlledNot, control, target)
    }

    /// Phase shift `target` by `theta` wherever `control` is set.
    pub fn controlled_phase_shift(
        &mut self,
        control: usize,
        target: usize,
        theta: f64,
    ) -> RegisterResult<()> {
        self.apply(&Unitary::one(OneQubitGate::PhaseShift(theta), target).controlled(control))
    }

    /// Hadamard on every qubit.
    pub fn hadamard_all(&mut self) -> RegisterResult<()> {
        (0..self.width).try_for_each(|q| self.hadamard(q))
    }

    /// Drop entries at or below the pruning threshold.
    pub fn trim(&mut self) {
        let threshold = self.prune_threshold;
        self.states.retain(|(_, v)| v.norm_sqr() > threshold);
    }

    /// True when the total probability is within `NORMALIZATION_TOLERANCE` of one.
    pub fn check_normalization(&self) -> bool {
        let total = self.total_probability().to_f64().unwrap_or(f64::NAN);
        (total - 1.0).abs() < NORMALIZATION_TOLERANCE
    }

    /// Per-entry sanity checks: indices strictly increasing and in range, amplitudes finite,
    /// not above one, and not below the pruning threshold.
    pub fn weak_check_amplitudes(&self) -> bool {
        let limit = self.dimension();
        let max_prob = P::one() + from_f64(NORMALIZATION_TOLERANCE);
        let ordered = self.states.windows(2).all(|w| w[0].0 < w[1].0);
        ordered
            && self.states.iter().all(|(index, v)| {
                let p = v.norm_sqr();
                *index < limit
                    && v.re.is_finite()
                    && v.im.is_finite()
                    && p <= max_prob
                    && p > self.prune_threshold
            })
    }

    /// Error unless `check_normalization` passes.
    pub(crate) fn ensure_normalized(&self) -> RegisterResult<()> {
        if self.check_normalization() {
            Ok(())
        } else {
            Err(RegisterError::NormalizationError {
                total: self.total_probability().to_f64().unwrap_or(f64::NAN),
            })
        }
    }

    /// Expand into a dense vector of `2^width` amplitudes. Only sensible for small registers.
    pub fn to_dense(&self, order: Representation) -> Vec<Complex<P>> {
        let mut dense = vec![Complex::zero(); self.dimension()];
        self.states.iter().for_each(|(index, val)| {
            let index = match order {
                Representation::LittleEndian => *index,
                Representation::BigEndian => flip_bits(self.width, *index),
            };
            dense[index] = *val;
        });
        dense
    }
}

impl<P: Precision> fmt::Display for QuantumRegister<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.scratch_start {
            Some(s) => writeln!(
                f,
                "QuantumRegister[width={}, scratch={}..{}, states={}]",
                self.width,
                s,
                self.width,
                self.states.len()
            )?,
            None => writeln!(
                f,
                "QuantumRegister[width={}, states={}]",
                self.width,
                self.states.len()
            )?,
        }
        let width = self.width;
        self.states.iter().try_for_each(|(index, val)| {
            writeln!(
                f,
                "  |{:0width$b}> {:+.6}{:+.6}i (p={:.6})",
                index,
                val.re,
                val.im,
                val.norm_sqr(),
                width = width
            )
        })
    }
}

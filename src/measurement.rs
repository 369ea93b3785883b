#[cfg(feature = "parallel")]
pub(crate) use rayon::prelude::*;

use crate::errors::{RegisterError, RegisterResult};
use crate::register::QuantumRegister;
use crate::types::from_f64;
use crate::utils::extract_bits;
use crate::{Complex, Precision};
use num_traits::One;
use rand::Rng;
use tracing::debug;

/// Total squared magnitude of a sparse state.
pub(crate) fn sparse_prob_magnitude<P: Precision>(state: &[(usize, Complex<P>)]) -> P {
    iter!(state).map(|(_, v)| v.norm_sqr()).sum()
}

/// Pick the position of an entry in `state` with chance proportional to its squared magnitude.
/// `None` only for an empty state.
pub(crate) fn sample_entry<P: Precision, R: Rng>(
    state: &[(usize, Complex<P>)],
    rng: &mut R,
) -> Option<usize> {
    let mut r = from_f64::<P>(rng.gen::<f64>()) * sparse_prob_magnitude(state);
    for (i, (_, c)) in state.iter().enumerate() {
        r -= c.norm_sqr();
        if r <= P::zero() {
            return Some(i);
        }
    }
    // Rounding can leave a sliver of `r` after the last entry.
    state.len().checked_sub(1)
}

/// Probability that the bits at `indices` read `measured` (bits in `indices` order).
pub(crate) fn sparse_measure_prob<P: Precision>(
    measured: usize,
    indices: &[usize],
    state: &[(usize, Complex<P>)],
) -> P {
    let f = |(indx, v): &(usize, Complex<P>)| -> Option<P> {
        if extract_bits(*indx, indices) == measured {
            Some(v.norm_sqr())
        } else {
            None
        }
    };
    iter!(state).filter_map(f).sum()
}

/// Keep the states consistent with `measured` and rescale them by `1/sqrt(measured_prob)`.
fn sparse_measure_state<P: Precision>(
    indices: &[usize],
    measured: (usize, P),
    state: Vec<(usize, Complex<P>)>,
) -> Vec<(usize, Complex<P>)> {
    let (m, measured_prob) = measured;
    let p_mult = P::one() / measured_prob.sqrt();
    let f = |(indx, v): (usize, Complex<P>)| -> Option<(usize, Complex<P>)> {
        if extract_bits(indx, indices) == m {
            Some((indx, v * p_mult))
        } else {
            None
        }
    };
    // Filtering preserves order, so the result stays sorted.
    into_iter!(state).filter_map(f).collect()
}

impl<P: Precision> QuantumRegister<P> {
    /// Measure every qubit: sample a basis state by squared magnitude, collapse onto it and
    /// return its index.
    ///
    /// Fails with `NormalizationError`, leaving the register untouched, if the total
    /// probability has drifted from one. Zero is a valid outcome.
    pub fn measure_and_collapse<R: Rng>(&mut self, rng: &mut R) -> RegisterResult<usize> {
        self.ensure_normalized()?;
        let pos = sample_entry(&self.states, rng).ok_or(RegisterError::NormalizationError {
            total: 0.0,
        })?;
        let (index, val) = self.states[pos];
        debug!(index, probability = ?val.norm_sqr(), "measured register");
        self.states = vec![(index, Complex::one())];
        Ok(index)
    }

    /// Measure the qubits at `indices`, returning the bits read (in `indices` order) and the
    /// probability of that outcome. The remaining states are renormalized.
    pub fn measure_qubits<R: Rng>(
        &mut self,
        indices: &[usize],
        rng: &mut R,
    ) -> RegisterResult<(usize, P)> {
        self.check_qubits(indices)?;
        let pos = sample_entry(&self.states, rng).ok_or(RegisterError::NormalizationError {
            total: 0.0,
        })?;
        let m = extract_bits(self.states[pos].0, indices);
        let p = sparse_measure_prob(m, indices, &self.states);
        let states = std::mem::take(&mut self.states);
        self.states = sparse_measure_state(indices, (m, p), states);
        debug!(?indices, measured = m, probability = ?p, "measured qubits");
        Ok((m, p))
    }

    /// Probability that the qubits at `indices` read `measured`, without disturbing the state.
    pub fn measure_prob(&self, indices: &[usize], measured: usize) -> RegisterResult<P> {
        self.check_qubits(indices)?;
        Ok(sparse_measure_prob(measured, indices, &self.states))
    }

    /// Probability of every outcome of measuring `indices`, indexed by the bits read.
    pub fn measure_probs(&self, indices: &[usize]) -> RegisterResult<Vec<P>> {
        self.check_qubits(indices)?;
        let mut probs = vec![P::zero(); 1 << indices.len()];
        self.states.iter().for_each(|(indx, v)| {
            probs[extract_bits(*indx, indices)] += v.norm_sqr();
        });
        Ok(probs)
    }

    fn check_qubits(&self, indices: &[usize]) -> RegisterResult<()> {
        if let Some(q) = indices.iter().find(|q| **q >= self.width) {
            return Err(RegisterError::OutOfRange {
                index: *q,
                limit: self.width,
            });
        }
        let distinct = indices
            .iter()
            .enumerate()
            .all(|(i, a)| indices[i + 1..].iter().all(|b| a != b));
        if distinct {
            Ok(())
        } else {
            Err(RegisterError::InvalidTargets(format!(
                "measured qubits {:?} are not distinct",
                indices
            )))
        }
    }
}

#[cfg(test)]
mod measurement_tests {
    use super::*;
    use crate::utils::from_reals;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_state<P: Precision>(indices: &[usize], reals: &[P]) -> Vec<(usize, Complex<P>)> {
        let cs = from_reals(reals);
        indices.iter().cloned().zip(cs.into_iter()).collect()
    }

    #[test]
    fn test_measure_state() {
        let m = 0;
        let state = make_state(&[0, 1, 2, 3], &[0.5, 0.5, 0.5, 0.5]);
        let p = sparse_measure_prob(m, &[0], &state);
        assert!((p - 0.5f64).abs() < f64::EPSILON);

        let output = sparse_measure_state(&[0], (m, p), state);
        let half = 0.5f64.sqrt();
        assert_eq!(output.len(), 2);
        assert_eq!(output[0].0, 0);
        assert_eq!(output[1].0, 2);
        assert!((output[0].1.re - half).abs() < 1e-10);
    }

    #[test]
    fn test_measure_probs() -> RegisterResult<()> {
        let mut r = QuantumRegister::<f64>::new(2)?;
        r.set(0)?;
        r.hadamard(1)?;
        let probs = r.measure_probs(&[1])?;
        assert!((probs[0] - 0.5).abs() < 1e-10);
        assert!((probs[1] - 0.5).abs() < 1e-10);
        let probs = r.measure_probs(&[0])?;
        assert!((probs[0] - 1.0).abs() < 1e-10);
        assert_eq!(probs[1], 0.0);
        assert!(r.measure_probs(&[2]).is_err());
        assert!(r.measure_probs(&[1, 1]).is_err());
        Ok(())
    }

    #[test]
    fn test_sample_entry_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty: Vec<(usize, Complex<f64>)> = vec![];
        assert_eq!(sample_entry(&empty, &mut rng), None);
        let single = make_state(&[5], &[1.0f64]);
        assert_eq!(sample_entry(&single, &mut rng), Some(0));
    }

    #[test]
    fn test_measure_rejects_unnormalized() -> RegisterResult<()> {
        let mut rng = StdRng::seed_from_u64(3);
        let mut r = QuantumRegister::<f64>::new(2)?;
        assert!(matches!(
            r.measure_and_collapse(&mut rng),
            Err(RegisterError::NormalizationError { .. })
        ));
        r.states = make_state(&[0, 1], &[0.5, 0.5]);
        assert!(matches!(
            r.measure_and_collapse(&mut rng),
            Err(RegisterError::NormalizationError { .. })
        ));
        assert_eq!(r.num_states(), 2);
        Ok(())
    }

    #[test]
    fn test_partial_measure_bell_pair() -> RegisterResult<()> {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            let mut r = QuantumRegister::<f64>::new(2)?;
            r.set(0)?;
            r.hadamard(0)?;
            r.controlled_not(0, 1)?;
            let (m, p) = r.measure_qubits(&[0], &mut rng)?;
            assert!((p - 0.5).abs() < 1e-10);
            let expected = if m == 1 { 0b11 } else { 0b00 };
            assert_eq!(r.num_states(), 1);
            assert!((r.probability(expected) - 1.0).abs() < 1e-10);
        }
        Ok(())
    }
}

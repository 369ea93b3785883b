use crate::errors::{RegisterError, RegisterResult};
use crate::register::QuantumRegister;
use crate::Precision;
use std::f64::consts::PI;
use std::ops::Range;
use tracing::debug;

fn check_range<P: Precision>(r: &QuantumRegister<P>, qubits: &Range<usize>) -> RegisterResult<()> {
    if qubits.start >= qubits.end {
        Err(RegisterError::InvalidTargets(format!(
            "empty qubit range {:?}",
            qubits
        )))
    } else if qubits.end > r.width() {
        Err(RegisterError::OutOfRange {
            index: qubits.end - 1,
            limit: r.width(),
        })
    } else {
        Ok(())
    }
}

/// Applies a quantum fourier transform to the qubits in `qubits`, reading them as an integer
/// with `qubits.start` as the least significant bit:
/// `|x> -> 2^{-m/2} sum_y e^{2 pi i x y / 2^m} |y>`.
///
/// Qubits outside the range are left alone.
pub fn qft<P: Precision>(r: &mut QuantumRegister<P>, qubits: Range<usize>) -> RegisterResult<()> {
    check_range(r, &qubits)?;
    for t in qubits.clone().rev() {
        r.hadamard(t)?;
        for c in (qubits.start..t).rev() {
            r.controlled_phase_shift(c, t, PI / 2f64.powi((t - c) as i32))?;
        }
    }
    reverse_qubits(r, &qubits)?;
    debug!(?qubits, states = r.num_states(), "applied qft");
    Ok(())
}

/// Undoes `qft` on the same range.
pub fn inverse_qft<P: Precision>(
    r: &mut QuantumRegister<P>,
    qubits: Range<usize>,
) -> RegisterResult<()> {
    check_range(r, &qubits)?;
    reverse_qubits(r, &qubits)?;
    for t in qubits.clone() {
        for c in qubits.start..t {
            r.controlled_phase_shift(c, t, -PI / 2f64.powi((t - c) as i32))?;
        }
        r.hadamard(t)?;
    }
    debug!(?qubits, states = r.num_states(), "applied inverse qft");
    Ok(())
}

fn reverse_qubits<P: Precision>(
    r: &mut QuantumRegister<P>,
    qubits: &Range<usize>,
) -> RegisterResult<()> {
    let m = qubits.len();
    (0..m / 2).try_for_each(|i| r.swap(qubits.start + i, qubits.end - 1 - i))
}

#[cfg(test)]
mod qfft_tests {
    use super::*;
    use crate::Complex;

    fn assert_amplitudes(r: &QuantumRegister<f64>, expected: &[Complex<f64>], shift: usize) {
        expected.iter().enumerate().for_each(|(y, e)| {
            let a = r.amplitude(y << shift);
            assert!((a - e).norm() < 1e-10, "y={}: {} vs {}", y, a, e);
        });
    }

    fn dft_column(m: usize, x: usize) -> Vec<Complex<f64>> {
        let dim = 1 << m;
        let norm = (dim as f64).sqrt().recip();
        (0..dim)
            .map(|y| {
                let theta = 2.0 * PI * ((x * y) % dim) as f64 / dim as f64;
                Complex::from_polar(norm, theta)
            })
            .collect()
    }

    #[test]
    fn test_qft_matches_dft() -> RegisterResult<()> {
        for m in 1..5 {
            for x in 0..1 << m {
                let mut r = QuantumRegister::<f64>::new(m)?;
                r.set(x)?;
                qft(&mut r, 0..m)?;
                assert_amplitudes(&r, &dft_column(m, x), 0);
                assert!(r.check_normalization());
            }
        }
        Ok(())
    }

    #[test]
    fn test_qft_subrange_leaves_spectators() -> RegisterResult<()> {
        // Qubit 0 is a spectator set to 1, qubits 1..4 hold x = 0b101.
        let mut r = QuantumRegister::<f64>::new(4)?;
        r.set(0b1011)?;
        qft(&mut r, 1..4)?;
        let expected = dft_column(3, 0b101);
        expected.iter().enumerate().for_each(|(y, e)| {
            let a = r.amplitude((y << 1) | 1);
            assert!((a - e).norm() < 1e-10);
        });
        assert!(r.states().iter().all(|(index, _)| index & 1 == 1));
        Ok(())
    }

    #[test]
    fn test_periodic_state_peaks() -> RegisterResult<()> {
        // Uniform over multiples of 4 in 4 qubits, period 4 -> peaks at multiples of 16/4.
        let mut r = QuantumRegister::<f64>::new(4)?;
        r.set(0)?;
        r.hadamard(2)?;
        r.hadamard(3)?;
        qft(&mut r, 0..4)?;
        let peaks: Vec<usize> = r.states().iter().map(|(i, _)| *i).collect();
        assert_eq!(peaks, vec![0, 4, 8, 12]);
        Ok(())
    }

    #[test]
    fn test_inverse_undoes_qft() -> RegisterResult<()> {
        let mut r = QuantumRegister::<f64>::new(5)?;
        r.set(0b10110)?;
        r.hadamard(0)?;
        let before = r.states().to_vec();
        qft(&mut r, 0..5)?;
        inverse_qft(&mut r, 0..5)?;
        assert_eq!(r.num_states(), before.len());
        before.iter().for_each(|(index, v)| {
            assert!((r.amplitude(*index) - v).norm() < 1e-10);
        });
        Ok(())
    }

    #[test]
    fn test_bad_ranges() -> RegisterResult<()> {
        let mut r = QuantumRegister::<f64>::new(3)?;
        r.set(0)?;
        assert!(matches!(
            qft(&mut r, 2..2),
            Err(RegisterError::InvalidTargets(_))
        ));
        assert_eq!(
            qft(&mut r, 1..4),
            Err(RegisterError::OutOfRange { index: 3, limit: 3 })
        );
        Ok(())
    }
}

extern crate shor_sim;

use rand::rngs::StdRng;
use rand::SeedableRng;
use shor_sim::arithmetic::exp_mod;
use shor_sim::prelude::*;

fn assert_almost_eq(a: f64, b: f64, prec: i32) {
    let mult = 10.0f64.powi(prec);
    let (a, b) = (a * mult, b * mult);
    let (a, b) = (a.round(), b.round());
    assert_eq!(a / mult, b / mult);
}

fn assert_invariants(r: &QuantumRegister<f64>) {
    assert!(r.check_normalization(), "total {}", r.total_probability());
    assert!(r.weak_check_amplitudes());
    assert!(r.states().windows(2).all(|w| w[0].0 < w[1].0));
}

#[test]
fn test_invariants_through_circuit() -> RegisterResult<()> {
    let mut r = QuantumRegister::<f64>::new(4)?;
    r.set(0b0110)?;
    assert_invariants(&r);
    r.hadamard_all()?;
    assert_invariants(&r);
    assert_eq!(r.num_states(), 16);
    r.phase(2)?;
    assert_invariants(&r);
    r.controlled_not(0, 3)?;
    assert_invariants(&r);
    r.pi_over_eight(1)?;
    assert_invariants(&r);
    r.swap(1, 2)?;
    assert_invariants(&r);
    qft(&mut r, 0..4)?;
    assert_invariants(&r);
    inverse_qft(&mut r, 0..4)?;
    assert_invariants(&r);
    Ok(())
}

#[test]
fn test_merge_collapses_interference() -> RegisterResult<()> {
    // H H = I, the |1> branches cancel exactly and must be removed.
    let mut r = QuantumRegister::<f64>::new(3)?;
    r.set(0b101)?;
    r.hadamard(1)?;
    assert_eq!(r.num_states(), 2);
    r.hadamard(1)?;
    assert_eq!(r.num_states(), 1);
    assert_almost_eq(r.probability(0b101), 1.0, 10);
    Ok(())
}

#[test]
fn test_uniform_superposition() -> RegisterResult<()> {
    let n = 6;
    let mut r = QuantumRegister::<f64>::new(n)?;
    r.set(0)?;
    r.hadamard_all()?;
    assert_eq!(r.num_states(), 1 << n);
    r.states().iter().enumerate().for_each(|(i, (index, v))| {
        assert_eq!(i, *index);
        assert_almost_eq(v.re, 0.125, 10);
    });
    Ok(())
}

#[test]
fn test_scratch_round_trip() -> RegisterResult<()> {
    let mut r = QuantumRegister::<f64>::new(3)?;
    r.set(0)?;
    r.hadamard(0)?;
    r.hadamard(2)?;
    let before = r.states().to_vec();
    r.add_scratch(5)?;
    assert_invariants(&r);
    assert_eq!(r.input_width(), 3);
    r.clear_scratch()?;
    assert_eq!(r.states(), before.as_slice());
    assert_eq!(r.width(), 3);
    Ok(())
}

#[test]
fn test_embed_modexp_all_inputs() -> RegisterResult<()> {
    for &(x, n) in &[(2u64, 15u64), (7, 15), (8, 15), (2, 21), (5, 21)] {
        let width = 5;
        let scratch = 5;
        let mut r = QuantumRegister::<f64>::new(width)?;
        r.set(0)?;
        r.hadamard_all()?;
        r.add_scratch(scratch)?;
        r.embed_modexp(x, n)?;
        assert_invariants(&r);
        assert_eq!(r.num_states(), 1 << width);

        r.states().iter().for_each(|(index, v)| {
            let a = index & ((1 << width) - 1);
            let y = index >> width;
            assert_eq!(y as u64, exp_mod(x, a as u64, n));
            assert_almost_eq(v.norm_sqr(), 1.0 / 32.0, 10);
        });

        // The output is a function of the input so the scratch can be dropped.
        r.clear_scratch()?;
        assert_invariants(&r);
        assert_eq!(r.num_states(), 1 << width);
    }
    Ok(())
}

#[test]
fn test_collapse_after_embedding_leaves_period() -> RegisterResult<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let (x, n) = (7u64, 15u64);
    let mut r = QuantumRegister::<f64>::new(8)?;
    r.set(0)?;
    r.hadamard_all()?;
    r.add_scratch(4)?;
    r.embed_modexp(x, n)?;
    let y = r.collapse_scratch(&mut rng)? as u64;
    assert_invariants(&r);

    // 7 has order 4 mod 15, 256 / 4 inputs survive.
    assert_eq!(r.num_states(), 64);
    r.states().iter().for_each(|(a, _)| {
        assert_eq!(exp_mod(x, *a as u64, n), y);
    });
    Ok(())
}

#[test]
fn test_measurement_frequencies() -> RegisterResult<()> {
    let mut rng = StdRng::seed_from_u64(1234);
    // Amplitudes cos(pi/8), sin(pi/8) on qubit 0, uniform on qubit 1.
    let theta = std::f64::consts::PI / 8.0;
    let (s, c) = theta.sin_cos();
    let rot = [
        Complex::new(c, 0.0),
        Complex::new(-s, 0.0),
        Complex::new(s, 0.0),
        Complex::new(c, 0.0),
    ];

    let trials = 4000;
    let mut counts = [0usize; 4];
    for _ in 0..trials {
        let mut r = QuantumRegister::<f64>::new(2)?;
        r.set(0)?;
        r.apply_matrix2(0, rot)?;
        r.hadamard(1)?;
        counts[r.measure_and_collapse(&mut rng)?] += 1;
        assert_eq!(r.num_states(), 1);
    }

    let expected = [c * c / 2.0, s * s / 2.0, c * c / 2.0, s * s / 2.0];
    counts.iter().zip(expected.iter()).for_each(|(n, p)| {
        let freq = *n as f64 / trials as f64;
        assert!((freq - p).abs() < 0.03, "{} vs {}", freq, p);
    });
    Ok(())
}

#[test]
fn test_single_precision() -> RegisterResult<()> {
    let mut r = QuantumRegister::<f32>::new(4)?;
    r.set(0)?;
    r.hadamard_all()?;
    qft(&mut r, 0..4)?;
    assert!(r.check_normalization());
    // QFT of the uniform state is |0>.
    assert!((r.probability(0) - 1.0).abs() < 1e-4);
    Ok(())
}

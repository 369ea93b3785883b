extern crate shor_sim;

use rand::rngs::StdRng;
use rand::SeedableRng;
use shor_sim::prelude::*;
use shor_sim::shor::period_to_factors;

#[test]
fn test_fifteen_single_runs() -> RegisterResult<()> {
    let mut rng = StdRng::seed_from_u64(15);
    let mut found = 0;
    for _ in 0..12 {
        match run_circuit(15, 8, ScratchPolicy::Collapse, &mut rng)? {
            ShorOutcome::Factors(a, b) => {
                assert_eq!(a * b, 15);
                assert!(a == 3 || a == 5);
                found += 1;
            }
            ShorOutcome::MeasuredZero => {}
            outcome => panic!("unexpected outcome {:?}", outcome),
        }
    }
    assert!(found > 0);
    Ok(())
}

#[test]
fn test_clear_policy_measures_zero() -> RegisterResult<()> {
    // Without the scratch measurement every input is equally likely and the
    // QFT maps the uniform state onto zero.
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..3 {
        assert_eq!(
            run_circuit(15, 8, ScratchPolicy::Clear, &mut rng)?,
            ShorOutcome::MeasuredZero
        );
    }
    Ok(())
}

#[test]
fn test_trivial_witness() -> RegisterResult<()> {
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(
        run_circuit(15, 10, ScratchPolicy::Collapse, &mut rng)?,
        ShorOutcome::TrivialFactor(5)
    );
    Ok(())
}

#[test]
fn test_factor_fifteen() -> RegisterResult<()> {
    let mut rng = StdRng::seed_from_u64(99);
    let config = ShorConfig::new(15).with_witness(8).with_max_attempts(30);
    let (a, b) = factor(&config, &mut rng)?.expect("no factors found");
    let mut fs = [a, b];
    fs.sort_unstable();
    assert_eq!(fs, [3, 5]);

    let config = ShorConfig::new(15).with_max_attempts(30);
    let (a, b) = factor(&config, &mut rng)?.expect("no factors found");
    assert_eq!(a * b, 15);
    assert!(a > 1 && b > 1);
    Ok(())
}

#[test]
fn test_factor_twenty_one() -> RegisterResult<()> {
    let mut rng = StdRng::seed_from_u64(21);
    let config = ShorConfig::new(21).with_witness(2).with_max_attempts(30);
    let (a, b) = factor(&config, &mut rng)?.expect("no factors found");
    let mut fs = [a, b];
    fs.sort_unstable();
    assert_eq!(fs, [3, 7]);
    Ok(())
}

#[test]
fn test_peaks_give_factors() {
    // Every nonzero peak of the N = 15, x = 8 circuit over 8 qubits.
    [64u64, 128, 192].iter().for_each(|m| match period_to_factors(15, 8, *m, 8) {
        ShorOutcome::Factors(a, b) => assert_eq!(a * b, 15),
        outcome => panic!("{}: {:?}", m, outcome),
    });
}

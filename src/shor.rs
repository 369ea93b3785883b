//! Shor's factoring algorithm on top of the sparse register.

use crate::arithmetic::{exp_mod, gcd};
use crate::continued_fraction::continued_fraction;
use crate::errors::{RegisterError, RegisterResult};
use crate::qfft::qft;
use crate::register::{QuantumRegister, MAX_WIDTH};
use crate::scratch::ScratchPolicy;
use crate::utils::qubits_required;
use rand::Rng;
use tracing::{debug, info, trace, warn};

/// Settings for a factoring run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShorConfig {
    /// Number to factor.
    pub n: u64,
    /// Fixed witness `x`, drawn at random for each attempt when `None`.
    pub witness: Option<u64>,
    /// How the modular exponentiation output is discarded before the QFT.
    pub scratch_policy: ScratchPolicy,
    /// Number of circuit runs before giving up.
    pub max_attempts: usize,
}

impl ShorConfig {
    /// Defaults: random witness, collapse the scratch region, 10 attempts.
    pub fn new(n: u64) -> Self {
        Self {
            n,
            witness: None,
            scratch_policy: ScratchPolicy::default(),
            max_attempts: 10,
        }
    }

    /// Always use `x` as the witness.
    pub fn with_witness(mut self, x: u64) -> Self {
        self.witness = Some(x);
        self
    }

    /// Use `policy` to discard the scratch region.
    pub fn with_scratch_policy(mut self, policy: ScratchPolicy) -> Self {
        self.scratch_policy = policy;
        self
    }

    /// Run the circuit at most `attempts` times.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }
}

/// Result of a single run of the circuit. None of these are errors, most just mean the run
/// should be repeated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShorOutcome {
    /// Found `n = a * b` with both factors nontrivial.
    Factors(u64, u64),
    /// The witness already shares the factor with `n`.
    TrivialFactor(u64),
    /// The register measured zero, which carries no period information.
    MeasuredZero,
    /// The recovered period was odd.
    OddPeriod(u64),
    /// The period was even but gave only trivial factors.
    NoFactor {
        /// Candidate period.
        period: u64,
    },
}

/// Draw a witness in `[2, n)` coprime to `n`. Requires `n >= 3` and odd, so that 2 qualifies.
pub fn choose_witness<R: Rng>(n: u64, rng: &mut R) -> u64 {
    loop {
        let x = rng.gen_range(2..n);
        if gcd(x, n) == 1 {
            return x;
        }
    }
}

/// Turn a measured QFT outcome into factors of `n`.
///
/// `width` is the number of qubits the QFT ran over.
pub fn period_to_factors(n: u64, x: u64, measured: u64, width: usize) -> ShorOutcome {
    if measured == 0 {
        return ShorOutcome::MeasuredZero;
    }
    let denom = 1u64 << width;
    let mut period = match continued_fraction(measured, denom, n) {
        Some(frac) => *frac.denom(),
        None => return ShorOutcome::MeasuredZero,
    };
    debug!(measured, denom, period, "fractional approximation");

    if period % 2 == 1 && 2 * period < denom {
        debug!(period, "odd denominator, expanding by 2");
        period *= 2;
    }
    if period % 2 == 1 {
        return ShorOutcome::OddPeriod(period);
    }

    let f = exp_mod(x, period / 2, n);
    let factor = gcd(n, f + 1).max(gcd(n, (f + n - 1) % n));
    if factor > 1 && factor < n {
        ShorOutcome::Factors(factor, n / factor)
    } else {
        ShorOutcome::NoFactor { period }
    }
}

fn check_invariants(r: &QuantumRegister<f64>, step: &str) {
    if r.check_normalization() && r.weak_check_amplitudes() {
        debug!(step, states = r.num_states(), "register invariants hold");
    } else {
        warn!(
            step,
            total = r.total_probability(),
            "register invariants violated"
        );
    }
    trace!("{}", r);
}

/// Run the period finding circuit once for `n` with witness `x`.
pub fn run_circuit<R: Rng>(
    n: u64,
    x: u64,
    policy: ScratchPolicy,
    rng: &mut R,
) -> RegisterResult<ShorOutcome> {
    if n < 3 {
        return Err(RegisterError::InvalidModulus(n));
    }
    let g = gcd(x, n);
    if g > 1 {
        return Ok(ShorOutcome::TrivialFactor(g));
    }
    let n_squared = n.checked_mul(n).ok_or(RegisterError::InvalidModulus(n))?;
    let width = qubits_required(n_squared);
    let scratch = qubits_required(n);
    if width + scratch > MAX_WIDTH {
        return Err(RegisterError::InvalidWidth {
            width: width + scratch,
        });
    }
    info!(n, x, qubits = width + scratch, "running period finding circuit");

    let mut r = QuantumRegister::<f64>::new(width)?;
    r.set(0)?;
    check_invariants(&r, "set");
    r.hadamard_all()?;
    check_invariants(&r, "hadamard_all");
    r.add_scratch(scratch)?;
    r.embed_modexp(x, n)?;
    check_invariants(&r, "embed_modexp");
    r.release_scratch(policy, rng)?;
    check_invariants(&r, "release_scratch");
    qft(&mut r, 0..width)?;
    check_invariants(&r, "qft");

    let measured = r.measure_and_collapse(rng)?;
    let outcome = period_to_factors(n, x, measured as u64, width);
    info!(measured, ?outcome, "circuit finished");
    Ok(outcome)
}

/// Factor `n`, returning `Some((a, b))` with `a * b == n` or `None` if every attempt failed.
///
/// Normalization failures count as failed attempts. If the last attempt failed that way the
/// error is returned instead of `None`.
pub fn factor<R: Rng>(config: &ShorConfig, rng: &mut R) -> RegisterResult<Option<(u64, u64)>> {
    let n = config.n;
    if n < 4 {
        return Err(RegisterError::InvalidModulus(n));
    }
    if n % 2 == 0 {
        return Ok(Some((2, n / 2)));
    }

    let mut last_err = None;
    for attempt in 0..config.max_attempts {
        let x = config.witness.unwrap_or_else(|| choose_witness(n, rng));
        match run_circuit(n, x, config.scratch_policy, rng) {
            Ok(ShorOutcome::Factors(a, b)) => return Ok(Some((a, b))),
            Ok(ShorOutcome::TrivialFactor(g)) => return Ok(Some((g, n / g))),
            Ok(outcome) => {
                info!(attempt, ?outcome, "no factor, trying again");
                last_err = None;
            }
            Err(err @ RegisterError::NormalizationError { .. }) => {
                warn!(attempt, %err, "measurement failed, trying again");
                last_err = Some(err);
            }
            Err(err) => return Err(err),
        }
    }
    match last_err {
        Some(err) => Err(err),
        None => Ok(None),
    }
}

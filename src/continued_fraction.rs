//! Continued fraction approximation of a measured phase, used to turn a QFT measurement into a
//! candidate period.

use num_rational::Ratio;

/// Partial quotients `[a0; a1, a2, ...]` of `numerator / denominator`.
///
/// # Example
/// ```
/// use shor_sim::continued_fraction::partial_quotients;
/// assert_eq!(partial_quotients(3, 16), vec![0, 5, 3]);
/// assert_eq!(partial_quotients(0, 16), vec![0]);
/// ```
pub fn partial_quotients(numerator: u64, denominator: u64) -> Vec<u64> {
    let (mut n, mut d) = (numerator, denominator);
    let mut quotients = vec![];
    while d != 0 {
        quotients.push(n / d);
        let r = n % d;
        n = d;
        d = r;
    }
    quotients
}

/// Convergents `p_k / q_k` of the continued fraction with partial quotients `quotients`.
///
/// # Example
/// ```
/// use num_rational::Ratio;
/// use shor_sim::continued_fraction::convergents;
/// assert_eq!(
///     convergents(&[0, 5, 3]),
///     vec![Ratio::new(0, 1), Ratio::new(1, 5), Ratio::new(3, 16)]
/// );
/// ```
pub fn convergents(quotients: &[u64]) -> Vec<Ratio<u64>> {
    // (p_{k-1}, q_{k-1}) and (p_{k-2}, q_{k-2})
    let (mut p1, mut q1) = (1u64, 0u64);
    let (mut p2, mut q2) = (0u64, 1u64);
    quotients
        .iter()
        .map(|a| {
            let p = a * p1 + p2;
            let q = a * q1 + q2;
            p2 = p1;
            q2 = q1;
            p1 = p;
            q1 = q;
            // Convergents are always in lowest terms.
            Ratio::new_raw(p, q)
        })
        .collect()
}

/// True when `|p/q - measured/denom| < 1 / (2 denom)`.
fn close_enough(c: &Ratio<u64>, measured: u64, denom: u64) -> bool {
    let diff = i128::from(*c.numer()) * i128::from(denom) - i128::from(measured) * i128::from(*c.denom());
    2 * diff.abs() < i128::from(*c.denom())
}

/// Best rational approximation of `measured / denom` with denominator below `max_denominator`.
///
/// Walks the convergents and stops at the first one within `1 / (2 denom)` of the measured
/// phase, or at the last one whose denominator stays under `max_denominator`. The first
/// convergent is always accepted. `None` when `denom` is zero.
///
/// # Example
/// ```
/// use num_rational::Ratio;
/// use shor_sim::continued_fraction::continued_fraction;
/// assert_eq!(continued_fraction(3, 16, 15), Some(Ratio::new(1, 5)));
/// assert_eq!(continued_fraction(64, 256, 15), Some(Ratio::new(1, 4)));
/// ```
pub fn continued_fraction(measured: u64, denom: u64, max_denominator: u64) -> Option<Ratio<u64>> {
    if denom == 0 {
        return None;
    }
    let mut convergents = convergents(&partial_quotients(measured, denom)).into_iter();
    let mut best = convergents.next()?;
    if close_enough(&best, measured, denom) {
        return Some(best);
    }
    for c in convergents {
        if *c.denom() >= max_denominator {
            break;
        }
        best = c;
        if close_enough(&best, measured, denom) {
            break;
        }
    }
    Some(best)
}

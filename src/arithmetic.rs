//! Classical number theory and the embedding of classical functions into a register.

#[cfg(feature = "parallel")]
pub(crate) use rayon::prelude::*;

use crate::errors::{RegisterError, RegisterResult};
use crate::register::QuantumRegister;
use crate::utils::{bit_length, mask_for, qubits_required};
use crate::Precision;
use tracing::debug;

/// `base^exp mod modulus` by square and multiply. `modulus` must be nonzero.
///
/// # Example
/// ```
/// use shor_sim::arithmetic::exp_mod;
/// assert_eq!(exp_mod(8, 2, 15), 4);
/// assert_eq!(exp_mod(7, 0, 15), 1);
/// assert_eq!(exp_mod(7, 5, 1), 0);
/// ```
pub fn exp_mod(base: u64, exp: u64, modulus: u64) -> u64 {
    let m = u128::from(modulus);
    let mut result = 1u128 % m;
    let mut b = u128::from(base) % m;
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        e >>= 1;
    }
    // result < modulus so this always fits.
    result as u64
}

/// Greatest common divisor.
///
/// # Example
/// ```
/// use shor_sim::arithmetic::gcd;
/// assert_eq!(gcd(15, 9), 3);
/// assert_eq!(gcd(15, 0), 15);
/// ```
pub fn gcd(a: u64, b: u64) -> u64 {
    num_integer::gcd(a, b)
}

impl<P: Precision> QuantumRegister<P> {
    /// For every stored state with input bits `a` (the bits below the scratch region), XOR
    /// `f(a)` into the scratch bits. Applied to a freshly zeroed scratch region this writes
    /// `f(a)`, leaving the scratch bits a function of the input bits.
    ///
    /// Amplitudes are untouched. The map on basis states is a bijection so no states merge.
    pub fn apply_classical_function<F>(&mut self, f: F) -> RegisterResult<()>
    where
        F: Fn(u64) -> u64 + Send + Sync,
    {
        let start = self.scratch_start.ok_or(RegisterError::NoScratch)?;
        let available = self.width - start;
        let low_mask = mask_for(0..start);

        let g = |(index, val): &(usize, crate::Complex<P>)| {
            let a = (index & low_mask) as u64;
            let y = f(a);
            let needed = bit_length(y);
            if needed > available {
                Err(RegisterError::InsufficientScratch { needed, available })
            } else {
                // `needed <= available` and `width <= MAX_WIDTH`, so `y` fits in a usize.
                Ok((index ^ ((y as usize) << start), *val))
            }
        };
        let mut states = iter!(self.states)
            .map(g)
            .collect::<RegisterResult<Vec<_>>>()?;
        sort_unstable_by!(states, |(a, _), (b, _)| a.cmp(b));
        self.states = states;
        Ok(())
    }

    /// Write `x^a mod n` into the scratch bits of every state whose input bits are `a`.
    ///
    /// The scratch region must hold at least `qubits_required(n)` qubits.
    pub fn embed_modexp(&mut self, x: u64, n: u64) -> RegisterResult<()> {
        if n < 2 {
            return Err(RegisterError::InvalidModulus(n));
        }
        let start = self.scratch_start.ok_or(RegisterError::NoScratch)?;
        let needed = qubits_required(n);
        let available = self.width - start;
        if needed > available {
            return Err(RegisterError::InsufficientScratch { needed, available });
        }
        self.apply_classical_function(|a| exp_mod(x, a, n))?;
        debug!(x, n, states = self.states.len(), "embedded modular exponentiation");
        Ok(())
    }
}

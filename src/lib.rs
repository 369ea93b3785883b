#![forbid(unsafe_code)]
#![deny(
    missing_debug_implementations,
    unstable_features,
    unused_import_braces,
    missing_docs
)]

//! Sparse quantum register simulator with an implementation of Shor's factoring algorithm.
//!
//! A [`QuantumRegister`] stores only the basis states with nonzero amplitude, so circuits whose
//! states stay sparse (such as the period finding circuit in Shor's algorithm) can run on far
//! more qubits than a dense simulation would allow.
//!
//! # Example (Bell pair)
//! ```
//! use shor_sim::prelude::*;
//! use rand::SeedableRng;
//!
//! # fn main() -> RegisterResult<()> {
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let mut r = QuantumRegister::<f64>::new(2)?;
//! r.set(0)?;
//! r.hadamard(0)?;
//! r.controlled_not(0, 1)?;
//! assert_eq!(r.num_states(), 2);
//!
//! // Both qubits always agree.
//! let measured = r.measure_and_collapse(&mut rng)?;
//! assert!(measured == 0b00 || measured == 0b11);
//! # Ok(())
//! # }
//! ```
//!
//! # Example (factoring)
//! ```
//! use shor_sim::prelude::*;
//! use rand::SeedableRng;
//!
//! # fn main() -> RegisterResult<()> {
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let config = ShorConfig::new(15).with_max_attempts(20);
//! if let Some((a, b)) = factor(&config, &mut rng)? {
//!     assert_eq!(a * b, 15);
//! }
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod rayon_helper;

/// Number theory helpers and classical function embedding.
pub mod arithmetic;
/// Rational approximation of measured phases.
pub mod continued_fraction;
/// Error types.
pub mod errors;
/// Gate matrices and the unitary operations applied to registers.
pub mod gates;
/// Measurement of whole registers and qubit subsets.
pub mod measurement;
/// Quantum fourier transform over a range of qubits.
pub mod qfft;
/// The sparse register itself.
pub mod register;
pub mod scratch;
/// Shor's algorithm.
pub mod shor;
/// Precision and representation types.
pub mod types;
/// Bit manipulation helpers.
pub mod utils;

pub use num_complex::Complex;
pub use rand;
pub use types::*;

/// Commonly used types and functions.
pub mod prelude {
    pub use super::*;
    pub use crate::errors::*;
    pub use crate::gates::{OneQubitGate, TwoQubitGate, Unitary};
    pub use crate::qfft::{inverse_qft, qft};
    pub use crate::register::QuantumRegister;
    pub use crate::scratch::ScratchPolicy;
    pub use crate::shor::{factor, run_circuit, ShorConfig, ShorOutcome};
}

pub use register::QuantumRegister;

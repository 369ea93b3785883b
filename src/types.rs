use num_traits::{Float, NumAssign};
use std::fmt::{Debug, Display};
use std::iter::{Product, Sum};

/// The float precision of the register amplitudes.
pub trait Precision:
    Default + NumAssign + Float + Sum + Send + Sync + Display + Product + Debug
{
}

impl Precision for f64 {}

impl Precision for f32 {}

/// Order of qubits returned by `QuantumRegister::to_dense` and other similar methods.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Representation {
    /// Qubit with index 0 is the least significant index bit.
    LittleEndian,
    /// Qubit with index 0 is the most significant index bit.
    BigEndian,
}

/// Convert an `f64` constant into the register precision.
///
/// Conversion into `f32`/`f64` never fails, a NaN here would show up in the
/// amplitude checks rather than panicking.
#[inline]
pub(crate) fn from_f64<P: Precision>(v: f64) -> P {
    P::from(v).unwrap_or_else(P::nan)
}

use std::error::Error;
use std::fmt::{Display, Formatter};

/// An error from manipulating a quantum register.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterError {
    /// The requested number of qubits is zero or too large to index.
    InvalidWidth {
        /// Requested width.
        width: usize,
    },
    /// A basis index or qubit index lies outside the register.
    OutOfRange {
        /// Offending index.
        index: usize,
        /// Exclusive upper bound the index had to respect.
        limit: usize,
    },
    /// Gate targets overlap or are otherwise malformed.
    InvalidTargets(String),
    /// A scratch operation was requested but no scratch region exists.
    NoScratch,
    /// A second scratch region was requested while one is still allocated.
    ScratchAlreadyAllocated,
    /// Two entries share the same non-scratch bits, so dropping the scratch bits is ambiguous.
    ScratchNotDisentangled {
        /// The non-scratch index seen more than once.
        index: usize,
    },
    /// The scratch region is too narrow for the embedded function's output.
    InsufficientScratch {
        /// Bits required.
        needed: usize,
        /// Bits available.
        available: usize,
    },
    /// The modulus cannot be used for modular exponentiation or factoring.
    InvalidModulus(u64),
    /// Total probability drifted away from one.
    NormalizationError {
        /// Observed sum of squared magnitudes.
        total: f64,
    },
}

/// A result which may contain a register error.
pub type RegisterResult<T> = Result<T, RegisterError>;

impl Error for RegisterError {}

impl Display for RegisterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWidth { width } => write!(f, "invalid register width {}", width),
            Self::OutOfRange { index, limit } => {
                write!(f, "index {} out of range (limit {})", index, limit)
            }
            Self::InvalidTargets(msg) => write!(f, "invalid gate targets: {}", msg),
            Self::NoScratch => write!(f, "no scratch region allocated"),
            Self::ScratchAlreadyAllocated => write!(f, "scratch region already allocated"),
            Self::ScratchNotDisentangled { index } => write!(
                f,
                "scratch bits are not determined by the rest of the register (index {})",
                index
            ),
            Self::InsufficientScratch { needed, available } => write!(
                f,
                "scratch region holds {} qubits but {} are needed",
                available, needed
            ),
            Self::InvalidModulus(n) => write!(f, "invalid modulus {}", n),
            Self::NormalizationError { total } => {
                write!(f, "register not normalized (total probability {})", total)
            }
        }
    }
}

use crate::errors::{RegisterError, RegisterResult};
use crate::types::from_f64;
use crate::{Complex, Precision};
use num_traits::{One, Zero};
use smallvec::SmallVec;

/// Row-major 2x2 matrix acting on a single qubit.
pub type Matrix2<P> = [Complex<P>; 4];
/// Row-major 4x4 matrix acting on two qubits.
pub type Matrix4<P> = [Complex<P>; 16];

/// Named single qubit gates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OneQubitGate {
    /// Bit flip.
    PauliX,
    /// `[[0, -i], [i, 0]]`
    PauliY,
    /// Phase flip.
    PauliZ,
    /// Hadamard.
    Hadamard,
    /// `diag(1, i)`
    Phase,
    /// `diag(1, e^{i pi/4})`, the T gate.
    PiOverEight,
    /// `diag(1, e^{i theta})`
    PhaseShift(f64),
}

impl OneQubitGate {
    /// The unitary matrix of this gate.
    pub fn matrix<P: Precision>(&self) -> Matrix2<P> {
        let o = Complex::zero();
        let l = Complex::one();
        match self {
            OneQubitGate::PauliX => [o, l, l, o],
            OneQubitGate::PauliY => [o, -Complex::i(), Complex::i(), o],
            OneQubitGate::PauliZ => [l, o, o, -l],
            OneQubitGate::Hadamard => {
                let h = Complex::new(from_f64(std::f64::consts::FRAC_1_SQRT_2), P::zero());
                [h, h, h, -h]
            }
            OneQubitGate::Phase => [l, o, o, Complex::i()],
            OneQubitGate::PiOverEight => OneQubitGate::PhaseShift(std::f64::consts::FRAC_PI_4).matrix(),
            OneQubitGate::PhaseShift(theta) => {
                let (s, c) = theta.sin_cos();
                [l, o, o, Complex::new(from_f64(c), from_f64(s))]
            }
        }
    }
}

/// Named two qubit gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwoQubitGate {
    /// Exchange the two qubits.
    Swap,
    /// Flip the second target when the first is set.
    ControlledNot,
}

impl TwoQubitGate {
    /// The unitary matrix of this gate, the first target is the most significant bit of the
    /// row/column index.
    pub fn matrix<P: Precision>(&self) -> Matrix4<P> {
        let o = Complex::zero();
        let l = Complex::one();
        match self {
            TwoQubitGate::Swap => [
                l, o, o, o, //
                o, o, l, o, //
                o, l, o, o, //
                o, o, o, l,
            ],
            TwoQubitGate::ControlledNot => [
                l, o, o, o, //
                o, l, o, o, //
                o, o, o, l, //
                o, o, l, o,
            ],
        }
    }
}

/// A unitary transform bound to the qubits it acts on.
#[derive(Clone, Debug, PartialEq)]
pub enum Unitary<P: Precision> {
    /// A 2x2 matrix on `target`.
    Single {
        /// Qubit acted on.
        target: usize,
        /// Row-major matrix.
        matrix: Matrix2<P>,
    },
    /// A 4x4 matrix on `targets`, `targets[0]` is the most significant bit of the matrix index.
    Double {
        /// Qubits acted on.
        targets: [usize; 2],
        /// Row-major matrix.
        matrix: Matrix4<P>,
    },
    /// Applies `op` only to basis states whose `control` bit is set.
    Controlled {
        /// Control qubit.
        control: usize,
        /// Operation applied when the control is set.
        op: Box<Unitary<P>>,
    },
}

impl<P: Precision> Unitary<P> {
    /// Make a named single qubit gate on `target`.
    pub fn one(gate: OneQubitGate, target: usize) -> Self {
        Unitary::Single {
            target,
            matrix: gate.matrix(),
        }
    }

    /// Make a named two qubit gate on `a` and `b` (`a` is the most significant matrix bit).
    pub fn two(gate: TwoQubitGate, a: usize, b: usize) -> Self {
        Unitary::Double {
            targets: [a, b],
            matrix: gate.matrix(),
        }
    }

    /// Condition this op on `control`.
    pub fn controlled(self, control: usize) -> Self {
        Unitary::Controlled {
            control,
            op: Box::new(self),
        }
    }

    /// Decompose into (controls, targets, matrix data).
    pub(crate) fn flatten(&self) -> (SmallVec<[usize; 2]>, &[usize], &[Complex<P>]) {
        match self {
            Unitary::Single { target, matrix } => {
                (SmallVec::new(), std::slice::from_ref(target), &matrix[..])
            }
            Unitary::Double { targets, matrix } => (SmallVec::new(), &targets[..], &matrix[..]),
            Unitary::Controlled { control, op } => {
                let (mut controls, targets, matrix) = op.flatten();
                controls.push(*control);
                (controls, targets, matrix)
            }
        }
    }

    /// Qubits whose state may change under this op.
    pub fn targets(&self) -> &[usize] {
        self.flatten().1
    }

    /// Qubits which must be set for the op to act.
    pub fn controls(&self) -> SmallVec<[usize; 2]> {
        self.flatten().0
    }

    /// Check the op refers to distinct qubits below `width`.
    pub(crate) fn validate(&self, width: usize) -> RegisterResult<()> {
        let (controls, targets, _) = self.flatten();
        let all: SmallVec<[usize; 4]> = controls.iter().chain(targets.iter()).cloned().collect();
        if let Some(index) = all.iter().find(|q| **q >= width) {
            return Err(RegisterError::OutOfRange {
                index: *index,
                limit: width,
            });
        }
        let distinct = all
            .iter()
            .enumerate()
            .all(|(i, a)| all[i + 1..].iter().all(|b| a != b));
        if distinct {
            Ok(())
        } else {
            Err(RegisterError::InvalidTargets(format!(
                "qubits {:?} are not distinct",
                all.as_slice()
            )))
        }
    }

    /// Check `M^dagger M` is the identity within `tolerance` per entry.
    pub fn is_unitary(&self, tolerance: P) -> bool {
        let (_, targets, matrix) = self.flatten();
        let dim = 1 << targets.len();
        (0..dim).all(|i| {
            (0..dim).all(|j| {
                let dot: Complex<P> = (0..dim)
                    .map(|k| matrix[k * dim + i].conj() * matrix[k * dim + j])
                    .fold(Complex::zero(), |acc, x| acc + x);
                let expected = if i == j {
                    Complex::one()
                } else {
                    Complex::zero()
                };
                (dot - expected).norm() <= tolerance
            })
        })
    }
}

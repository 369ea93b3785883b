//! Scratch (ancilla) qubits appended above the input qubits of a register.
//!
//! Scratch qubits hold the output of a classical function embedded into the register. Once the
//! function's output is no longer needed they are removed again, either by dropping them when
//! they are fully determined by the input qubits (`clear_scratch`) or by measuring them
//! (`collapse_scratch`).

use crate::errors::{RegisterError, RegisterResult};
use crate::measurement::sample_entry;
use crate::register::{QuantumRegister, MAX_WIDTH};
use crate::utils::mask_for;
use crate::Precision;
use rand::Rng;
use tracing::debug;

/// How a scratch region is removed from a register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScratchPolicy {
    /// Drop the scratch bits, requires they be a function of the remaining bits.
    Clear,
    /// Measure the scratch bits and keep only the consistent branch.
    #[default]
    Collapse,
}

impl<P: Precision> QuantumRegister<P> {
    /// Append `count` zeroed qubits above the current width and mark them as scratch.
    pub fn add_scratch(&mut self, count: usize) -> RegisterResult<()> {
        if self.scratch_start.is_some() {
            return Err(RegisterError::ScratchAlreadyAllocated);
        }
        let new_width = self.width + count;
        if count == 0 || new_width > MAX_WIDTH {
            return Err(RegisterError::InvalidWidth { width: new_width });
        }
        // Existing indices keep their value, the new high bits read as zero.
        self.scratch_start = Some(self.width);
        self.width = new_width;
        debug!(
            scratch_start = self.width - count,
            width = self.width,
            "allocated scratch"
        );
        Ok(())
    }

    /// Number of scratch qubits, zero if none are allocated.
    pub fn scratch_width(&self) -> usize {
        self.scratch_start.map(|s| self.width - s).unwrap_or(0)
    }

    /// Drop the scratch qubits, keeping amplitudes as they are.
    ///
    /// Only valid when no two stored states share the same non-scratch bits. The register is
    /// untouched if that doesn't hold.
    pub fn clear_scratch(&mut self) -> RegisterResult<()> {
        let start = self.scratch_start.ok_or(RegisterError::NoScratch)?;
        let low_mask = mask_for(0..start);

        let mut states: Vec<_> = self
            .states
            .iter()
            .map(|(index, val)| (index & low_mask, *val))
            .collect();
        states.sort_unstable_by_key(|(index, _)| *index);
        if let Some(w) = states.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(RegisterError::ScratchNotDisentangled { index: w[0].0 });
        }

        self.states = states;
        self.width = start;
        self.scratch_start = None;
        debug!(width = self.width, states = self.states.len(), "cleared scratch");
        self.ensure_normalized()
    }

    /// Measure the scratch qubits, renormalize the surviving states and drop the scratch region.
    /// Returns the measured scratch value.
    pub fn collapse_scratch<R: Rng>(&mut self, rng: &mut R) -> RegisterResult<usize> {
        let start = self.scratch_start.ok_or(RegisterError::NoScratch)?;
        let pos = sample_entry(&self.states, rng).ok_or(RegisterError::NormalizationError {
            total: 0.0,
        })?;
        let measured = self.states[pos].0 >> start;
        let low_mask = mask_for(0..start);

        let mut states: Vec<_> = self
            .states
            .iter()
            .filter(|(index, _)| index >> start == measured)
            .map(|(index, val)| (index & low_mask, *val))
            .collect();
        let p: P = states.iter().map(|(_, v)| v.norm_sqr()).sum();
        let mult = P::one() / p.sqrt();
        states.iter_mut().for_each(|(_, v)| *v = v.scale(mult));

        self.states = states;
        self.width = start;
        self.scratch_start = None;
        debug!(
            measured,
            probability = ?p,
            states = self.states.len(),
            "collapsed scratch"
        );
        Ok(measured)
    }

    /// Remove the scratch region using `policy`.
    pub fn release_scratch<R: Rng>(
        &mut self,
        policy: ScratchPolicy,
        rng: &mut R,
    ) -> RegisterResult<()> {
        match policy {
            ScratchPolicy::Clear => self.clear_scratch(),
            ScratchPolicy::Collapse => self.collapse_scratch(rng).map(|_| ()),
        }
    }
}

//! Phase accumulators with symmetric wrap and hard sync.
//!
//! Phases are kept in `[0, 1)` after every update. Negative values wrap from
//! the top (`-0.25` becomes `0.75`) so that negative increments run the
//! oscillator backwards instead of clamping it.

#[allow(unused_imports)]
use num_traits::float::Float;

/// Fractional part of `x`, mirrored for negative inputs. Never returns `1.0`.
#[inline]
pub fn wrap(x: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }

    let wrapped = if x >= 0.0 {
        x - x.floor()
    } else {
        1.0 - wrap(-x)
    };

    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Returns `wrap(phase + increment)`.
#[inline]
pub fn advance(phase: f32, increment: f32) -> f32 {
    wrap(phase + increment)
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhaseAccumulator {
    phase: f32,
}

impl PhaseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = wrap(phase);
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advances by `increment` and returns the new phase.
    #[inline]
    pub fn tick(&mut self, increment: f32) -> f32 {
        self.phase = advance(self.phase, increment);
        self.phase
    }
}

/// Reference/synced accumulator pair.
///
/// The synced phase runs `multiplier` times faster than the reference and is
/// forced to `reference * multiplier` whenever the reference completes a cycle.
/// Wraps are detected as a decreasing reference phase, so increments are
/// expected to be non-negative.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HardSync {
    reference: PhaseAccumulator,
    synced: PhaseAccumulator,
}

impl HardSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.reference.reset();
        self.synced.reset();
    }

    #[inline]
    pub fn reference_phase(&self) -> f32 {
        self.reference.phase()
    }

    #[inline]
    pub fn synced_phase(&self) -> f32 {
        self.synced.phase()
    }

    pub fn set_phases(&mut self, reference: f32, synced: f32) {
        self.reference.set_phase(reference);
        self.synced.set_phase(synced);
    }

    /// Advances both phases by one step. Returns `true` when the synced phase
    /// was reset by a reference wrap.
    #[inline]
    pub fn tick(&mut self, increment: f32, multiplier: f32) -> bool {
        let previous = self.reference.phase();
        let next = self.reference.tick(increment);

        if previous > next {
            self.synced.set_phase(next * multiplier);
            true
        } else {
            self.synced.tick(increment * multiplier);
            false
        }
    }
}

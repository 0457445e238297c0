//! Linear interpolation of parameters in rendering loops.
//!
//! A block announces one target per control input; the ramp spreads the
//! change over the block's frames so that nothing steps audibly. A block of
//! zero frames only primes the ramp: the value jumps to the target and stays
//! there.

/// `cur`/`inc` pair advanced once per frame.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ParameterRamp {
    cur: f32,
    inc: f32,
}

impl ParameterRamp {
    pub fn new(value: f32) -> Self {
        Self {
            cur: value,
            inc: 0.0,
        }
    }

    /// Aims the ramp at `target`, reaching it after `num_frames` advances.
    #[inline]
    pub fn prepare(&mut self, target: f32, num_frames: usize) {
        if num_frames > 0 {
            self.inc = (target - self.cur) / (num_frames as f32);
        } else {
            self.cur = target;
            self.inc = 0.0;
        }
    }

    /// Sets the value immediately and stops any ramp in progress.
    #[inline]
    pub fn jump(&mut self, value: f32) {
        self.cur = value;
        self.inc = 0.0;
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.cur
    }

    #[inline]
    pub fn increment(&self) -> f32 {
        self.inc
    }

    #[inline]
    pub fn advance(&mut self) {
        self.cur += self.inc;
    }

    /// Returns the current value, then advances.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f32 {
        let value = self.cur;
        self.cur += self.inc;
        value
    }
}

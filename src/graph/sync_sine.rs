//! Hard-synced windowed sine.
//!
//! Parameters:
//! - *RATIO:* synced oscillator at 1x .. 8x the note frequency.
//! - *WINDOW:* amount of the click-suppressing window.
//! - *LEVEL:* output level.

use crate::oscillator::sync_sine_oscillator::SyncSineOscillator;
use crate::utils::parameter_interpolator::ParameterRamp;
use crate::utils::random::Lfsr;
use crate::voice::{Block, Frame, SignalGraph};

pub const PARAM_RATIO: usize = 0;
pub const PARAM_WINDOW: usize = 1;
pub const PARAM_LEVEL: usize = 2;

pub const MOD_RATIO: usize = 0;
pub const MOD_WINDOW: usize = 1;

pub const MAX_RATIO: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct SyncSine {
    oscillator: SyncSineOscillator,
    multiplier: ParameterRamp,
    window: ParameterRamp,
    level: ParameterRamp,
}

impl Default for SyncSine {
    fn default() -> Self {
        Self {
            oscillator: SyncSineOscillator::new(),
            multiplier: ParameterRamp::new(1.0),
            window: ParameterRamp::new(1.0),
            level: ParameterRamp::new(1.0),
        }
    }
}

impl SyncSine {
    pub fn oscillator(&self) -> &SyncSineOscillator {
        &self.oscillator
    }
}

/// Maps the `[0, 1]` ratio control onto a `1 ..= MAX_RATIO` multiplier.
#[inline]
pub fn ratio_to_multiplier(ratio: f32) -> f32 {
    1.0 + (MAX_RATIO - 1.0) * ratio.clamp(0.0, 1.0)
}

impl SignalGraph for SyncSine {
    const NAME: &'static str = "sync_sine";
    const OVERSAMPLE: usize = 16;
    const NUM_MODS: usize = 2;
    const DEFAULT_PARAMS: &'static [f32] = &[0.25, 1.0, 1.0];

    fn reset(&mut self, _rng: &mut Lfsr) {
        self.oscillator.reset();
    }

    fn prepare(&mut self, block: &Block<'_>) {
        self.multiplier.prepare(
            ratio_to_multiplier(block.target(PARAM_RATIO, MOD_RATIO)),
            block.num_frames,
        );
        self.window.prepare(
            block.target(PARAM_WINDOW, MOD_WINDOW).clamp(0.0, 1.0),
            block.num_frames,
        );
        self.level
            .prepare(block.param(PARAM_LEVEL).clamp(0.0, 1.0), block.num_frames);
    }

    #[inline]
    fn render(&mut self, frame: &Frame<'_>) -> f32 {
        self.level.value()
            * self.oscillator.next(
                frame.increment,
                self.multiplier.value(),
                self.window.value(),
            )
    }

    fn advance(&mut self) {
        self.multiplier.advance();
        self.window.advance();
        self.level.advance();
    }
}

//! Triangle crossfaded into the log-sine table.
//!
//! Parameters:
//! - *SHAPE:* from plain triangle (`0.0`) to the log-sine wave (`1.0`).
//! - *LEVEL:* output level.

use crate::oscillator::phase::PhaseAccumulator;
use crate::oscillator::waveform::triangle;
use crate::utils::crossfade;
use crate::utils::parameter_interpolator::ParameterRamp;
use crate::utils::random::Lfsr;
use crate::voice::{Block, Frame, SignalGraph};

pub const PARAM_SHAPE: usize = 0;
pub const PARAM_LEVEL: usize = 1;

pub const MOD_SHAPE: usize = 0;

#[derive(Debug, Default, Clone)]
pub struct TriangleShaper {
    phase: PhaseAccumulator,
    shape: ParameterRamp,
    level: ParameterRamp,
}

impl SignalGraph for TriangleShaper {
    const NAME: &'static str = "triangle_shaper";
    const OVERSAMPLE: usize = 2;
    const NUM_MODS: usize = 1;
    const DEFAULT_PARAMS: &'static [f32] = &[0.0, 0.8];

    fn reset(&mut self, _rng: &mut Lfsr) {
        self.phase.reset();
    }

    fn prepare(&mut self, block: &Block<'_>) {
        self.shape.prepare(
            block.target(PARAM_SHAPE, MOD_SHAPE).clamp(0.0, 1.0),
            block.num_frames,
        );
        self.level
            .prepare(block.param(PARAM_LEVEL).clamp(0.0, 1.0), block.num_frames);
    }

    #[inline]
    fn render(&mut self, frame: &Frame<'_>) -> f32 {
        let phase = self.phase.tick(frame.increment);
        let shaped = frame.tables.log_sin(phase);
        self.level.value() * crossfade(triangle(phase), shaped, self.shape.value())
    }

    fn advance(&mut self) {
        self.shape.advance();
        self.level.advance();
    }
}

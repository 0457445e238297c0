//! Pulse wave through the driven ladder low-pass.
//!
//! Parameters:
//! - *PULSE WIDTH:* duty cycle; values outside `[0, 1]` silence the oscillator
//!   into a constant.
//! - *CUTOFF:* 20 Hz .. 20 kHz, exponential.
//! - *RESONANCE:* ladder feedback.
//! - *DRIVE:* gain into the tanh stages, 1x .. 10x.

use crate::filter::ladder::{LadderCoefficients, LadderFilter};
use crate::graph::cutoff_to_hz;
use crate::oscillator::phase::PhaseAccumulator;
use crate::oscillator::waveform::pulse;
use crate::utils::parameter_interpolator::ParameterRamp;
use crate::utils::random::Lfsr;
use crate::voice::{Block, Frame, SignalGraph};

pub const PARAM_PULSE_WIDTH: usize = 0;
pub const PARAM_CUTOFF: usize = 1;
pub const PARAM_RESONANCE: usize = 2;
pub const PARAM_DRIVE: usize = 3;

pub const MOD_PULSE_WIDTH: usize = 0;
pub const MOD_CUTOFF: usize = 1;
pub const MOD_RESONANCE: usize = 2;
pub const MOD_DRIVE: usize = 3;

const MAX_DRIVE: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct PulseLadder {
    phase: PhaseAccumulator,
    filter: LadderFilter,
    pulse_width: ParameterRamp,
}

impl Default for PulseLadder {
    fn default() -> Self {
        Self {
            phase: PhaseAccumulator::new(),
            filter: LadderFilter::new(),
            pulse_width: ParameterRamp::new(0.5),
        }
    }
}

impl PulseLadder {
    pub fn filter(&self) -> &LadderFilter {
        &self.filter
    }
}

impl SignalGraph for PulseLadder {
    const NAME: &'static str = "pulse_ladder";
    const OVERSAMPLE: usize = 8;
    const NUM_MODS: usize = 4;
    const DEFAULT_PARAMS: &'static [f32] = &[0.5, 0.6, 0.2, 0.3];

    fn reset(&mut self, _rng: &mut Lfsr) {
        self.phase.reset();
        self.filter.reset();
    }

    fn prepare(&mut self, block: &Block<'_>) {
        self.pulse_width.prepare(
            block.target(PARAM_PULSE_WIDTH, MOD_PULSE_WIDTH),
            block.num_frames,
        );

        let cutoff_hz = cutoff_to_hz(block.tables, block.target(PARAM_CUTOFF, MOD_CUTOFF));
        let freq = 2.0 * cutoff_hz / block.internal_rate();
        let q = block.target(PARAM_RESONANCE, MOD_RESONANCE);
        let drive = 1.0 + (MAX_DRIVE - 1.0) * block.target(PARAM_DRIVE, MOD_DRIVE).clamp(0.0, 1.0);

        self.filter
            .set_coefficients(LadderCoefficients::new(freq, q, drive), block.steps());
    }

    #[inline]
    fn render(&mut self, frame: &Frame<'_>) -> f32 {
        let x = pulse(self.phase.tick(frame.increment), self.pulse_width.value());
        self.filter.process(x)
    }

    fn advance(&mut self) {
        self.pulse_width.advance();
    }
}

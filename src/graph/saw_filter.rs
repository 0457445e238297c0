//! Two saws through a 4-pole state-variable low-pass.
//!
//! Parameters:
//! - *CUTOFF:* 20 Hz .. 20 kHz, exponential.
//! - *RESONANCE:* filter peak.
//! - *DETUNE:* second saw up to one octave above the first.
//! - *MIX:* level of the second saw.
//!
//! The second saw starts at a random phase on every note-on.

use crate::filter::svf::{CascadedSvf, FrequencyRange};
use crate::filter::FilterMode;
use crate::graph::{cutoff_to_hz, svf_coefficient, svf_damping};
use crate::oscillator::phase::PhaseAccumulator;
use crate::oscillator::waveform::saw;
use crate::utils::crossfade;
use crate::utils::parameter_interpolator::ParameterRamp;
use crate::utils::random::Lfsr;
use crate::utils::units::semitones_to_ratio;
use crate::voice::{Block, Frame, SignalGraph};

pub const PARAM_CUTOFF: usize = 0;
pub const PARAM_RESONANCE: usize = 1;
pub const PARAM_DETUNE: usize = 2;
pub const PARAM_MIX: usize = 3;

pub const MOD_CUTOFF: usize = 0;
pub const MOD_RESONANCE: usize = 1;
pub const MOD_DETUNE: usize = 2;

const OUTPUT_GAIN: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct SawFilter {
    primary: PhaseAccumulator,
    secondary: PhaseAccumulator,
    filter: CascadedSvf<2>,

    freq: ParameterRamp,
    damping: ParameterRamp,
    detune_ratio: ParameterRamp,
    mix: ParameterRamp,
}

impl Default for SawFilter {
    fn default() -> Self {
        Self {
            primary: PhaseAccumulator::new(),
            secondary: PhaseAccumulator::new(),
            filter: CascadedSvf::new(FrequencyRange::Positive),
            freq: ParameterRamp::default(),
            damping: ParameterRamp::default(),
            detune_ratio: ParameterRamp::new(1.0),
            mix: ParameterRamp::default(),
        }
    }
}

impl SawFilter {
    pub fn primary_phase(&self) -> f32 {
        self.primary.phase()
    }

    pub fn secondary_phase(&self) -> f32 {
        self.secondary.phase()
    }
}

impl SignalGraph for SawFilter {
    const NAME: &'static str = "saw_filter";
    const OVERSAMPLE: usize = 4;
    const NUM_MODS: usize = 3;
    const DEFAULT_PARAMS: &'static [f32] = &[0.5, 0.3, 0.0, 0.0];

    fn reset(&mut self, rng: &mut Lfsr) {
        self.primary.reset();
        self.secondary.set_phase(rng.get_float());
        self.filter.reset();
    }

    fn prepare(&mut self, block: &Block<'_>) {
        let cutoff = block.target(PARAM_CUTOFF, MOD_CUTOFF);
        let resonance = block.target(PARAM_RESONANCE, MOD_RESONANCE);
        let detune = block.target(PARAM_DETUNE, MOD_DETUNE).clamp(0.0, 1.0);
        let mix = block.param(PARAM_MIX).clamp(0.0, 1.0);

        let cutoff_hz = cutoff_to_hz(block.tables, cutoff);
        self.freq.prepare(
            svf_coefficient(cutoff_hz, block.internal_rate()),
            block.num_frames,
        );
        self.damping.prepare(svf_damping(resonance), block.num_frames);
        self.detune_ratio
            .prepare(semitones_to_ratio(detune * 12.0), block.num_frames);
        self.mix.prepare(mix, block.num_frames);
    }

    #[inline]
    fn render(&mut self, frame: &Frame<'_>) -> f32 {
        let primary = saw(self.primary.tick(frame.increment));
        let secondary = saw(
            self.secondary
                .tick(frame.increment * self.detune_ratio.value()),
        );
        let x = crossfade(primary, secondary, self.mix.value() * 0.5);

        OUTPUT_GAIN
            * self.filter.process_with(
                x,
                self.freq.value(),
                self.damping.value(),
                FilterMode::LowPass,
            )
    }

    fn advance(&mut self) {
        self.freq.advance();
        self.damping.advance();
        self.detune_ratio.advance();
        self.mix.advance();
    }
}

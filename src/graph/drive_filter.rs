//! Effect: tanh drive into a state-variable filter.
//!
//! Parameters:
//! - *DRIVE:* input gain into the tanh table, 1x .. 16x.
//! - *CUTOFF:* 20 Hz .. 20 kHz, exponential.
//! - *RESONANCE:* filter peak.
//! - *MODE:* low-pass, band-pass, high-pass, notch.
//!
//! The input is held across the oversampled steps of a frame and the output
//! smoothed by a one-pole after downsampling.

use crate::downsampler::Decimation;
use crate::filter::svf::{FrequencyRange, Svf};
use crate::filter::FilterMode;
use crate::graph::{cutoff_to_hz, svf_coefficient, svf_damping};
use crate::utils::parameter_interpolator::ParameterRamp;
use crate::utils::random::Lfsr;
use crate::voice::{Block, Frame, SignalGraph};

pub const PARAM_DRIVE: usize = 0;
pub const PARAM_CUTOFF: usize = 1;
pub const PARAM_RESONANCE: usize = 2;
pub const PARAM_MODE: usize = 3;

pub const MOD_DRIVE: usize = 0;
pub const MOD_CUTOFF: usize = 1;
pub const MOD_RESONANCE: usize = 2;

const MAX_DRIVE: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct DriveFilter {
    filter: Svf,
    mode: FilterMode,

    drive: ParameterRamp,
    freq: ParameterRamp,
    damping: ParameterRamp,
}

impl Default for DriveFilter {
    fn default() -> Self {
        Self {
            filter: Svf::new(FrequencyRange::Bipolar),
            mode: FilterMode::LowPass,
            drive: ParameterRamp::new(1.0),
            freq: ParameterRamp::default(),
            damping: ParameterRamp::default(),
        }
    }
}

impl DriveFilter {
    pub fn mode(&self) -> FilterMode {
        self.mode
    }
}

impl SignalGraph for DriveFilter {
    const NAME: &'static str = "drive_filter";
    const OVERSAMPLE: usize = 2;
    const DECIMATION: Decimation = Decimation::OnePole(0.5);
    const NUM_MODS: usize = 3;
    const DEFAULT_PARAMS: &'static [f32] = &[0.2, 0.8, 0.2, 0.0];

    fn reset(&mut self, _rng: &mut Lfsr) {
        self.filter.reset();
    }

    fn prepare(&mut self, block: &Block<'_>) {
        let drive = block.target(PARAM_DRIVE, MOD_DRIVE).clamp(0.0, 1.0);
        self.drive
            .prepare(1.0 + (MAX_DRIVE - 1.0) * drive, block.num_frames);

        let cutoff_hz = cutoff_to_hz(block.tables, block.target(PARAM_CUTOFF, MOD_CUTOFF));
        self.freq.prepare(
            svf_coefficient(cutoff_hz, block.internal_rate()),
            block.num_frames,
        );
        self.damping.prepare(
            svf_damping(block.target(PARAM_RESONANCE, MOD_RESONANCE)),
            block.num_frames,
        );
        self.mode = FilterMode::from_parameter(block.param(PARAM_MODE));
    }

    #[inline]
    fn render(&mut self, frame: &Frame<'_>) -> f32 {
        let driven = frame.tables.tanh(frame.input * self.drive.value());
        self.filter.process_with(
            driven,
            self.freq.value(),
            self.damping.value(),
            self.mode,
        )
    }

    fn advance(&mut self) {
        self.drive.advance();
        self.freq.advance();
        self.damping.advance();
    }
}

#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod downsampler;
pub mod error;
pub mod filter;
pub mod graph;
pub mod oscillator;
pub mod plugin;
pub mod resources;
pub mod utils;
pub mod voice;

pub use error::{Error, Result};

/// Sample rate context for DSP calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRate {
    /// Sample rate in Hz
    pub sample_rate_hz: f32,
    /// Reciprocal of sample rate (1.0 / sample_rate_hz) for fast multiplication
    pub inv_sr: f32,
}

impl SampleRate {
    /// Create a new sample rate context.
    ///
    /// Non-positive or non-finite rates fall back to 48 kHz so that the
    /// reciprocal stays finite.
    pub fn new(sample_rate_hz: f32) -> Self {
        let sample_rate_hz = if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
            sample_rate_hz
        } else {
            log::warn!("Invalid sample rate {sample_rate_hz}, using {DEFAULT_SAMPLE_RATE}");
            DEFAULT_SAMPLE_RATE
        };

        Self {
            sample_rate_hz,
            inv_sr: 1.0 / sample_rate_hz,
        }
    }

    /// Per-step phase increment of `frequency_hz` when running `oversample`
    /// steps per output frame.
    #[inline]
    pub fn phase_increment(&self, frequency_hz: f32, oversample: usize) -> f32 {
        frequency_hz * self.inv_sr / (oversample as f32)
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// Sample rate used when the host does not supply a usable one.
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

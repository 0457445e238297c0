//! Phase accumulators and waveform generators.

pub mod phase;
pub mod sync_sine_oscillator;
pub mod waveform;

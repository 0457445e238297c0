//! Signal graphs, one per plugin.
//!
//! Each graph keeps its own oscillator and filter state and its own ramps for
//! the controls it derives from shared parameters and modulation inputs.

pub mod drive_filter;
pub mod pulse_ladder;
pub mod saw_filter;
pub mod sync_sine;
pub mod triangle_shaper;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::resources::SharedTables;

/// Lowest cutoff reachable by the exponential cutoff curve.
pub const MIN_CUTOFF_HZ: f32 = 20.0;

/// Maps a `[0, 1]` cutoff control onto 20 Hz .. 20 kHz through the exp table.
#[inline]
pub fn cutoff_to_hz(tables: &SharedTables, cutoff: f32) -> f32 {
    MIN_CUTOFF_HZ * tables.exp(cutoff.clamp(0.0, 1.0))
}

/// Chamberlin tuning coefficient `2 sin(pi fc / fs)` with `fc / fs` kept
/// below 1/8 for stability at any damping.
#[inline]
pub fn svf_coefficient(cutoff_hz: f32, sample_rate: f32) -> f32 {
    let ratio = (cutoff_hz / sample_rate).clamp(0.0, 0.125);
    2.0 * (core::f32::consts::PI * ratio).sin()
}

/// Chamberlin damping for a `[0, 1]` resonance control: `2.0` (no peak) down
/// to `0.1` (near self-oscillation).
#[inline]
pub fn svf_damping(resonance: f32) -> f32 {
    0.1 + 1.9 * (1.0 - resonance.clamp(0.0, 1.0))
}

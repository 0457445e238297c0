//! Naive waveforms of a phase in `[0, 1)`.
//!
//! None of these are band-limited on their own; the pipeline oversamples the
//! graphs that use them.

use crate::resources::sine;

/// `1.0` once the phase passes the pulse width, `-1.0` before.
///
/// A width outside `[0, 1]` gives a constant output.
#[inline]
pub fn pulse(phase: f32, pulse_width: f32) -> f32 {
    if phase >= pulse_width {
        1.0
    } else {
        -1.0
    }
}

/// Descending ramp from `1.0` to `-1.0`.
#[inline]
pub fn saw(phase: f32) -> f32 {
    1.0 - 2.0 * phase
}

#[inline]
pub fn triangle(phase: f32) -> f32 {
    if phase < 0.5 {
        -1.0 + 4.0 * phase
    } else {
        1.0 - 4.0 * (phase - 0.5)
    }
}

/// Table sine, wraps any phase.
#[inline]
pub fn sine(phase: f32) -> f32 {
    sine::table().lookup(phase)
}

/// `sin²(pi * phase)`: zero at both ends of the cycle, one in the middle.
#[inline]
pub fn sine_window(phase: f32) -> f32 {
    let s = sine(phase * 0.5);
    s * s
}

/// Sine at `phase` faded by the window of `window_phase`.
#[inline]
pub fn windowed_sine(phase: f32, window_phase: f32) -> f32 {
    sine(phase) * sine_window(window_phase)
}

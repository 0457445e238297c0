//! Utility functions shared by the primitives and the signal graphs.
//!
//! Everything in here is a scalar helper that is safe to call from the audio
//! thread: no allocation, no branching on anything but the inputs.

pub mod parameter_interpolator;
pub mod random;
pub mod units;

#[allow(unused_imports)]
use num_traits::float::Float;

/// Magnitude below which filter state is treated as silence.
pub const DENORMAL_THRESHOLD: f32 = 1.0e-15;

/// Smallest argument passed on to `ln` and `powf`.
pub const DOMAIN_EPSILON: f32 = 1.0e-9;

/// Replaces values too close to zero (and non-finite values) with `0.0`.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.is_finite() && x.abs() >= DENORMAL_THRESHOLD {
        x
    } else {
        0.0
    }
}

/// Natural logarithm with the argument clamped to a small positive epsilon.
#[inline]
pub fn safe_log(x: f32) -> f32 {
    f32::max(x, DOMAIN_EPSILON).ln()
}

/// `base^exponent` with a non-positive base clamped to a small epsilon.
#[inline]
pub fn safe_pow(base: f32, exponent: f32) -> f32 {
    f32::max(base, DOMAIN_EPSILON).powf(exponent)
}

/// Division returning `fallback` when the denominator is zero or the result
/// is not finite.
#[inline]
pub fn safe_div(numerator: f32, denominator: f32, fallback: f32) -> f32 {
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        fallback
    }
}

#[inline]
pub fn one_pole(out: &mut f32, in_: f32, coefficient: f32) {
    *out += coefficient * (in_ - *out);
}

#[inline]
pub fn crossfade(a: f32, b: f32, fade: f32) -> f32 {
    a + (b - a) * fade
}

/// Cubic sigmoid `x - x³/6`, held at its extremes beyond `±sqrt(2)` where
/// the polynomial would turn back.
#[inline]
pub fn cubic_clip(x: f32) -> f32 {
    let x = x.clamp(-core::f32::consts::SQRT_2, core::f32::consts::SQRT_2);
    x - x * x * x * (1.0 / 6.0)
}

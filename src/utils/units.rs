//! Pitch conversions.

#[allow(unused_imports)]
use num_traits::float::Float;

#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    (semitones * (1.0 / 12.0)).exp2()
}

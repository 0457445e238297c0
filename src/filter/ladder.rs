//! 4-stage ladder low-pass with resonance and drive.
//!
//! Four one-pole sections in series, each using the current and previous
//! input (bilinear two-point stencil), with the last stage fed back to the
//! input for resonance. The feedback path is shaped by a cubic clipper and
//! the output by two tanh stages.
//!
//! All five coefficients are ramped per sample: `set_coefficients` aims them
//! at new targets and every `process` call takes one step.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::parameter_interpolator::ParameterRamp;
use crate::utils::{cubic_clip, flush_denormal, safe_div};

/// Pade approximation constant of `exp((1 - p) * 1.386249)`.
const RESONANCE_SCALE: f32 = 1.386249;

/// Below this cutoff the drive gain is boosted to make up for the level lost
/// to resonance.
const COMPENSATION_CUTOFF: f32 = 0.4;

pub const MIN_FREQUENCY: f32 = 0.0001;
pub const MIN_DRIVE: f32 = 0.01;

/// Coefficients derived from cutoff, resonance and drive.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LadderCoefficients {
    pub p: f32,
    pub k: f32,
    pub r: f32,
    pub gain: f32,
    pub gain2: f32,
}

impl LadderCoefficients {
    /// `freq` is the normalized cutoff in `(0, 1]`, `q` the resonance in
    /// `[0, 1]` (self-oscillation near `1.0`) and `drive` the input gain of
    /// the first tanh stage.
    pub fn new(freq: f32, q: f32, drive: f32) -> Self {
        let freq = freq.clamp(MIN_FREQUENCY, 1.0);
        let q = q.clamp(0.0, 1.0);
        let drive = f32::max(drive, MIN_DRIVE);

        let p = freq * (1.8 - 0.8 * freq);
        let k = 2.0 * p - 1.0;
        let t = (1.0 - p) * RESONANCE_SCALE;
        let t2 = 12.0 + t * t;
        let r = q * safe_div(t2 + 6.0 * t, t2 - 6.0 * t, 1.0);

        let gain = if freq <= COMPENSATION_CUTOFF {
            drive * (1.0 + r * (COMPENSATION_CUTOFF - freq) * 0.5)
        } else {
            drive
        };
        let gain2 = safe_div(1.0, gain.tanh(), 1.0);

        Self { p, k, r, gain, gain2 }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LadderFilter {
    // Filter state.
    y1: f32,
    y2: f32,
    y3: f32,
    y4: f32,
    oldx: f32,
    oldy1: f32,
    oldy2: f32,
    oldy3: f32,

    // For interpolation of coefficients.
    p: ParameterRamp,
    k: ParameterRamp,
    r: ParameterRamp,
    gain: ParameterRamp,
    gain2: ParameterRamp,
}

impl LadderFilter {
    pub fn new() -> Self {
        let mut filter = Self::default();
        filter.set_coefficients(LadderCoefficients::new(1.0, 0.0, 1.0), 0);
        filter
    }

    /// Clears the sample history. Coefficients are left untouched.
    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
        self.y3 = 0.0;
        self.y4 = 0.0;
        self.oldx = 0.0;
        self.oldy1 = 0.0;
        self.oldy2 = 0.0;
        self.oldy3 = 0.0;
    }

    /// Ramps the coefficients to `target` over `steps` calls to `process`.
    /// Zero steps applies them at once.
    pub fn set_coefficients(&mut self, target: LadderCoefficients, steps: usize) {
        self.p.prepare(target.p, steps);
        self.k.prepare(target.k, steps);
        self.r.prepare(target.r, steps);
        self.gain.prepare(target.gain, steps);
        self.gain2.prepare(target.gain2, steps);
    }

    pub fn coefficients(&self) -> LadderCoefficients {
        LadderCoefficients {
            p: self.p.value(),
            k: self.k.value(),
            r: self.r.value(),
            gain: self.gain.value(),
            gain2: self.gain2.value(),
        }
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        let p = self.p.next();
        let k = self.k.next();
        let r = self.r.next();
        let gain = self.gain.next();
        let gain2 = self.gain2.next();

        let x = flush_denormal(in_ - r * self.y4);
        self.y1 = flush_denormal(x * p + self.oldx * p - k * self.y1);
        self.y2 = flush_denormal(self.y1 * p + self.oldy1 * p - k * self.y2);
        self.y3 = flush_denormal(self.y2 * p + self.oldy2 * p - k * self.y3);
        self.y4 = flush_denormal(self.y3 * p + self.oldy3 * p - k * self.y4);
        self.y4 = flush_denormal(cubic_clip(self.y4));

        self.oldx = x;
        self.oldy1 = self.y1;
        self.oldy2 = self.y2;
        self.oldy3 = self.y3;

        let driven = (self.y4 * gain).tanh();
        flush_denormal((driven * gain2).tanh())
    }

    /// True once every history value has settled to exact zero.
    pub fn is_silent(&self) -> bool {
        [
            self.y1, self.y2, self.y3, self.y4, self.oldx, self.oldy1, self.oldy2, self.oldy3,
        ]
        .iter()
        .all(|v| *v == 0.0)
    }
}

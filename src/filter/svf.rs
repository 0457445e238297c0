//! Chamberlin state-variable filter.
//!
//! ```text
//! lp = lp + bp * freq
//! hp = input - lp - bp * res
//! bp = bp + hp * freq
//! ```
//!
//! `freq` is the normalized tuning coefficient and `res` the damping: `0.0`
//! rings forever, larger values damp harder.

use super::FilterMode;
use crate::utils::flush_denormal;

/// Clamp applied to the tuning coefficient.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyRange {
    /// `[-0.999, 0.999]`
    #[default]
    Bipolar,
    /// `[0.001, 1.0]`
    Positive,
}

impl FrequencyRange {
    #[inline]
    pub fn clamp(self, freq: f32) -> f32 {
        match self {
            Self::Bipolar => freq.clamp(-0.999, 0.999),
            Self::Positive => freq.clamp(0.001, 1.0),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Svf {
    freq: f32,
    res: f32,
    range: FrequencyRange,
    lp: f32,
    hp: f32,
    bp: f32,
}

impl Svf {
    pub fn new(range: FrequencyRange) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    pub fn reset(&mut self) {
        self.lp = 0.0;
        self.hp = 0.0;
        self.bp = 0.0;
    }

    #[inline]
    pub fn set_f_res(&mut self, freq: f32, res: f32) {
        self.freq = self.range.clamp(freq);
        self.res = res;
    }

    /// One sample with explicit coefficients, for callers interpolating them
    /// per sample.
    #[inline]
    pub fn process_with(&mut self, in_: f32, freq: f32, res: f32, mode: FilterMode) -> f32 {
        let freq = self.range.clamp(freq);
        self.lp = flush_denormal(self.lp + self.bp * freq);
        self.hp = flush_denormal(in_ - self.lp - self.bp * res);
        self.bp = flush_denormal(self.bp + self.hp * freq);

        self.output(mode)
    }

    #[inline]
    pub fn process(&mut self, in_: f32, mode: FilterMode) -> f32 {
        self.process_with(in_, self.freq, self.res, mode)
    }

    #[inline]
    pub fn output(&self, mode: FilterMode) -> f32 {
        match mode {
            FilterMode::LowPass => self.lp,
            FilterMode::BandPass => self.bp,
            FilterMode::HighPass => self.hp,
            FilterMode::Notch => self.hp + self.lp,
        }
    }

    #[inline]
    pub fn lp(&self) -> f32 {
        self.lp
    }

    #[inline]
    pub fn hp(&self) -> f32 {
        self.hp
    }

    #[inline]
    pub fn bp(&self) -> f32 {
        self.bp
    }
}

/// `N` filters in series sharing one set of coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadedSvf<const N: usize> {
    stages: [Svf; N],
}

impl<const N: usize> Default for CascadedSvf<N> {
    fn default() -> Self {
        Self::new(FrequencyRange::default())
    }
}

impl<const N: usize> CascadedSvf<N> {
    pub fn new(range: FrequencyRange) -> Self {
        Self {
            stages: [Svf::new(range); N],
        }
    }

    pub fn reset(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.reset();
        }
    }

    #[inline]
    pub fn process_with(&mut self, in_: f32, freq: f32, res: f32, mode: FilterMode) -> f32 {
        self.stages
            .iter_mut()
            .fold(in_, |x, stage| stage.process_with(x, freq, res, mode))
    }

    pub fn stages(&self) -> &[Svf; N] {
        &self.stages
    }
}

//! Box-filter downsampler for oversampled graphs.
//!
//! A graph runs `factor` steps per output frame; the steps are summed and the
//! sum is scaled by `1 / factor`. The one-pole variant additionally smooths
//! the averaged frames.

use crate::utils::{flush_denormal, one_pole};

/// Oversampling factors a graph may declare.
pub const SUPPORTED_FACTORS: [usize; 5] = [1, 2, 4, 8, 16];

#[inline]
pub fn is_supported_factor(factor: usize) -> bool {
    SUPPORTED_FACTORS.contains(&factor)
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Decimation {
    #[default]
    Box,
    /// Box average followed by a one-pole low-pass with the given coefficient.
    OnePole(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Downsampler {
    decimation: Decimation,
    inv_factor: f32,
    sum: f32,
    state: f32,
}

impl Downsampler {
    pub fn new(factor: usize, decimation: Decimation) -> Self {
        debug_assert!(is_supported_factor(factor));
        Self {
            decimation,
            inv_factor: 1.0 / usize::max(factor, 1) as f32,
            sum: 0.0,
            state: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.state = 0.0;
    }

    #[inline]
    pub fn accumulate(&mut self, sample: f32) {
        self.sum += sample;
    }

    /// Returns the downsampled frame and clears the accumulator.
    #[inline]
    pub fn read(&mut self) -> f32 {
        let average = self.sum * self.inv_factor;
        self.sum = 0.0;

        match self.decimation {
            Decimation::Box => average,
            Decimation::OnePole(coefficient) => {
                one_pole(&mut self.state, average, coefficient);
                self.state = flush_denormal(self.state);
                self.state
            }
        }
    }
}

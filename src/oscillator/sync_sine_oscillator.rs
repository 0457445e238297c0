//! Hard-synced sine oscillator with a click-free window.
//!
//! The synced sine runs at `multiplier` times the reference frequency and
//! restarts at every reference cycle. The reference phase doubles as the
//! window phase, so the window is at zero exactly when the restart happens.

use super::phase::HardSync;
use super::waveform::{sine, sine_window};
use crate::utils::crossfade;

#[derive(Debug, Default, Clone, Copy)]
pub struct SyncSineOscillator {
    sync: HardSync,
}

impl SyncSineOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.sync.reset();
    }

    pub fn set_phases(&mut self, reference: f32, synced: f32) {
        self.sync.set_phases(reference, synced);
    }

    pub fn sync(&self) -> &HardSync {
        &self.sync
    }

    /// One step. `window_amount` blends from the raw synced sine (`0.0`) to
    /// the fully windowed one (`1.0`).
    #[inline]
    pub fn next(&mut self, increment: f32, multiplier: f32, window_amount: f32) -> f32 {
        self.sync.tick(increment, multiplier);

        let window = crossfade(1.0, sine_window(self.sync.reference_phase()), window_amount);
        sine(self.sync.synced_phase()) * window
    }
}

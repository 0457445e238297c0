//! Per-voice linear feedback shift register.
//!
//! Used to randomise oscillator start phases on note-on. Each voice owns its
//! own register so voices never share random state.

const DEFAULT_SEED: u32 = 0x21;

/// Galois LFSR with the 32-bit maximal-length tap mask.
const TAPS: u32 = 0x8020_0003;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lfsr {
    state: u32,
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Lfsr {
    pub fn new(seed: u32) -> Self {
        let mut lfsr = Self { state: 0 };
        lfsr.seed(seed);
        lfsr
    }

    /// A zero state would lock the register, so it is replaced by the default seed.
    #[inline]
    pub fn seed(&mut self, seed: u32) {
        self.state = if seed == 0 { DEFAULT_SEED } else { seed };
    }

    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    pub fn get_word(&mut self) -> u32 {
        // Clock 32 times so consecutive words do not overlap.
        for _ in 0..32 {
            let lsb = self.state & 1;
            self.state >>= 1;
            if lsb != 0 {
                self.state ^= TAPS;
            }
        }
        self.state
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn get_float(&mut self) -> f32 {
        (self.get_word() >> 8) as f32 / 16777216.0
    }
}

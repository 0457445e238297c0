//! Lookup tables.
//!
//! Tables are filled once from a closed-form function and read back with
//! linear interpolation. Each table decides at construction whether reads
//! past its ends clamp or wrap; the choice is part of the table's contract
//! because plugins depend on it for their sound.

pub mod sine;

use alloc::boxed::Box;
use alloc::vec::Vec;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::oscillator::phase::wrap;
use crate::utils::safe_log;

pub const TANH_TABLE_SIZE: usize = 4096;
pub const LOG_SIN_TABLE_SIZE: usize = 256;
pub const EXP_TABLE_SIZE: usize = 2048;

/// Input range covered by the tanh table is `-TANH_RANGE..TANH_RANGE`.
pub const TANH_RANGE: f32 = 4.0;

/// Offset keeping `ln(sin + 1)` finite at the trough of the log-sin table.
pub const LOG_SIN_EPSILON: f32 = 1.0e-3;

/// Upper end of the exp table, `EXP_RANGE^x` for `x` in `0..=1`.
pub const EXP_RANGE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Entry `i` holds `f(i / (N - 1))`; reads outside `0..=1` stick to the ends.
    Clamp,
    /// Entry `i` holds `f(i / N)` of a periodic `f`; reads wrap around. `N` is a power of two.
    Wrap,
}

#[derive(Debug, Clone)]
pub struct Lut {
    table: Box<[f32]>,
    mode: IndexMode,
}

impl Lut {
    pub fn clamped(size: usize, f: impl Fn(f32) -> f32) -> Self {
        debug_assert!(size >= 2);
        let last = (size - 1) as f32;
        let table: Vec<f32> = (0..size).map(|i| f(i as f32 / last)).collect();

        Self {
            table: table.into_boxed_slice(),
            mode: IndexMode::Clamp,
        }
    }

    pub fn periodic(size: usize, f: impl Fn(f32) -> f32) -> Self {
        debug_assert!(size.is_power_of_two());
        let table: Vec<f32> = (0..size).map(|i| f(i as f32 / size as f32)).collect();

        Self::from_periodic_table(table.into_boxed_slice())
    }

    /// Wraps an already computed single-cycle table.
    pub fn from_periodic_table(table: Box<[f32]>) -> Self {
        debug_assert!(table.len().is_power_of_two());
        Self {
            table,
            mode: IndexMode::Wrap,
        }
    }

    #[inline]
    pub fn lookup(&self, x: f32) -> f32 {
        match self.mode {
            IndexMode::Clamp => interpolate_clamp(&self.table, x),
            IndexMode::Wrap => interpolate_wrap(&self.table, x),
        }
    }

    #[inline]
    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.table
    }
}

#[inline]
pub fn interpolate_clamp(table: &[f32], x: f32) -> f32 {
    let last = table.len() - 1;
    let mut index = x * (last as f32);
    if index.is_nan() {
        index = 0.0;
    }
    index = index.clamp(0.0, last as f32);
    let index_integral = index as usize;
    let index_fractional = index - (index_integral as f32);
    let a = table[index_integral];
    let b = table[usize::min(index_integral + 1, last)];

    a + (b - a) * index_fractional
}

#[inline]
pub fn interpolate_wrap(table: &[f32], x: f32) -> f32 {
    let mask = table.len() - 1;
    let index = wrap(x) * (table.len() as f32);
    let index_integral = index as usize;
    let index_fractional = index - (index_integral as f32);
    let a = table[index_integral & mask];
    let b = table[(index_integral + 1) & mask];

    a + (b - a) * index_fractional
}

/// Tables owned by one plugin instance.
#[derive(Debug, Clone)]
pub struct SharedTables {
    tanh: Lut,
    log_sin: Lut,
    exp: Lut,
}

impl SharedTables {
    pub fn new() -> Self {
        log::debug!(
            "Building lookup tables (tanh: {TANH_TABLE_SIZE}, log_sin: {LOG_SIN_TABLE_SIZE}, exp: {EXP_TABLE_SIZE})"
        );

        let log_sin_min = safe_log(LOG_SIN_EPSILON);
        let log_sin_max = safe_log(2.0 + LOG_SIN_EPSILON);

        Self {
            tanh: Lut::clamped(TANH_TABLE_SIZE, |x| {
                (TANH_RANGE * (2.0 * x - 1.0)).tanh()
            }),
            log_sin: Lut::periodic(LOG_SIN_TABLE_SIZE, |x| {
                let s = (core::f32::consts::TAU * x).sin();
                let y = safe_log(s + 1.0 + LOG_SIN_EPSILON);
                2.0 * (y - log_sin_min) / (log_sin_max - log_sin_min) - 1.0
            }),
            exp: Lut::clamped(EXP_TABLE_SIZE, |x| EXP_RANGE.powf(x)),
        }
    }

    /// Saturates `x` with the tanh table. Inputs beyond `±TANH_RANGE` clamp.
    #[inline]
    pub fn tanh(&self, x: f32) -> f32 {
        self.tanh.lookup(x * (0.5 / TANH_RANGE) + 0.5)
    }

    /// Periodic log-sine shaper, `phase` in cycles: `ln(sin + 1 + eps)`
    /// scaled to `[-1, 1]`, with a sharp cusp at the trough.
    #[inline]
    pub fn log_sin(&self, phase: f32) -> f32 {
        self.log_sin.lookup(phase)
    }

    /// `EXP_RANGE^x` for `x` in `0..=1`.
    #[inline]
    pub fn exp(&self, x: f32) -> f32 {
        self.exp.lookup(x)
    }

    pub fn tanh_table(&self) -> &Lut {
        &self.tanh
    }

    pub fn log_sin_table(&self) -> &Lut {
        &self.log_sin
    }

    pub fn exp_table(&self) -> &Lut {
        &self.exp
    }
}

impl Default for SharedTables {
    fn default() -> Self {
        Self::new()
    }
}

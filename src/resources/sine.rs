//! Process-wide sine table.
//!
//! One cycle in `SINE_TABLE_SIZE` entries. The first quadrant of a cosine is
//! evaluated with a fixed-point Taylor polynomial and then mirrored into the
//! full cycle, so the table is bit-identical on every platform.

use alloc::vec;
use alloc::vec::Vec;

use spin::Once;

use super::Lut;

pub const SINE_TABLE_BITS: u32 = 14;
pub const SINE_TABLE_SIZE: usize = 1 << SINE_TABLE_BITS;

const QUARTER: usize = SINE_TABLE_SIZE / 4;

const FRACTIONAL_BITS: u32 = 30;
const ONE: i64 = 1 << FRACTIONAL_BITS;

/// pi/2 in Q30.
const HALF_PI: i64 = 1_686_629_713;

/// Denominators of the Horner form of the cosine series up to x^10:
/// `1 - x²/2 (1 - x²/12 (1 - x²/30 (1 - x²/56 (1 - x²/90))))`.
const HORNER_DENOMINATORS: [i64; 5] = [90, 56, 30, 12, 2];

static SINE_TABLE: Once<Lut> = Once::new();

/// Returns the sine table, building it on first use.
pub fn table() -> &'static Lut {
    SINE_TABLE.call_once(|| {
        log::debug!("Building sine table ({SINE_TABLE_SIZE} entries)");
        Lut::from_periodic_table(build().into_boxed_slice())
    })
}

/// cos(k/QUARTER * pi/2) for k in 0..=QUARTER, Q30.
fn quarter_cosine() -> Vec<i64> {
    (0..=QUARTER as i64)
        .map(|k| {
            let x = k * HALF_PI / QUARTER as i64;
            let x2 = (x * x) >> FRACTIONAL_BITS;
            HORNER_DENOMINATORS
                .iter()
                .fold(ONE, |term, d| ONE - ((x2 * term) >> FRACTIONAL_BITS) / d)
        })
        .collect()
}

fn build() -> Vec<f32> {
    let quarter = quarter_cosine();
    let scale = 1.0 / ONE as f64;
    let mut table = vec![0.0f32; SINE_TABLE_SIZE];

    // 0..90 degrees: reversed quarter cosine.
    for i in 0..QUARTER {
        table[i] = (quarter[QUARTER - i] as f64 * scale) as f32;
    }
    // 90..180 degrees: quarter cosine as is.
    for i in 0..QUARTER {
        table[QUARTER + i] = (quarter[i] as f64 * scale) as f32;
    }
    // 180..360 degrees: negated first half.
    for i in 0..2 * QUARTER {
        table[2 * QUARTER + i] = -table[i];
    }

    table
}

//! Errors reported at the host boundary.
//!
//! Rendering itself never fails: bad numbers are clamped or flushed. Only
//! calls that index into host-supplied data can be rejected.

use core::{error, fmt};

/// Provides an enumeration of all possible errors reported by cycle-dsp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    InvalidParameterIndex(usize),
    InvalidModulationIndex(usize),
    ParameterCountMismatch { expected: usize, actual: usize },
    BufferTooSmall { required: usize, actual: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameterIndex(index) => {
                write!(f, "Parameter with index {index} not found")
            }
            Self::InvalidModulationIndex(index) => {
                write!(f, "Modulation input with index {index} not found")
            }
            Self::ParameterCountMismatch { expected, actual } => {
                write!(f, "Expected {expected} parameter values, got {actual}")
            }
            Self::BufferTooSmall { required, actual } => {
                write!(f, "Sample buffer holds {actual} values, {required} required")
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

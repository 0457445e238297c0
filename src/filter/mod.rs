//! Chamberlin state-variable filter and 4-stage ladder low-pass.

pub mod ladder;
pub mod svf;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    LowPass,
    BandPass,
    HighPass,
    Notch,
}

impl FilterMode {
    /// Maps a `[0, 1]` parameter onto the four modes.
    pub fn from_parameter(value: f32) -> Self {
        match (value.clamp(0.0, 1.0) * 3.999) as usize {
            0 => Self::LowPass,
            1 => Self::BandPass,
            2 => Self::HighPass,
            _ => Self::Notch,
        }
    }
}

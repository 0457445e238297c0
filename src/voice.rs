//! Per-voice block rendering pipeline.
//!
//! A [`Voice`] owns everything one note needs: pitch and level ramps, the
//! modulation inputs set by the host, the downsampler and the plugin's
//! [`SignalGraph`]. Parameters and lookup tables live in a [`SharedState`]
//! that all voices of a plugin instance read but never write.
//!
//! Per block the host calls [`Voice::prepare_block`] to announce new targets,
//! then [`Voice::process_replace`] to render. Ramps advance once per output
//! frame; oscillators and filters advance once per oversampled step.

use alloc::boxed::Box;

use spin::Once;

use crate::downsampler::{is_supported_factor, Decimation, Downsampler};
use crate::error::{Error, Result};
use crate::resources::SharedTables;
use crate::utils::parameter_interpolator::ParameterRamp;
use crate::utils::random::Lfsr;
use crate::SampleRate;

/// Upper bound of modulation inputs per graph.
pub const MAX_MODS: usize = 8;

/// Highest phase increment per step; anything above aliases completely.
const MAX_INCREMENT: f32 = 0.5;

const VOICE_SEED: u32 = 0x5eed_1234;

/// Parameters and lookup tables of one plugin instance.
///
/// Hosts must not call [`SharedState::set_param`] while voices render; in
/// Rust this is enforced by the `&mut` borrow.
#[derive(Debug)]
pub struct SharedState {
    params: Box<[f32]>,
    defaults: &'static [f32],
    tables: Once<SharedTables>,
}

impl SharedState {
    pub fn new(defaults: &'static [f32]) -> Self {
        log::debug!("Creating shared state with {} parameters", defaults.len());
        Self {
            params: defaults.into(),
            defaults,
            tables: Once::new(),
        }
    }

    /// Shared state initialised with the graph's default parameters.
    pub fn for_graph<G: SignalGraph>() -> Self {
        Self::new(G::DEFAULT_PARAMS)
    }

    #[inline]
    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn param(&self, index: usize) -> Result<f32> {
        self.params
            .get(index)
            .copied()
            .ok_or(Error::InvalidParameterIndex(index))
    }

    pub fn set_param(&mut self, index: usize, value: f32) -> Result<()> {
        match self.params.get_mut(index) {
            Some(param) => {
                *param = value;
                Ok(())
            }
            None => {
                log::warn!("Ignoring value {value} for unknown parameter {index}");
                Err(Error::InvalidParameterIndex(index))
            }
        }
    }

    /// Restores every parameter to its default.
    pub fn reset_params(&mut self) {
        self.params.copy_from_slice(self.defaults);
    }

    /// Parameter values in positional order, as persisted by hosts.
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Loads a positional parameter array, all or nothing.
    pub fn load_params(&mut self, values: &[f32]) -> Result<()> {
        if values.len() != self.params.len() {
            log::warn!(
                "Rejecting parameter array of {} values, expected {}",
                values.len(),
                self.params.len()
            );
            return Err(Error::ParameterCountMismatch {
                expected: self.params.len(),
                actual: values.len(),
            });
        }
        self.params.copy_from_slice(values);
        Ok(())
    }

    /// Lookup tables, built on first access.
    #[inline]
    pub fn tables(&self) -> &SharedTables {
        self.tables.call_once(SharedTables::new)
    }

    /// Builds the tables now instead of inside the first rendered block.
    pub fn warm_up(&self) {
        self.tables();
        crate::resources::sine::table();
    }

    pub fn tables_built(&self) -> bool {
        self.tables.is_completed()
    }
}

/// Everything a graph may read while preparing a block.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub num_frames: usize,
    pub oversample: usize,
    pub sample_rate: SampleRate,
    pub tables: &'a SharedTables,
    params: &'a [f32],
    defaults: &'a [f32],
    mods: &'a [f32],
}

impl Block<'_> {
    /// Shared parameter, falling back to the graph default (or `0.0`) when the
    /// shared state holds fewer values.
    #[inline]
    pub fn param(&self, index: usize) -> f32 {
        self.params
            .get(index)
            .or_else(|| self.defaults.get(index))
            .copied()
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn modulation(&self, index: usize) -> f32 {
        self.mods.get(index).copied().unwrap_or(0.0)
    }

    /// `param + modulation`, the target every ramp is aimed at.
    #[inline]
    pub fn target(&self, param: usize, modulation: usize) -> f32 {
        self.param(param) + self.modulation(modulation)
    }

    /// Number of oversampled steps in the block.
    #[inline]
    pub fn steps(&self) -> usize {
        self.num_frames * self.oversample
    }

    /// Sample rate the graph actually runs at.
    #[inline]
    pub fn internal_rate(&self) -> f32 {
        self.sample_rate.sample_rate_hz * self.oversample as f32
    }
}

/// Inputs of one oversampled step. Constant across the steps of a frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Mono input sample (effects only).
    pub input: f32,
    /// Phase increment of the note per step.
    pub increment: f32,
    pub tables: &'a SharedTables,
}

/// A plugin's fixed signal graph.
pub trait SignalGraph: Default + Clone + Send {
    const NAME: &'static str;

    /// Steps per output frame.
    const OVERSAMPLE: usize;

    const DECIMATION: Decimation = Decimation::Box;

    /// Number of modulation inputs, at most [`MAX_MODS`].
    const NUM_MODS: usize;

    /// Default shared parameters; their count is the plugin's parameter count.
    const DEFAULT_PARAMS: &'static [f32];

    /// Clears phases and filter histories. `rng` has just been reseeded.
    fn reset(&mut self, rng: &mut Lfsr);

    /// Aims all ramps at the block's targets and computes block constants.
    fn prepare(&mut self, block: &Block<'_>);

    /// One oversampled step.
    fn render(&mut self, frame: &Frame<'_>) -> f32;

    /// Advances per-frame ramps after a frame has been rendered.
    fn advance(&mut self) {}
}

/// Rendering is not a separate state: it only lasts for the duration of a
/// [`Voice::process_replace`] call, which leaves the voice `Prepared`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    #[default]
    Idle,
    NoteOn,
    Prepared,
}

#[derive(Debug, Clone)]
pub struct Voice<G: SignalGraph> {
    sample_rate: SampleRate,
    graph: G,
    downsampler: Downsampler,
    rng: Lfsr,

    note_speed: ParameterRamp,
    vol: ParameterRamp,
    pan: ParameterRamp,
    mod_values: [f32; MAX_MODS],

    note: f32,
    velocity: f32,
    primed: bool,
    state: VoiceState,
}

impl<G: SignalGraph> Voice<G> {
    pub fn new(sample_rate_hz: f32) -> Self {
        debug_assert!(is_supported_factor(G::OVERSAMPLE));
        debug_assert!(G::NUM_MODS <= MAX_MODS);

        Self {
            sample_rate: SampleRate::new(sample_rate_hz),
            graph: G::default(),
            downsampler: Downsampler::new(G::OVERSAMPLE, G::DECIMATION),
            rng: Lfsr::new(VOICE_SEED),
            note_speed: ParameterRamp::default(),
            vol: ParameterRamp::new(1.0),
            pan: ParameterRamp::default(),
            mod_values: [0.0; MAX_MODS],
            note: 0.0,
            velocity: 0.0,
            primed: false,
            state: VoiceState::Idle,
        }
    }

    /// Starts a note. Without glide, phases, filter histories and the phase
    /// randomiser are reset and the next block jumps straight to its targets.
    pub fn note_on(&mut self, glide: bool, note: f32, velocity: f32) {
        if !glide || self.state == VoiceState::Idle {
            self.rng.seed(VOICE_SEED ^ note.to_bits() ^ velocity.to_bits().rotate_left(16));
            self.graph.reset(&mut self.rng);
            self.downsampler.reset();
            self.primed = false;
        }
        self.note = note;
        self.velocity = velocity;
        self.state = VoiceState::NoteOn;
    }

    /// Returns the voice to idle. It renders silence until the next note-on.
    pub fn release(&mut self) {
        self.state = VoiceState::Idle;
    }

    /// Sets a modulation input's target for the next block. `frame_offset` is
    /// accepted for the host ABI; modulation resolution is one value per block.
    pub fn set_mod_value(&mut self, mod_index: usize, value: f32, _frame_offset: u32) -> Result<()> {
        if mod_index >= G::NUM_MODS {
            log::warn!("{}: no modulation input {mod_index}", G::NAME);
            return Err(Error::InvalidModulationIndex(mod_index));
        }
        self.mod_values[mod_index] = value;
        Ok(())
    }

    /// Recomputes ramp targets for the next `num_frames` frames. Zero frames
    /// primes all ramps at their targets without rendering anything.
    ///
    /// Idle voices are left untouched: only [`Voice::note_on`] wakes a voice.
    pub fn prepare_block(
        &mut self,
        shared: &SharedState,
        num_frames: usize,
        freq_hz: f32,
        note: f32,
        vol: f32,
        pan: f32,
    ) {
        if self.state == VoiceState::Idle {
            return;
        }
        if !self.primed {
            self.prepare_ramps(shared, 0, freq_hz, note, vol, pan);
            self.primed = true;
        }
        self.prepare_ramps(shared, num_frames, freq_hz, note, vol, pan);
        self.state = VoiceState::Prepared;
    }

    fn prepare_ramps(
        &mut self,
        shared: &SharedState,
        num_frames: usize,
        freq_hz: f32,
        note: f32,
        vol: f32,
        pan: f32,
    ) {
        let increment = self.sample_rate.phase_increment(freq_hz, G::OVERSAMPLE);
        let increment = if increment.is_finite() {
            increment.clamp(0.0, MAX_INCREMENT)
        } else {
            0.0
        };
        let vol = if vol.is_finite() { vol } else { 0.0 };
        let pan = if pan.is_finite() { pan.clamp(-1.0, 1.0) } else { 0.0 };

        self.note_speed.prepare(increment, num_frames);
        self.vol.prepare(vol, num_frames);
        self.pan.prepare(pan, num_frames);
        self.note = note;

        let block = Block {
            num_frames,
            oversample: G::OVERSAMPLE,
            sample_rate: self.sample_rate,
            tables: shared.tables(),
            params: shared.params(),
            defaults: G::DEFAULT_PARAMS,
            mods: &self.mod_values[..G::NUM_MODS],
        };
        self.graph.prepare(&block);
    }

    /// Renders `num_frames` interleaved stereo frames into `samples_out`.
    ///
    /// `samples_in` holds `num_frames` mono samples when `mono` is set and
    /// interleaved stereo otherwise; stereo input is averaged to mono for the
    /// graph. Missing input samples read as silence.
    pub fn process_replace(
        &mut self,
        shared: &SharedState,
        mono: bool,
        samples_in: &[f32],
        samples_out: &mut [f32],
        num_frames: usize,
    ) -> Result<()> {
        let required = num_frames * 2;
        if samples_out.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                actual: samples_out.len(),
            });
        }

        let out = &mut samples_out[..required];
        if self.state == VoiceState::Idle {
            out.fill(0.0);
            return Ok(());
        }

        let tables = shared.tables();

        for (i, out_frame) in out.chunks_exact_mut(2).enumerate() {
            let input = if mono {
                samples_in.get(i).copied().unwrap_or(0.0)
            } else {
                let left = samples_in.get(2 * i).copied().unwrap_or(0.0);
                let right = samples_in.get(2 * i + 1).copied().unwrap_or(0.0);
                (left + right) * 0.5
            };

            let frame = Frame {
                input,
                increment: self.note_speed.value(),
                tables,
            };
            for _ in 0..G::OVERSAMPLE {
                self.downsampler.accumulate(self.graph.render(&frame));
            }
            let sample = self.downsampler.read();

            let vol = self.vol.next();
            let pan = self.pan.next();
            self.note_speed.advance();
            self.graph.advance();

            out_frame[0] = sample * vol * f32::min(1.0, 1.0 - pan);
            out_frame[1] = sample * vol * f32::min(1.0, 1.0 + pan);
        }

        Ok(())
    }

    #[inline]
    pub fn state(&self) -> VoiceState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state != VoiceState::Idle
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn note(&self) -> f32 {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Per-step phase increment currently applied.
    pub fn note_speed(&self) -> &ParameterRamp {
        &self.note_speed
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }
}

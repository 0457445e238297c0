//! Runtime plugin selection.
//!
//! [`PluginKind`] names every shipped graph and builds matching shared state
//! and boxed voices for hosts that only know which plugin to load at runtime.

use alloc::boxed::Box;

use dyn_clone::DynClone;

use crate::error::Result;
use crate::graph::drive_filter::DriveFilter;
use crate::graph::pulse_ladder::PulseLadder;
use crate::graph::saw_filter::SawFilter;
use crate::graph::sync_sine::SyncSine;
use crate::graph::triangle_shaper::TriangleShaper;
use crate::voice::{SharedState, SignalGraph, Voice, VoiceState};

/// Object-safe view of a [`Voice`].
pub trait DynVoice: DynClone + Send {
    fn kind(&self) -> PluginKind;

    fn note_on(&mut self, glide: bool, note: f32, velocity: f32);

    fn release(&mut self);

    fn set_mod_value(&mut self, mod_index: usize, value: f32, frame_offset: u32) -> Result<()>;

    fn prepare_block(
        &mut self,
        shared: &SharedState,
        num_frames: usize,
        freq_hz: f32,
        note: f32,
        vol: f32,
        pan: f32,
    );

    fn process_replace(
        &mut self,
        shared: &SharedState,
        mono: bool,
        samples_in: &[f32],
        samples_out: &mut [f32],
        num_frames: usize,
    ) -> Result<()>;

    fn state(&self) -> VoiceState;
}

dyn_clone::clone_trait_object!(DynVoice);

/// Ties a graph type to its [`PluginKind`] tag.
pub trait Plugin: SignalGraph + 'static {
    const KIND: PluginKind;
}

impl Plugin for SawFilter {
    const KIND: PluginKind = PluginKind::SawFilter;
}

impl Plugin for PulseLadder {
    const KIND: PluginKind = PluginKind::PulseLadder;
}

impl Plugin for SyncSine {
    const KIND: PluginKind = PluginKind::SyncSine;
}

impl Plugin for TriangleShaper {
    const KIND: PluginKind = PluginKind::TriangleShaper;
}

impl Plugin for DriveFilter {
    const KIND: PluginKind = PluginKind::DriveFilter;
}

impl<G: Plugin> DynVoice for Voice<G> {
    fn kind(&self) -> PluginKind {
        G::KIND
    }

    fn note_on(&mut self, glide: bool, note: f32, velocity: f32) {
        Voice::note_on(self, glide, note, velocity);
    }

    fn release(&mut self) {
        Voice::release(self);
    }

    fn set_mod_value(&mut self, mod_index: usize, value: f32, frame_offset: u32) -> Result<()> {
        Voice::set_mod_value(self, mod_index, value, frame_offset)
    }

    fn prepare_block(
        &mut self,
        shared: &SharedState,
        num_frames: usize,
        freq_hz: f32,
        note: f32,
        vol: f32,
        pan: f32,
    ) {
        Voice::prepare_block(self, shared, num_frames, freq_hz, note, vol, pan);
    }

    fn process_replace(
        &mut self,
        shared: &SharedState,
        mono: bool,
        samples_in: &[f32],
        samples_out: &mut [f32],
        num_frames: usize,
    ) -> Result<()> {
        Voice::process_replace(self, shared, mono, samples_in, samples_out, num_frames)
    }

    fn state(&self) -> VoiceState {
        Voice::state(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    SawFilter,
    PulseLadder,
    SyncSine,
    TriangleShaper,
    DriveFilter,
}

impl PluginKind {
    pub const ALL: [PluginKind; 5] = [
        Self::SawFilter,
        Self::PulseLadder,
        Self::SyncSine,
        Self::TriangleShaper,
        Self::DriveFilter,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SawFilter => SawFilter::NAME,
            Self::PulseLadder => PulseLadder::NAME,
            Self::SyncSine => SyncSine::NAME,
            Self::TriangleShaper => TriangleShaper::NAME,
            Self::DriveFilter => DriveFilter::NAME,
        }
    }

    pub fn oversample(self) -> usize {
        match self {
            Self::SawFilter => SawFilter::OVERSAMPLE,
            Self::PulseLadder => PulseLadder::OVERSAMPLE,
            Self::SyncSine => SyncSine::OVERSAMPLE,
            Self::TriangleShaper => TriangleShaper::OVERSAMPLE,
            Self::DriveFilter => DriveFilter::OVERSAMPLE,
        }
    }

    pub fn num_mods(self) -> usize {
        match self {
            Self::SawFilter => SawFilter::NUM_MODS,
            Self::PulseLadder => PulseLadder::NUM_MODS,
            Self::SyncSine => SyncSine::NUM_MODS,
            Self::TriangleShaper => TriangleShaper::NUM_MODS,
            Self::DriveFilter => DriveFilter::NUM_MODS,
        }
    }

    pub fn default_params(self) -> &'static [f32] {
        match self {
            Self::SawFilter => SawFilter::DEFAULT_PARAMS,
            Self::PulseLadder => PulseLadder::DEFAULT_PARAMS,
            Self::SyncSine => SyncSine::DEFAULT_PARAMS,
            Self::TriangleShaper => TriangleShaper::DEFAULT_PARAMS,
            Self::DriveFilter => DriveFilter::DEFAULT_PARAMS,
        }
    }

    /// Whether the plugin processes its input rather than generating sound.
    pub fn is_effect(self) -> bool {
        matches!(self, Self::DriveFilter)
    }

    pub fn new_shared_state(self) -> SharedState {
        SharedState::new(self.default_params())
    }

    pub fn new_voice(self, sample_rate_hz: f32) -> Box<dyn DynVoice> {
        log::debug!("Creating {} voice at {sample_rate_hz} Hz", self.name());
        match self {
            Self::SawFilter => Box::new(Voice::<SawFilter>::new(sample_rate_hz)),
            Self::PulseLadder => Box::new(Voice::<PulseLadder>::new(sample_rate_hz)),
            Self::SyncSine => Box::new(Voice::<SyncSine>::new(sample_rate_hz)),
            Self::TriangleShaper => Box::new(Voice::<TriangleShaper>::new(sample_rate_hz)),
            Self::DriveFilter => Box::new(Voice::<DriveFilter>::new(sample_rate_hz)),
        }
    }
}

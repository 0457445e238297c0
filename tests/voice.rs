//! Tests for the voice module.


use simple_logger::SimpleLogger;

use cycle_dsp::downsampler::is_supported_factor;
use cycle_dsp::error::Error;
use cycle_dsp::graph::drive_filter::DriveFilter;
use cycle_dsp::graph::saw_filter::SawFilter;
use cycle_dsp::graph::triangle_shaper::TriangleShaper;
use cycle_dsp::oscillator::phase::wrap;
use cycle_dsp::plugin::{DynVoice, PluginKind};
use cycle_dsp::voice::{SharedState, SignalGraph, Voice, VoiceState, MAX_MODS};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZE: usize = 64;

fn init_logger() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .ok();
}

#[test]
fn saw_filter_block() {
    init_logger();

    let shared = SharedState::for_graph::<SawFilter>();
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);
    let mut out = [0.0; 2 * BLOCK_SIZE];

    voice.note_on(false, 69.0, 1.0);
    assert_eq!(voice.state(), VoiceState::NoteOn);

    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);
    assert_eq!(voice.state(), VoiceState::Prepared);
    assert_eq!(
        voice.process_replace(&shared, true, &[0.0; BLOCK_SIZE], &mut out, BLOCK_SIZE),
        Ok(())
    );

    for frame in out.chunks_exact(2) {
        assert!(frame[0].is_finite());
        assert!((-1.0..=1.0).contains(&frame[0]));
        assert_eq!(frame[0], frame[1]);
    }
    assert!(out.iter().any(|s| *s != 0.0));

    let increment = 440.0 / SAMPLE_RATE / SawFilter::OVERSAMPLE as f32;
    assert!((voice.note_speed().value() - increment).abs() < 1.0e-7);

    let expected_phase = wrap(BLOCK_SIZE as f32 * 440.0 / SAMPLE_RATE);
    assert!((voice.graph().primary_phase() - expected_phase).abs() < 1.0e-4);
}

#[test]
fn saw_filter_pitch() {
    let shared = SharedState::for_graph::<SawFilter>();
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);
    let mut out = [0.0; 2 * BLOCK_SIZE];
    let mut wav_data = Vec::new();

    voice.note_on(false, 69.0, 1.0);

    let blocks = SAMPLE_RATE as usize / BLOCK_SIZE;
    for _ in 0..blocks {
        voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);
        voice
            .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
            .ok();
        wav_data.extend(out.chunks_exact(2).map(|frame| frame[0]));
    }

    let crossings = wav_data
        .windows(2)
        .filter(|w| w[0] < 0.0 && w[1] >= 0.0)
        .count();
    assert!((435..=445).contains(&crossings), "{crossings} crossings");

    wav_writer::write("voice/saw_filter_440.wav", &wav_data).ok();
}

#[test]
fn first_block_jumps_to_targets() {
    let shared = SharedState::for_graph::<SawFilter>();
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);
    let mut out = [0.0; 2 * BLOCK_SIZE];

    voice.note_on(false, 69.0, 1.0);
    voice.prepare_block(&shared, 0, 440.0, 69.0, 1.0, 0.0);

    let increment = 440.0 / SAMPLE_RATE / SawFilter::OVERSAMPLE as f32;
    assert!((voice.note_speed().value() - increment).abs() < 1.0e-7);
    assert_eq!(voice.note_speed().increment(), 0.0);

    // The next block ramps from the primed value.
    voice.prepare_block(&shared, BLOCK_SIZE, 880.0, 81.0, 1.0, 0.0);
    assert!(voice.note_speed().increment() > 0.0);

    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    assert!((voice.note_speed().value() - 2.0 * increment).abs() < 1.0e-6);
}

#[test]
fn glide_keeps_phase() {
    let shared = SharedState::for_graph::<SawFilter>();
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);
    let mut out = [0.0; 2 * BLOCK_SIZE];

    voice.note_on(false, 69.0, 1.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();

    let phase = voice.graph().primary_phase();
    assert!(phase > 0.0);

    voice.note_on(true, 72.0, 1.0);
    assert_eq!(voice.graph().primary_phase(), phase);
    assert_eq!(voice.note(), 72.0);

    voice.prepare_block(&shared, BLOCK_SIZE, 523.25, 72.0, 1.0, 0.0);
    assert!(voice.note_speed().increment() > 0.0);

    voice.note_on(false, 72.0, 1.0);
    assert_eq!(voice.graph().primary_phase(), 0.0);

    voice.prepare_block(&shared, BLOCK_SIZE, 523.25, 72.0, 1.0, 0.0);
    assert_eq!(voice.note_speed().increment(), 0.0);
}

#[test]
fn glide_from_idle_resets() {
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);
    let mut other = Voice::<SawFilter>::new(SAMPLE_RATE);

    voice.note_on(true, 60.0, 0.5);
    other.note_on(false, 60.0, 0.5);

    assert_eq!(voice.graph().primary_phase(), 0.0);
    assert_eq!(
        voice.graph().secondary_phase(),
        other.graph().secondary_phase()
    );
}

#[test]
fn idle_voice_is_silent() {
    let shared = SharedState::for_graph::<SawFilter>();
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);
    let mut out = [1.0; 2 * BLOCK_SIZE];

    assert!(!voice.is_active());
    assert_eq!(
        voice.process_replace(&shared, true, &[], &mut out, BLOCK_SIZE),
        Ok(())
    );
    assert!(out.iter().all(|s| *s == 0.0));

    voice.note_on(false, 69.0, 1.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    assert!(out.iter().any(|s| *s != 0.0));

    voice.release();
    assert_eq!(voice.state(), VoiceState::Idle);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    assert!(out.iter().all(|s| *s == 0.0));
}

#[test]
fn idle_voice_ignores_blocks() {
    let shared = SharedState::for_graph::<SawFilter>();
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);
    let mut out = [1.0; 2 * BLOCK_SIZE];

    // Never started.
    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);
    assert_eq!(voice.state(), VoiceState::Idle);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    assert!(out.iter().all(|s| *s == 0.0));

    voice.note_on(false, 69.0, 1.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    let phase = voice.graph().primary_phase();

    // Released, then offered another block.
    voice.release();
    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);
    assert_eq!(voice.state(), VoiceState::Idle);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    assert!(out.iter().all(|s| *s == 0.0));
    assert_eq!(voice.graph().primary_phase(), phase);

    // Only a note-on wakes it, from reset phases.
    voice.note_on(false, 69.0, 1.0);
    assert_eq!(voice.graph().primary_phase(), 0.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);
    assert_eq!(voice.state(), VoiceState::Prepared);
}

#[test]
fn invalid_host_calls() {
    let shared = SharedState::for_graph::<SawFilter>();
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);

    assert_eq!(voice.set_mod_value(0, 0.2, 0), Ok(()));
    assert_eq!(
        voice.set_mod_value(SawFilter::NUM_MODS, 0.2, 0),
        Err(Error::InvalidModulationIndex(SawFilter::NUM_MODS))
    );

    voice.note_on(false, 69.0, 1.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 0.0);

    let mut out = [0.0; 100];
    assert_eq!(
        voice.process_replace(&shared, true, &[], &mut out, BLOCK_SIZE),
        Err(Error::BufferTooSmall {
            required: 128,
            actual: 100
        })
    );
}

#[test]
fn volume_ramps_per_frame() {
    let shared = SharedState::for_graph::<TriangleShaper>();
    let mut voice = Voice::<TriangleShaper>::new(SAMPLE_RATE);
    let mut out = [1.0; 2 * BLOCK_SIZE];

    voice.note_on(false, 57.0, 1.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 220.0, 57.0, 0.0, 0.0);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    assert!(out.iter().all(|s| *s == 0.0));

    voice.prepare_block(&shared, BLOCK_SIZE, 220.0, 57.0, 1.0, 0.0);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    assert_eq!(out[0], 0.0);
    assert!(out.iter().any(|s| *s != 0.0));
}

#[test]
fn hard_pan() {
    let shared = SharedState::for_graph::<SawFilter>();
    let mut voice = Voice::<SawFilter>::new(SAMPLE_RATE);
    let mut out = [0.0; 2 * BLOCK_SIZE];

    voice.note_on(false, 69.0, 1.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 440.0, 69.0, 1.0, 1.0);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();

    assert!(out.chunks_exact(2).all(|frame| frame[0] == 0.0));
    assert!(out.chunks_exact(2).any(|frame| frame[1] != 0.0));
}

#[test]
fn drive_filter_processes_input() {
    let shared = SharedState::for_graph::<DriveFilter>();
    let mut voice = Voice::<DriveFilter>::new(SAMPLE_RATE);
    let mut out = [0.0; 2 * BLOCK_SIZE];

    voice.note_on(false, 60.0, 1.0);

    let mut mono_in = [0.0; BLOCK_SIZE];
    let mut stereo_in = [0.0; 2 * BLOCK_SIZE];
    let mut cancelling_in = [0.0; 2 * BLOCK_SIZE];

    let mut peak = 0.0_f32;
    for block in 0..100 {
        for (i, x) in mono_in.iter_mut().enumerate() {
            *x = 0.5 * modulation::sine(block * BLOCK_SIZE + i, 440.0, SAMPLE_RATE);
        }
        for (i, x) in mono_in.iter().enumerate() {
            stereo_in[2 * i] = *x;
            stereo_in[2 * i + 1] = *x;
        }

        voice.prepare_block(&shared, BLOCK_SIZE, 0.0, 60.0, 1.0, 0.0);
        voice
            .process_replace(&shared, false, &stereo_in, &mut out, BLOCK_SIZE)
            .ok();

        for s in out {
            assert!(s.is_finite());
            peak = peak.max(s.abs());
        }
    }
    assert!(peak > 0.1);

    // Opposite channels average to silence.
    for (i, x) in mono_in.iter().enumerate() {
        cancelling_in[2 * i] = *x;
        cancelling_in[2 * i + 1] = -*x;
    }
    voice.note_on(false, 60.0, 1.0);
    for _ in 0..10 {
        voice.prepare_block(&shared, BLOCK_SIZE, 0.0, 60.0, 1.0, 0.0);
        voice
            .process_replace(&shared, false, &cancelling_in, &mut out, BLOCK_SIZE)
            .ok();
        assert!(out.iter().all(|s| s.abs() < 1.0e-4));
    }

    // Missing input reads as silence.
    voice.note_on(false, 60.0, 1.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 0.0, 60.0, 1.0, 0.0);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();
    assert!(out.iter().all(|s| s.abs() < 1.0e-4));
}

#[test]
fn all_plugins() {
    init_logger();

    let duration = 1.0;
    let blocks = (duration * SAMPLE_RATE / BLOCK_SIZE as f32) as usize;

    for kind in PluginKind::ALL {
        let shared = kind.new_shared_state();
        shared.warm_up();

        let mut voice = kind.new_voice(SAMPLE_RATE);
        let mut input = [0.0; BLOCK_SIZE];
        let mut out = [0.0; 2 * BLOCK_SIZE];
        let mut wav_data = Vec::new();

        voice.note_on(false, 57.0, 1.0);

        for n in 0..blocks {
            if kind.is_effect() {
                for (i, x) in input.iter_mut().enumerate() {
                    *x = 0.5 * modulation::sine(n * BLOCK_SIZE + i, 220.0, SAMPLE_RATE);
                }
            }
            let pan = 0.5 * modulation::triangle(n, blocks, 1.0);

            voice.prepare_block(&shared, BLOCK_SIZE, 220.0, 57.0, 1.0, pan);
            assert_eq!(
                voice.process_replace(&shared, true, &input, &mut out, BLOCK_SIZE),
                Ok(())
            );

            for s in out {
                assert!(s.is_finite(), "{}", kind.name());
                assert!(s.abs() <= 2.0, "{}: {s}", kind.name());
            }
            wav_data.extend_from_slice(&out);
        }

        assert!(wav_data.iter().any(|s| *s != 0.0), "{}", kind.name());
        wav_writer::write_stereo(format!("voice/{}.wav", kind.name()), &wav_data).ok();
    }
}

#[test]
fn cloned_voice_renders_identically() {
    let kind = PluginKind::PulseLadder;
    let shared = kind.new_shared_state();
    let mut voice = kind.new_voice(SAMPLE_RATE);
    let mut out = [0.0; 2 * BLOCK_SIZE];

    voice.note_on(false, 45.0, 1.0);
    voice.prepare_block(&shared, BLOCK_SIZE, 110.0, 45.0, 1.0, 0.0);
    voice
        .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
        .ok();

    let mut clone = voice.clone();
    assert_eq!(clone.kind(), kind);
    assert_eq!(clone.state(), voice.state());

    let mut clone_out = [0.0; 2 * BLOCK_SIZE];
    for _ in 0..10 {
        voice.prepare_block(&shared, BLOCK_SIZE, 110.0, 45.0, 1.0, 0.0);
        clone.prepare_block(&shared, BLOCK_SIZE, 110.0, 45.0, 1.0, 0.0);
        voice
            .process_replace(&shared, true, &[], &mut out, BLOCK_SIZE)
            .ok();
        clone
            .process_replace(&shared, true, &[], &mut clone_out, BLOCK_SIZE)
            .ok();
        assert_eq!(out, clone_out);
    }
}

#[test]
fn plugin_kinds() {
    for kind in PluginKind::ALL {
        assert_eq!(PluginKind::from_name(kind.name()), Some(kind));
        assert!(is_supported_factor(kind.oversample()));
        assert!(kind.num_mods() <= MAX_MODS);
        assert_eq!(
            kind.new_shared_state().num_params(),
            kind.default_params().len()
        );

        let mut voice = kind.new_voice(SAMPLE_RATE);
        assert_eq!(voice.kind(), kind);
        assert!(voice.set_mod_value(kind.num_mods(), 0.0, 0).is_err());
    }

    assert_eq!(PluginKind::from_name("no_such_plugin"), None);
    assert_eq!(PluginKind::SyncSine.oversample(), 16);
    assert!(PluginKind::DriveFilter.is_effect());
    assert!(!PluginKind::SawFilter.is_effect());
}

//! Offline rendering of a note list to a WAV file.

use crate::commands::common::{apply_overrides, load_preset, parse_note};
use clap::Args;
use howl_config::ParamStore;
use howl_core::{MidiBuffer, MidiMessage};
use howl_instrument::{HowlingWolves, InstrumentConfig, Transport};
use howl_io::{SampleManager, WavSpec, write_wav};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct RenderArgs {
    /// Sample file, or a directory of WAV files to load as a kit
    #[arg(value_name = "SAMPLES")]
    samples: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Notes to play, as MIDI numbers or names (e.g. "C3,E3,G3")
    #[arg(short, long, value_delimiter = ',', default_value = "60", value_parser = parse_note)]
    notes: Vec<u8>,

    /// Play the notes one after another instead of together
    #[arg(long)]
    sequence: bool,

    /// Seconds each note is held
    #[arg(short, long, default_value = "1.0")]
    length: f32,

    /// Seconds rendered after the last note-off
    #[arg(long, default_value = "2.0")]
    tail: f32,

    /// Note-on velocity
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u8).range(1..=127))]
    velocity: u8,

    /// Tempo driving the arpeggiator and step sequencer
    #[arg(long, default_value = "120")]
    bpm: f32,

    /// Preset file (TOML)
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Parameter override, repeatable (e.g. "reverbMix=0.4")
    #[arg(long = "set", value_name = "ID=VALUE")]
    set: Vec<String>,

    /// Output sample rate in Hz
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

/// A note event at an absolute frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scheduled {
    frame: usize,
    message: MidiMessage,
}

/// Note-ons and note-offs for the whole render, in frame order.
///
/// Returns the schedule and the frame of the last note-off.
fn schedule(notes: &[u8], hold: usize, sequence: bool, velocity: u8) -> (Vec<Scheduled>, usize) {
    let mut events = Vec::with_capacity(notes.len() * 2);
    for (i, &note) in notes.iter().enumerate() {
        let start = if sequence { i * hold } else { 0 };
        events.push(Scheduled {
            frame: start,
            message: MidiMessage::NoteOn { channel: 1, note, velocity },
        });
        events.push(Scheduled {
            frame: start + hold,
            message: MidiMessage::NoteOff { channel: 1, note },
        });
    }
    // note-offs first on a shared frame so a repeated note retriggers
    events.sort_by_key(|e| (e.frame, matches!(e.message, MidiMessage::NoteOn { .. })));
    let end = events.last().map_or(0, |e| e.frame);
    (events, end)
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("block size must be at least 1");
    }
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("unsupported bit depth {} (use 16, 24, or 32)", args.bit_depth);
    }
    if args.length.is_nan() || args.length <= 0.0 || args.tail.is_nan() || args.tail < 0.0 {
        anyhow::bail!("note length must be positive and tail non-negative");
    }
    if args.bpm.is_nan() || args.bpm <= 0.0 {
        anyhow::bail!("tempo must be positive");
    }

    let manager = SampleManager::default();
    let sounds = manager.load(&args.samples)?;
    println!("Loaded {} sound(s) from {}", sounds, args.samples.display());

    let params = Arc::new(ParamStore::new());
    let preset = load_preset(&params, args.preset.as_deref())?;
    apply_overrides(&params, &args.set)?;

    let sample_rate = args.sample_rate as f32;
    let config = InstrumentConfig::default()
        .with_sample_rate(sample_rate)
        .with_max_block(args.block_size);
    let mut wolves = HowlingWolves::with_shared(config, params, Arc::clone(manager.bank()));
    wolves.prepare(sample_rate, args.block_size);
    if let Some(preset) = &preset {
        wolves.set_rhythm(preset.rhythm_steps());
    }

    let hold = ((args.length * sample_rate) as usize).max(1);
    let (events, last_off) = schedule(&args.notes, hold, args.sequence, args.velocity);
    let total = last_off + (args.tail * sample_rate) as usize;

    println!(
        "Rendering {} note(s), {:.2}s at {} Hz...",
        args.notes.len(),
        total as f32 / sample_rate,
        args.sample_rate
    );

    let mut left = vec![0.0f32; total];
    let mut right = vec![0.0f32; total];
    let transport = Transport::at(args.bpm);
    let mut midi = MidiBuffer::with_capacity(events.len());
    let mut pending = events.iter().peekable();

    for (block, (l, r)) in left
        .chunks_mut(args.block_size)
        .zip(right.chunks_mut(args.block_size))
        .enumerate()
    {
        let start = block * args.block_size;
        let end = start + l.len();
        midi.clear();
        while let Some(event) = pending.next_if(|e| e.frame < end) {
            midi.push((event.frame - start) as u32, event.message);
        }
        wolves.process(&mut [l, r], &midi, &transport);
    }

    let peak = left
        .iter()
        .chain(&right)
        .fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > 1.0 {
        tracing::warn!(peak, "output clips; lower the gain parameter");
    }

    let spec = WavSpec {
        channels: 2,
        sample_rate: args.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav(&args.output, &[left.as_slice(), right.as_slice()], spec)?;

    println!("  Peak {:.1} dB", 20.0 * peak.max(1e-10).log10());
    println!("Wrote {}", args.output.display());
    Ok(())
}

//! Howling Wolves: a sample-based instrument with arpeggiator, chord
//! generator, formant filter and a reorderable master effects chain.
//!
//! [`HowlingWolves`] is the whole per-block pipeline. It reads its
//! parameters from a shared [`howl_config::ParamStore`] and plays whatever
//! [`howl_synth::SharedSoundBank`] the sample loader last published.
//!
//! # Example
//!
//! ```rust
//! use howl_core::{MidiBuffer, MidiMessage};
//! use howl_instrument::{HowlingWolves, InstrumentConfig, Transport};
//!
//! let mut wolves = HowlingWolves::new(InstrumentConfig::default());
//! wolves.prepare(44100.0, 128);
//!
//! // No sound loaded: note-ons are ignored and the block is silent.
//! let mut midi = MidiBuffer::new();
//! midi.push(0, MidiMessage::NoteOn { channel: 1, note: 60, velocity: 100 });
//! let mut mono = vec![0.3f32; 128];
//! wolves.process(&mut [&mut mono[..]], &midi, &Transport::default());
//! assert!(mono.iter().all(|s| *s == 0.0));
//! ```

mod config;
mod processor;
mod snapshot;

pub use config::{DEFAULT_SAMPLE_RATE, InstrumentConfig, Transport, resolve_sample_rate};
pub use processor::HowlingWolves;
pub use snapshot::ParamSnapshot;

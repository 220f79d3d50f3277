//! Howl MIDI - note generation ahead of the sampler
//!
//! Each block's MIDI passes through two stages before it reaches the voices:
//!
//! - [`ChordEngine`] - Stacks intervals on every note, with a sustain-style hold
//! - [`Arpeggiator`] - Classic arpeggio, 16-step scale sequencer, or passthrough
//!
//! [`MidiProcessor`] runs them in that order on a [`howl_core::MidiBuffer`],
//! replacing its contents in place.
//!
//! ## Example
//!
//! ```rust
//! use howl_core::{MidiBuffer, MidiMessage};
//! use howl_midi::{ArpMode, ArpSettings, ChordMode, MidiProcessor};
//!
//! let mut midi_proc = MidiProcessor::new(48000.0);
//! midi_proc.set_chord(ChordMode::Major, false);
//! midi_proc.set_arp(ArpSettings { enabled: true, mode: ArpMode::Up, ..Default::default() });
//!
//! let mut midi = MidiBuffer::with_capacity(64);
//! midi.push(0, MidiMessage::NoteOn { channel: 1, note: 60, velocity: 100 });
//! midi_proc.process(&mut midi, 512, Some(120.0));
//!
//! // The held chord's lowest note fires at once.
//! assert_eq!(midi.iter().next().and_then(|e| e.message.note_on()), Some((60, 100)));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod arpeggiator;
pub mod chord;
pub mod processor;

pub use arpeggiator::{
    ArpMode, ArpSettings, Arpeggiator, GRID_STEPS, MIN_SAMPLES_PER_STEP, SCALE_DEGREES,
    rate_division,
};
pub use chord::{ChordEngine, ChordMode};
pub use processor::MidiProcessor;

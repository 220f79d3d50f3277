//! Howl Synth - sample playback for the Howling Wolves instrument
//!
//! # Sounds
//!
//! - [`Sound`] - Planar sample data with a key mapping and root note
//! - [`NoteSet`] - 128-bit note bitmap
//! - [`SoundBank`] - Immutable list of sounds, swapped whole on reload
//! - [`SharedSoundBank`] - `ArcSwap` publish/load handle (requires `std`)
//!
//! # Envelopes
//!
//! - [`AdsrEnvelope`] - Linear attack-decay-sustain-release, times in seconds
//! - [`EnvelopeState`] - Envelope stage tracking
//!
//! ```rust
//! use howl_synth::{AdsrEnvelope, AdsrParams};
//!
//! let mut env = AdsrEnvelope::new(48000.0);
//! env.set_parameters(AdsrParams { attack: 0.01, decay: 0.1, sustain: 0.7, release: 0.2 });
//! env.gate_on();
//! let level = env.advance();
//! assert!(level > 0.0);
//! ```
//!
//! # Voices
//!
//! - [`Voice`] - Sample cursor, declick and amplitude envelopes, SVF, LFO, pan
//! - [`SynthEngine`] - Eight-voice pool with sample-accurate MIDI handling
//! - [`VoiceStealing`] - What to take when the pool is full
//!
//! # no_std Support
//!
//! Without the default `std` feature the crate builds against `alloc`;
//! only [`SharedSoundBank`] is unavailable.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod engine;
pub mod envelope;
pub mod sound;
pub mod voice;

pub use engine::{SynthEngine, VOICE_COUNT, VoiceStealing};
pub use envelope::{AdsrEnvelope, AdsrParams, EnvelopeState};
#[cfg(feature = "std")]
pub use sound::SharedSoundBank;
pub use sound::{NoteSet, Sound, SoundBank};
pub use voice::{LfoTarget, SampleParams, Voice, VoiceParams};

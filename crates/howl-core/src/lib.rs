//! Howl Core - DSP and MIDI primitives for the Howling Wolves instrument
//!
//! Everything in this crate is allocation-free once constructed and safe to
//! call from the real-time audio thread. The higher-level crates
//! (`howl-effects`, `howl-synth`, `howl-midi`) are built from these pieces.
//!
//! # Processing
//!
//! - [`Effect`] - Object-safe trait for mono/stereo sample processors
//!
//! # Parameter Smoothing
//!
//! - [`SmoothedParam`] - Exponential (one-pole) smoothing
//! - [`LinearSmoothedParam`] - Linear ramps that land exactly on target
//!
//! # Filters and Delays
//!
//! - [`StateVariableFilter`] - TPT SVF with lowpass/highpass/bandpass/notch taps
//! - [`Biquad`] - Direct Form I biquad with RBJ band-pass coefficients
//! - [`InterpolatedDelay`] - Circular buffer with fractional reads
//! - [`CombFilter`] / [`AllpassFilter`] - Freeverb building blocks
//!
//! # Modulation and Dynamics
//!
//! - [`Lfo`] - Phase-accumulator LFO
//! - [`EnvelopeFollower`] - Rectified attack/release tracker
//!
//! # Timing and Events
//!
//! - [`NoteDivision`] - Tempo-relative step lengths
//! - [`MidiBuffer`] / [`MidiEvent`] / [`MidiMessage`] - Sample-stamped MIDI
//!
//! # Parameters
//!
//! - [`ParamDescriptor`] - Name, range, default and step for a host parameter
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build against `alloc` only. All
//! transcendental math goes through `libm`.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod allpass;
pub mod biquad;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod envelope;
pub mod lfo;
pub mod math;
pub mod midi;
pub mod param;
pub mod param_info;
pub mod svf;
pub mod tempo;

pub use allpass::AllpassFilter;
pub use biquad::{Biquad, bandpass_coefficients};
pub use comb::CombFilter;
pub use delay::{InterpolatedDelay, Interpolation};
pub use effect::Effect;
pub use envelope::EnvelopeFollower;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{
    constant_power_pan, db_to_linear, finite_or_zero, flush_denormal, lerp, linear_to_db,
    semitones_to_ratio,
};
pub use midi::{MidiBuffer, MidiEvent, MidiMessage};
pub use param::{LinearSmoothedParam, SmoothedParam};
pub use param_info::{ParamDescriptor, ParamScale, ParamUnit};
pub use svf::{StateVariableFilter, SvfMode, SvfOutputs, resonance_to_q};
pub use tempo::{DEFAULT_BPM, MIN_BPM, NoteDivision, resolve_bpm};

//! Howl Effects - the master effects chain
//!
//! Stages, each implementing [`howl_core::Effect`]:
//!
//! - [`Distortion`] - Tanh waveshaper with drive and mix
//! - [`TransientShaper`] - Fast/slow follower "bite"
//! - [`Delay`] - Stereo feedback delay
//! - [`Reverb`] - Freeverb-style stereo reverb
//!
//! [`EffectsProcessor`] runs them in a reorderable sequence. The
//! [`FilterProcessor`] (multimode SVF plus vowel formant bank) runs ahead of
//! the chain when the instrument's filter type is set to formant.
//!
//! ## Example
//!
//! ```rust
//! use howl_effects::{EffectParams, EffectsProcessor};
//!
//! let mut fx = EffectsProcessor::new(48000.0);
//! fx.set_chain_preset(3); // Delay → Reverb → Distortion → Bite
//! fx.update_parameters(&EffectParams { reverb_mix: 0.3, ..Default::default() });
//!
//! let mut left = [0.0f32; 128];
//! let mut right = [0.0f32; 128];
//! fx.process_stereo(&mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod chain;
pub mod delay;
pub mod distortion;
pub mod filter;
pub mod reverb;
pub mod transient;

pub use chain::{CHAIN_PRESETS, EffectParams, EffectStage, EffectsProcessor};
pub use delay::Delay;
pub use distortion::Distortion;
pub use filter::{FilterProcessor, FilterType, formant_table};
pub use reverb::{Reverb, ReverbParameters};
pub use transient::TransientShaper;

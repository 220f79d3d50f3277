//! Freeverb-style stereo reverb.
//!
//! Eight damped combs in parallel feed four allpasses in series, per
//! channel. The right tank uses delay lengths offset by [`STEREO_SPREAD`]
//! samples to decorrelate the channels. Both tanks receive the summed input.
//!
//! Parameters apply instantly; there is no internal smoothing.

use howl_core::{AllpassFilter, CombFilter, Effect};

/// Freeverb comb lengths at 44.1 kHz.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Freeverb allpass lengths at 44.1 kHz.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Extra samples added to every right-channel delay.
pub const STEREO_SPREAD: usize = 23;

const REFERENCE_RATE: f32 = 44100.0;
const INPUT_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 1.0;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const DAMP_SCALE: f32 = 0.4;

fn scale_to_rate(samples: usize, sample_rate: f32) -> usize {
    (libm::roundf(samples as f32 * sample_rate / REFERENCE_RATE) as usize).max(1)
}

/// User-facing reverb settings.
///
/// `wet_level + dry_level` is 1 after every update: [`Reverb::set_parameters`]
/// derives the dry level from the wet level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParameters {
    /// Room size in [0, 1].
    pub room_size: f32,
    /// High-frequency damping in [0, 1].
    pub damping: f32,
    /// Wet level in [0, 1].
    pub wet_level: f32,
    /// Dry level, always `1 - wet_level` once applied.
    pub dry_level: f32,
    /// Stereo width in [0, 1].
    pub width: f32,
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.0,
            dry_level: 1.0,
            width: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Tank {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
}

impl Tank {
    fn new(sample_rate: f32, spread: usize) -> Self {
        Self {
            combs: core::array::from_fn(|i| {
                CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i] + spread, sample_rate))
            }),
            allpasses: core::array::from_fn(|i| {
                AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i] + spread, sample_rate))
            }),
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(input);
        }
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }

    fn configure(&mut self, feedback: f32, damp: f32) {
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
            comb.set_damp(damp);
        }
    }

    fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }
}

/// Stereo Freeverb.
///
/// # Example
///
/// ```rust
/// use howl_core::Effect;
/// use howl_effects::Reverb;
///
/// let mut reverb = Reverb::new(48000.0);
/// reverb.set_room_size(0.8);
/// reverb.set_mix(0.3);
///
/// let p = reverb.parameters();
/// assert!((p.wet_level + p.dry_level - 1.0).abs() < 1e-6);
///
/// let (l, r) = reverb.process_stereo(1.0, 1.0);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    left: Tank,
    right: Tank,
    params: ReverbParameters,
    sample_rate: f32,
    // derived gains
    wet1: f32,
    wet2: f32,
    dry: f32,
}

impl Reverb {
    /// Create with room 0.5, damping 0.5, fully dry.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            left: Tank::new(sample_rate, 0),
            right: Tank::new(sample_rate, STEREO_SPREAD),
            params: ReverbParameters::default(),
            sample_rate,
            wet1: 0.0,
            wet2: 0.0,
            dry: 0.0,
        };
        reverb.apply();
        reverb
    }

    /// Replace all settings at once. Values are clamped to [0, 1] and
    /// `dry_level` is replaced by `1 - wet_level`.
    pub fn set_parameters(&mut self, params: ReverbParameters) {
        let wet_level = params.wet_level.clamp(0.0, 1.0);
        self.params = ReverbParameters {
            room_size: params.room_size.clamp(0.0, 1.0),
            damping: params.damping.clamp(0.0, 1.0),
            wet_level,
            dry_level: 1.0 - wet_level,
            width: params.width.clamp(0.0, 1.0),
        };
        self.apply();
    }

    /// Current settings.
    pub fn parameters(&self) -> ReverbParameters {
        self.params
    }

    /// Room size in [0, 1]; larger rooms ring longer.
    pub fn set_room_size(&mut self, size: f32) {
        self.set_parameters(ReverbParameters {
            room_size: size,
            ..self.params
        });
    }

    /// Damping in [0, 1]; higher is darker.
    pub fn set_damping(&mut self, damping: f32) {
        self.set_parameters(ReverbParameters {
            damping,
            ..self.params
        });
    }

    /// Set `wet = mix`, `dry = 1 - mix`, width 1.
    pub fn set_mix(&mut self, mix: f32) {
        self.set_parameters(ReverbParameters {
            wet_level: mix,
            width: 1.0,
            ..self.params
        });
    }

    /// True when the wet level is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.params.wet_level == 0.0
    }

    fn apply(&mut self) {
        let p = self.params;
        let wet = p.wet_level * WET_SCALE;
        self.wet1 = wet * (p.width * 0.5 + 0.5);
        self.wet2 = wet * ((1.0 - p.width) * 0.5);
        self.dry = p.dry_level * DRY_SCALE;

        let feedback = p.room_size * ROOM_SCALE + ROOM_OFFSET;
        let damp = p.damping * DAMP_SCALE;
        self.left.configure(feedback, damp);
        self.right.configure(feedback, damp);
    }
}

impl Effect for Reverb {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let out = self.left.process(input * INPUT_GAIN);
        out * self.wet1 + input * self.dry
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let input = (left + right) * INPUT_GAIN;
        let out_l = self.left.process(input);
        let out_r = self.right.process(input);
        (
            out_l * self.wet1 + out_r * self.wet2 + left * self.dry,
            out_r * self.wet1 + out_l * self.wet2 + right * self.dry,
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.left = Tank::new(sample_rate, 0);
            self.right = Tank::new(sample_rate, STEREO_SPREAD);
            self.apply();
        }
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wet_plus_dry_is_one() {
        let mut reverb = Reverb::new(44100.0);
        for mix in [0.0, 0.1, 0.37, 0.5, 0.99, 1.0, 1.5, -0.2] {
            reverb.set_mix(mix);
            let p = reverb.parameters();
            assert!((p.wet_level + p.dry_level - 1.0).abs() < 1e-6, "mix {mix}");
            assert_eq!(p.width, 1.0);
        }
    }

    #[test]
    fn set_parameters_derives_dry_from_wet() {
        let mut reverb = Reverb::new(44100.0);
        reverb.set_parameters(ReverbParameters {
            wet_level: 0.5,
            dry_level: 0.8,
            ..ReverbParameters::default()
        });
        let p = reverb.parameters();
        assert_eq!(p.wet_level, 0.5);
        assert_eq!(p.dry_level, 0.5);

        reverb.set_parameters(ReverbParameters {
            wet_level: 2.0,
            dry_level: 1.0,
            ..p
        });
        assert_eq!(reverb.parameters().dry_level, 0.0);
    }

    #[test]
    fn dry_only_passes_input() {
        let mut reverb = Reverb::new(44100.0);
        reverb.set_mix(0.0);
        assert!(reverb.is_silent());
        for x in [0.5, -0.25, 1.0] {
            assert_eq!(reverb.process_stereo(x, x), (x, x));
        }
    }

    #[test]
    fn produces_a_decaying_tail() {
        let mut reverb = Reverb::new(44100.0);
        reverb.set_room_size(0.7);
        reverb.set_mix(1.0);
        reverb.process_stereo(1.0, 1.0);

        let mut early = 0.0f32;
        let mut late = 0.0f32;
        for n in 0..(44100 * 4) {
            let (l, r) = reverb.process_stereo(0.0, 0.0);
            assert!(l.is_finite() && r.is_finite());
            if n < 44100 {
                early += l * l;
            } else if n >= 44100 * 3 {
                late += l * l;
            }
        }
        assert!(early > 0.0);
        assert!(late < early * 0.1, "early {early} late {late}");
    }

    #[test]
    fn channels_are_decorrelated() {
        let mut reverb = Reverb::new(44100.0);
        reverb.set_mix(1.0);
        reverb.process_stereo(1.0, 1.0);
        let mut differs = false;
        for _ in 0..4000 {
            let (l, r) = reverb.process_stereo(0.0, 0.0);
            differs |= (l - r).abs() > 1e-6;
        }
        assert!(differs);
    }

    #[test]
    fn reset_silences_tail() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(1.0);
        for _ in 0..1000 {
            reverb.process_stereo(0.5, -0.5);
        }
        reverb.reset();
        assert_eq!(reverb.process_stereo(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn lengths_scale_with_rate() {
        assert_eq!(scale_to_rate(1116, 44100.0), 1116);
        assert_eq!(scale_to_rate(1116, 88200.0), 2232);
        assert_eq!(scale_to_rate(0, 44100.0), 1);
    }
}

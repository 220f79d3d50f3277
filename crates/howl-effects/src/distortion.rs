//! Tanh waveshaping distortion with dry/wet mix.

use howl_core::{Effect, LinearSmoothedParam};
use libm::tanhf;

/// Ramp time for drive and mix.
const SMOOTHING_MS: f32 = 50.0;

/// Soft-clipping distortion.
///
/// `gain = 1 + drive * 49`, `wet = tanh(dry * gain)`,
/// `out = dry * (1 - mix) + wet * mix`. Drive and mix are in [0, 1] and
/// ramp independently.
///
/// # Example
///
/// ```rust
/// use howl_core::Effect;
/// use howl_effects::Distortion;
///
/// let mut dist = Distortion::new(48000.0);
/// dist.set_drive(1.0);
/// dist.set_mix(1.0);
/// dist.reset();
///
/// let out = dist.process(0.1);
/// assert!((out - libm::tanhf(0.1 * 50.0)).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Distortion {
    drive: LinearSmoothedParam,
    mix: LinearSmoothedParam,
}

impl Distortion {
    /// Create with drive 0 and mix 0 (transparent).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            drive: LinearSmoothedParam::with_config(0.0, sample_rate, SMOOTHING_MS),
            mix: LinearSmoothedParam::with_config(0.0, sample_rate, SMOOTHING_MS),
        }
    }

    /// Drive amount, clamped to [0, 1].
    pub fn set_drive(&mut self, drive: f32) {
        self.drive.set_target(drive.clamp(0.0, 1.0));
    }

    /// Target drive.
    pub fn drive(&self) -> f32 {
        self.drive.target()
    }

    /// Wet proportion, clamped to [0, 1].
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Target mix.
    pub fn mix(&self) -> f32 {
        self.mix.target()
    }

    #[inline]
    fn shape(dry: f32, gain: f32, mix: f32) -> f32 {
        let wet = tanhf(dry * gain);
        dry * (1.0 - mix) + wet * mix
    }
}

impl Effect for Distortion {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let gain = 1.0 + self.drive.advance() * 49.0;
        let mix = self.mix.advance();
        Self::shape(input, gain, mix)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let gain = 1.0 + self.drive.advance() * 49.0;
        let mix = self.mix.advance();
        (Self::shape(left, gain, mix), Self::shape(right, gain, mix))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.drive.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.drive.snap_to_target();
        self.mix.snap_to_target();
    }
}

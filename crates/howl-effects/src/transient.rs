//! Transient shaper ("bite").
//!
//! Two envelope followers per channel with the same release but different
//! attack times. During an onset the fast follower runs ahead of the slow one;
//! their ratio drives a gain that emphasizes (positive bite) or softens
//! (negative bite) the attack.
//!
//! ```text
//! ratio = fast / max(slow, 1e-6)
//! gain  = clamp(1 + bite * (ratio - 1), 0, 4)
//! out   = in * gain
//! ```

use howl_core::{Effect, EnvelopeFollower, LinearSmoothedParam};

const FAST_ATTACK_MS: f32 = 2.0;
const SLOW_ATTACK_MS: f32 = 20.0;
const RELEASE_MS: f32 = 100.0;
const MAX_GAIN: f32 = 4.0;

/// Stereo transient shaper.
///
/// # Example
///
/// ```rust
/// use howl_core::Effect;
/// use howl_effects::TransientShaper;
///
/// let mut shaper = TransientShaper::new(48000.0);
/// shaper.set_bite(1.0);
/// shaper.reset();
///
/// // The very first sample of an onset gets the largest boost.
/// let (l, _) = shaper.process_stereo(0.5, 0.5);
/// assert!(l > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct TransientShaper {
    fast: [EnvelopeFollower; 2],
    slow: [EnvelopeFollower; 2],
    bite: LinearSmoothedParam,
}

impl TransientShaper {
    /// Create with bite 0 (unity gain).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            fast: [
                EnvelopeFollower::with_times(sample_rate, FAST_ATTACK_MS, RELEASE_MS),
                EnvelopeFollower::with_times(sample_rate, FAST_ATTACK_MS, RELEASE_MS),
            ],
            slow: [
                EnvelopeFollower::with_times(sample_rate, SLOW_ATTACK_MS, RELEASE_MS),
                EnvelopeFollower::with_times(sample_rate, SLOW_ATTACK_MS, RELEASE_MS),
            ],
            bite: LinearSmoothedParam::with_config(0.0, sample_rate, 50.0),
        }
    }

    /// Bite amount in [-1, 1]: negative softens, positive punches.
    pub fn set_bite(&mut self, bite: f32) {
        self.bite.set_target(bite.clamp(-1.0, 1.0));
    }

    /// Target bite.
    pub fn bite(&self) -> f32 {
        self.bite.target()
    }

    #[inline]
    fn shape(&mut self, channel: usize, input: f32, bite: f32) -> f32 {
        let fast = self.fast[channel].process(input);
        let slow = self.slow[channel].process(input);
        let ratio = fast / slow.max(1e-6);
        let gain = (1.0 + bite * (ratio - 1.0)).clamp(0.0, MAX_GAIN);
        input * gain
    }
}

impl Effect for TransientShaper {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let bite = self.bite.advance();
        self.shape(0, input, bite)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let bite = self.bite.advance();
        (self.shape(0, left, bite), self.shape(1, right, bite))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        for env in self.fast.iter_mut().chain(self.slow.iter_mut()) {
            env.set_sample_rate(sample_rate);
        }
        self.bite.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        for env in self.fast.iter_mut().chain(self.slow.iter_mut()) {
            env.reset();
        }
        self.bite.snap_to_target();
    }
}

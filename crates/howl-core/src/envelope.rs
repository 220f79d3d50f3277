//! Rectified attack/release envelope follower.
//!
//! The transient shaper runs two of these per channel with different attack
//! times and compares their levels.

use libm::expf;

/// One-pole peak follower with separate attack and release times.
///
/// `level = c · level + (1 - c) · |x|`, with `c` the attack coefficient while
/// the input is above the current level and the release coefficient
/// otherwise. Coefficients are `exp(-1 / (ms · sr / 1000))`.
///
/// ```rust
/// use howl_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::with_times(48000.0, 2.0, 100.0);
/// for _ in 0..960 {
///     env.process(-0.8);
/// }
/// assert!(env.level() > 0.7);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    level: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
    attack_ms: f32,
    release_ms: f32,
}

impl EnvelopeFollower {
    /// Create with 10 ms attack and 100 ms release.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_times(sample_rate, 10.0, 100.0)
    }

    /// Create with explicit attack and release times in milliseconds.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            level: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: attack_ms.max(0.1),
            release_ms: release_ms.max(1.0),
        };
        follower.update_coefficients();
        follower
    }

    /// Set attack time (minimum 0.1 ms).
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(0.1);
        self.update_coefficients();
    }

    /// Attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set release time (minimum 1 ms).
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(1.0);
        self.update_coefficients();
    }

    /// Release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Recompute coefficients for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    /// Feed one sample and return the updated level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let rectified = input.abs();
        let coeff = if rectified > self.level {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.level = coeff * self.level + (1.0 - coeff) * rectified;
        self.level
    }

    /// Current level without consuming input.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Drop the level to zero.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }

    fn update_coefficients(&mut self) {
        let per_ms = self.sample_rate / 1000.0;
        self.attack_coeff = expf(-1.0 / (self.attack_ms * per_ms));
        self.release_coeff = expf(-1.0 / (self.release_ms * per_ms));
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

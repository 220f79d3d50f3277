//! Parameter smoothing.
//!
//! Every control value that reaches the audio path (drive, mix, delay time,
//! bite amount, master gain) passes through a smoother so host automation and
//! randomization never produce zipper noise.
//!
//! - [`LinearSmoothedParam`] ramps at a constant rate and lands exactly on the
//!   target after the configured time. The effects chain uses it with a 50 ms
//!   ramp.
//! - [`SmoothedParam`] is a one-pole lowpass that approaches the target
//!   asymptotically.
//!
//! Both must be told about sample-rate changes; doing so snaps them to their
//! current target.
//!
//! ```rust
//! use howl_core::LinearSmoothedParam;
//!
//! let mut mix = LinearSmoothedParam::with_config(0.0, 48000.0, 50.0);
//! mix.set_target(1.0);
//! for _ in 0..2400 {
//!     mix.advance();
//! }
//! assert_eq!(mix.get(), 1.0);
//! ```

use libm::expf;

/// One-pole exponential smoother.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// Fraction of the remaining distance covered per sample (1 = instant).
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create an unsmoothed parameter holding `initial`.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 44100.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create with a sample rate and time constant in milliseconds.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.update_coeff();
        param
    }

    /// Set the value to move towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value`.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Change the sample rate and snap to the target.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coeff();
        self.current = self.target;
    }

    /// Change the time constant.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.update_coeff();
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once within 1e-6 of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Jump to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    // coeff = 1 - e^(-1 / (tau * sr)), tau in seconds
    fn update_coeff(&mut self) {
        self.coeff = if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            1.0
        } else {
            let samples = self.smoothing_time_ms * 0.001 * self.sample_rate;
            1.0 - expf(-1.0 / samples)
        };
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Constant-rate smoother that reaches its target after a fixed ramp time.
///
/// A new target restarts the ramp from the current value, so repeated
/// automation never overshoots. After `ramp_ms * sr / 1000` calls to
/// [`advance`](Self::advance) the value equals the target exactly.
#[derive(Debug, Clone)]
pub struct LinearSmoothedParam {
    current: f32,
    target: f32,
    step: f32,
    steps_left: u32,
    sample_rate: f32,
    ramp_ms: f32,
}

impl LinearSmoothedParam {
    /// Create at `initial` with a 50 ms ramp at 44.1 kHz.
    pub fn new(initial: f32) -> Self {
        Self::with_config(initial, 44100.0, 50.0)
    }

    /// Create with a sample rate and ramp time in milliseconds.
    pub fn with_config(initial: f32, sample_rate: f32, ramp_ms: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            steps_left: 0,
            sample_rate,
            ramp_ms,
        }
    }

    /// Start a ramp towards `target`. A repeated target is ignored.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;

        let steps = self.ramp_len();
        if steps == 0 {
            self.snap_to_target();
        } else {
            self.step = (target - self.current) / steps as f32;
            self.steps_left = steps;
        }
    }

    /// Jump straight to `value`.
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.snap_to_target();
    }

    /// Change the sample rate and snap to the target.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.snap_to_target();
    }

    /// Change the ramp time used by subsequent targets.
    pub fn set_ramp_ms(&mut self, ramp_ms: f32) {
        self.ramp_ms = ramp_ms;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.steps_left > 0 {
            self.steps_left -= 1;
            self.current = if self.steps_left == 0 {
                self.target
            } else {
                self.current + self.step
            };
        }
        self.current
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True when no ramp is in progress.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.steps_left == 0
    }

    /// Jump to the target and stop ramping.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.step = 0.0;
        self.steps_left = 0;
    }

    fn ramp_len(&self) -> u32 {
        if self.ramp_ms <= 0.0 || self.sample_rate <= 0.0 {
            0
        } else {
            (self.ramp_ms * 0.001 * self.sample_rate) as u32
        }
    }
}

impl Default for LinearSmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_time_is_instant() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 0.0);
        p.set_target(0.75);
        assert_eq!(p.advance(), 0.75);
    }

    #[test]
    fn one_pole_hits_63_percent_after_tau() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        for _ in 0..480 {
            p.advance();
        }
        let expected = 1.0 - expf(-1.0);
        assert!((p.get() - expected).abs() < 0.01, "got {}", p.get());
    }

    #[test]
    fn one_pole_sample_rate_change_snaps() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        p.advance();
        p.set_sample_rate(96000.0);
        assert!(p.is_settled());
        assert_eq!(p.get(), 1.0);
    }

    #[test]
    fn linear_lands_exactly_after_ramp() {
        let mut p = LinearSmoothedParam::with_config(0.0, 48000.0, 50.0);
        p.set_target(1.0);
        for _ in 0..2399 {
            p.advance();
        }
        assert!(!p.is_settled());
        assert!(p.get() < 1.0);
        p.advance();
        assert!(p.is_settled());
        assert_eq!(p.get(), 1.0);
    }

    #[test]
    fn linear_is_halfway_at_half_time() {
        let mut p = LinearSmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(2.0);
        for _ in 0..240 {
            p.advance();
        }
        assert!((p.get() - 1.0).abs() < 1e-3, "got {}", p.get());
    }

    #[test]
    fn linear_retarget_mid_ramp_starts_from_current() {
        let mut p = LinearSmoothedParam::with_config(0.0, 1000.0, 10.0);
        p.set_target(1.0);
        for _ in 0..5 {
            p.advance();
        }
        let mid = p.get();
        p.set_target(0.0);
        p.advance();
        assert!(p.get() < mid);
        for _ in 0..10 {
            p.advance();
        }
        assert_eq!(p.get(), 0.0);
    }

    #[test]
    fn linear_same_target_does_not_restart() {
        let mut p = LinearSmoothedParam::with_config(0.0, 1000.0, 10.0);
        p.set_target(1.0);
        for _ in 0..9 {
            p.advance();
        }
        p.set_target(1.0);
        p.advance();
        assert!(p.is_settled());
    }
}

//! Feedback delay.

use howl_core::{Effect, InterpolatedDelay, LinearSmoothedParam};

/// Longest delay the line is sized for unless configured otherwise.
pub const DEFAULT_MAX_DELAY_SECS: f32 = 2.0;

/// Highest feedback accepted.
pub const MAX_FEEDBACK: f32 = 0.95;

const SMOOTHING_MS: f32 = 50.0;

/// Stereo feedback delay with an additive wet path.
///
/// Per sample, with `d = clamp(time * sr, 1, max)`:
///
/// ```text
/// delayed = line[d]
/// line   <- input + delayed * feedback
/// out     = input + delayed * mix
/// ```
///
/// An impulse therefore returns every `d` samples with amplitude
/// `mix * feedback^(n - 1)` on the n-th echo.
///
/// # Example
///
/// ```rust
/// use howl_core::Effect;
/// use howl_effects::Delay;
///
/// let mut delay = Delay::new(40.0);
/// delay.set_time(0.25);
/// delay.set_feedback(0.5);
/// delay.set_mix(1.0);
/// delay.reset();
///
/// let out: Vec<f32> = (0..25).map(|n| delay.process(if n == 0 { 1.0 } else { 0.0 })).collect();
/// assert_eq!(out[10], 1.0);
/// assert_eq!(out[20], 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Delay {
    lines: [InterpolatedDelay; 2],
    time: LinearSmoothedParam,
    feedback: LinearSmoothedParam,
    mix: LinearSmoothedParam,
    sample_rate: f32,
    max_delay_secs: f32,
}

impl Delay {
    /// Create with a 2 s line, 0.5 s time, 0.3 feedback and mix 0.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_max_delay(sample_rate, DEFAULT_MAX_DELAY_SECS)
    }

    /// Create with a line holding `max_delay_secs`.
    pub fn with_max_delay(sample_rate: f32, max_delay_secs: f32) -> Self {
        let max_delay_secs = max_delay_secs.max(0.001);
        Self {
            lines: [
                InterpolatedDelay::from_time(sample_rate, max_delay_secs),
                InterpolatedDelay::from_time(sample_rate, max_delay_secs),
            ],
            time: LinearSmoothedParam::with_config(
                0.5f32.min(max_delay_secs),
                sample_rate,
                SMOOTHING_MS,
            ),
            feedback: LinearSmoothedParam::with_config(0.3, sample_rate, SMOOTHING_MS),
            mix: LinearSmoothedParam::with_config(0.0, sample_rate, SMOOTHING_MS),
            sample_rate,
            max_delay_secs,
        }
    }

    /// Delay time in seconds, clamped to the line length.
    pub fn set_time(&mut self, seconds: f32) {
        self.time.set_target(seconds.clamp(0.0, self.max_delay_secs));
    }

    /// Target delay time in seconds.
    pub fn time(&self) -> f32 {
        self.time.target()
    }

    /// Feedback, clamped to [0, 0.95].
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, MAX_FEEDBACK));
    }

    /// Target feedback.
    pub fn feedback(&self) -> f32 {
        self.feedback.target()
    }

    /// Echo level, clamped to [0, 1].
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Target mix.
    pub fn mix(&self) -> f32 {
        self.mix.target()
    }

    /// Configured maximum delay in seconds.
    pub fn max_delay_secs(&self) -> f32 {
        self.max_delay_secs
    }

    /// Advance all smoothers and return `(delay_samples, feedback, mix)`.
    #[inline]
    fn tick(&mut self) -> (f32, f32, f32) {
        let max = self.max_delay_secs * self.sample_rate;
        let d = (self.time.advance() * self.sample_rate).clamp(1.0, max);
        (d, self.feedback.advance(), self.mix.advance())
    }

    #[inline]
    fn run_line(line: &mut InterpolatedDelay, input: f32, d: f32, fb: f32, mix: f32) -> f32 {
        // read(0) is the previous write, so d samples back is d - 1
        let delayed = line.read(d - 1.0);
        line.write(input + delayed * fb);
        input + delayed * mix
    }
}

impl Effect for Delay {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let (d, fb, mix) = self.tick();
        Self::run_line(&mut self.lines[0], input, d, fb, mix)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let (d, fb, mix) = self.tick();
        let [l_line, r_line] = &mut self.lines;
        (
            Self::run_line(l_line, left, d, fb, mix),
            Self::run_line(r_line, right, d, fb, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lines = [
            InterpolatedDelay::from_time(sample_rate, self.max_delay_secs),
            InterpolatedDelay::from_time(sample_rate, self.max_delay_secs),
        ];
        self.time.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.time.snap_to_target();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_response(delay: &mut Delay, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| delay.process(if n == 0 { 1.0 } else { 0.0 }))
            .collect()
    }

    #[test]
    fn echoes_decay_by_feedback() {
        let sr = 48000.0;
        let mut delay = Delay::new(sr);
        delay.set_time(0.1);
        delay.set_feedback(0.6);
        delay.set_mix(0.8);
        delay.reset();

        let period = 4800;
        let out = impulse_response(&mut delay, period * 5 + 1);
        assert_eq!(out[0], 1.0);
        let echoes: Vec<f32> = (1..=5).map(|k| out[k * period]).collect();
        assert!((echoes[0] - 0.8).abs() < 1e-6);
        for pair in echoes.windows(2) {
            assert!((pair[1] / pair[0] - 0.6).abs() < 1e-4, "{pair:?}");
        }
        let stray = out
            .iter()
            .enumerate()
            .filter(|(n, v)| n % period != 0 && v.abs() > 1e-6)
            .count();
        assert_eq!(stray, 0);
    }

    #[test]
    fn zero_mix_passes_input() {
        let mut delay = Delay::new(48000.0);
        delay.set_feedback(0.9);
        delay.reset();
        for x in [0.1, -0.5, 0.9] {
            assert_eq!(delay.process(x), x);
        }
    }

    #[test]
    fn feedback_is_clamped() {
        let mut delay = Delay::new(48000.0);
        delay.set_feedback(2.0);
        assert_eq!(delay.feedback(), MAX_FEEDBACK);
        delay.set_feedback(-1.0);
        assert_eq!(delay.feedback(), 0.0);
    }

    #[test]
    fn time_clamps_to_configured_max() {
        let mut delay = Delay::with_max_delay(48000.0, 0.25);
        delay.set_time(1.0);
        assert_eq!(delay.time(), 0.25);
        delay.set_time(0.0);
        delay.set_mix(1.0);
        delay.reset();
        // below one sample the delay floors at 1
        let out = impulse_response(&mut delay, 3);
        assert_eq!(out[1], 1.0);
    }

    #[test]
    fn stays_finite_at_max_feedback() {
        let mut delay = Delay::new(44100.0);
        delay.set_time(0.01);
        delay.set_feedback(1.0);
        delay.set_mix(1.0);
        delay.reset();
        for n in 0..200_000 {
            let (l, r) = delay.process_stereo(if n % 441 == 0 { 1.0 } else { 0.0 }, 0.0);
            assert!(l.is_finite() && r.is_finite());
        }
    }
}

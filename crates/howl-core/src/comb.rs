//! Damped feedback comb, the resonant core of the Freeverb tank.

use crate::{InterpolatedDelay, flush_denormal};

/// Feedback comb with a one-pole lowpass in the loop.
///
/// The loop length equals the buffer size. `damp` controls how much high
/// frequency energy each pass through the loop loses.
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: InterpolatedDelay,
    feedback: f32,
    damp: f32,
    lowpass_state: f32,
}

impl CombFilter {
    /// Create a comb with a loop of `length` samples.
    pub fn new(length: usize) -> Self {
        Self {
            line: InterpolatedDelay::new(length),
            feedback: 0.5,
            damp: 0.5,
            lowpass_state: 0.0,
        }
    }

    /// Loop gain, clamped to [0, 0.99].
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// Loop gain.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// High-frequency damping in [0, 1] (1 is darkest).
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Damping amount.
    pub fn damp(&self) -> f32 {
        self.damp
    }

    /// Push one sample and return the loop output.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let out = self.line.read((self.line.capacity() - 1) as f32);
        self.lowpass_state =
            flush_denormal(out * (1.0 - self.damp) + self.lowpass_state * self.damp);
        self.line.write(input + self.lowpass_state * self.feedback);
        out
    }

    /// Silence the loop.
    pub fn clear(&mut self) {
        self.line.clear();
        self.lowpass_state = 0.0;
    }

    /// Loop length in samples.
    pub fn len(&self) -> usize {
        self.line.capacity()
    }

    /// Always false; a comb holds at least one sample.
    pub fn is_empty(&self) -> bool {
        false
    }
}

//! Schroeder allpass used for reverb diffusion.

use crate::{InterpolatedDelay, flush_denormal};

/// Freeverb-style allpass: `out = delayed - in`,
/// `write = in + delayed * feedback`.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: InterpolatedDelay,
    feedback: f32,
}

impl AllpassFilter {
    /// Create with a delay of `length` samples and feedback 0.5.
    pub fn new(length: usize) -> Self {
        Self {
            line: InterpolatedDelay::new(length),
            feedback: 0.5,
        }
    }

    /// Set feedback, clamped to (-1, 1).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Current feedback.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.read((self.line.capacity() - 1) as f32);
        self.line
            .write(flush_denormal(input + delayed * self.feedback));
        delayed - input
    }

    /// Zero the delay line.
    pub fn clear(&mut self) {
        self.line.clear();
    }
}

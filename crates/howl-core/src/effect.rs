//! The [`Effect`] trait shared by every processing stage.
//!
//! Stages work one sample at a time so that a chain can inspect each output
//! (for the non-finite guard) without intermediate buffers. Block helpers are
//! provided as default methods.
//!
//! Stereo stages keep separate state per channel and override
//! [`Effect::process_stereo`]; the default runs the mono path twice, which is
//! only correct for stateless stages.

/// A real-time audio processing stage.
///
/// Implementations must not allocate or block in any `process*` method.
///
/// # Example
///
/// ```rust
/// use howl_core::Effect;
///
/// struct Trim(f32);
///
/// impl Effect for Trim {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///     fn reset(&mut self) {}
/// }
///
/// let mut trim = Trim(0.5);
/// assert_eq!(trim.process_stereo(1.0, -1.0), (0.5, -0.5));
/// ```
pub trait Effect {
    /// Process one mono sample (left-channel state for stereo stages).
    fn process(&mut self, input: f32) -> f32;

    /// Process one stereo frame.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.process(left), self.process(right))
    }

    /// Process a mono buffer in place.
    fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Process a pair of channel buffers in place.
    ///
    /// Processes `min(left.len(), right.len())` frames.
    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (out_l, out_r) = self.process_stereo(*l, *r);
            *l = out_l;
            *r = out_r;
        }
    }

    /// Recompute sample-rate dependent state.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (delay lines, filter history, followers).
    ///
    /// Smoothed parameters snap to their targets.
    fn reset(&mut self);

    /// Latency introduced by the stage, in samples.
    fn latency_samples(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Invert;

    impl Effect for Invert {
        fn process(&mut self, input: f32) -> f32 {
            -input
        }
        fn set_sample_rate(&mut self, _sample_rate: f32) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn default_block_methods_use_per_sample_path() {
        let mut fx = Invert;
        let mut mono = [1.0, -2.0, 3.0];
        fx.process_block(&mut mono);
        assert_eq!(mono, [-1.0, 2.0, -3.0]);

        let mut left = [0.5, 0.25];
        let mut right = [-0.5, 1.0];
        fx.process_block_stereo(&mut left, &mut right);
        assert_eq!(left, [-0.5, -0.25]);
        assert_eq!(right, [0.5, -1.0]);
        assert_eq!(fx.latency_samples(), 0);
    }
}

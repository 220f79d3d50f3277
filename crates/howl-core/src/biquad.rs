//! Direct Form I biquad and RBJ band-pass coefficients.
//!
//! The formant bank runs five of these in parallel per channel.

use core::f32::consts::PI;
use libm::sincosf;

/// Second-order IIR section.
///
/// ```text
/// y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Pass-through section.
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Load raw coefficients, normalising by `a0`. History is kept.
    pub fn set_coefficients(&mut self, coeffs: (f32, f32, f32, f32, f32, f32)) {
        let (b0, b1, b2, a0, a1, a2) = coeffs;
        let inv = 1.0 / a0;
        self.b0 = b0 * inv;
        self.b1 = b1 * inv;
        self.b2 = b2 * inv;
        self.a1 = a1 * inv;
        self.a2 = a2 * inv;
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = crate::flush_denormal(output);

        output
    }

    /// Zero the history, keeping coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// RBJ cookbook band-pass with 0 dB peak gain.
///
/// Returns `(b0, b1, b2, a0, a1, a2)`; feed it to
/// [`Biquad::set_coefficients`].
pub fn bandpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let (sin_w, cos_w) = sincosf(omega);
    let alpha = sin_w / (2.0 * q);

    (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_passthrough() {
        let mut bq = Biquad::default();
        for x in [0.3, -1.0, 0.8] {
            assert_eq!(bq.process(x), x);
        }
    }

    #[test]
    fn bandpass_rejects_dc() {
        let mut bq = Biquad::new();
        bq.set_coefficients(bandpass_coefficients(1000.0, 2.0, 48000.0));
        let mut y = 0.0;
        for _ in 0..20000 {
            y = bq.process(1.0);
        }
        assert!(y.abs() < 1e-4, "dc leak {y}");
    }

    #[test]
    fn bandpass_unity_at_centre() {
        let sr = 48000.0;
        let f = 2000.0;
        let mut bq = Biquad::new();
        bq.set_coefficients(bandpass_coefficients(f, 5.0, sr));
        let mut peak = 0.0f32;
        for n in 0..24000 {
            let y = bq.process(libm::sinf(2.0 * PI * f * n as f32 / sr));
            if n > 12000 {
                peak = peak.max(y.abs());
            }
        }
        assert!((peak - 1.0).abs() < 0.02, "peak {peak}");
    }

    #[test]
    fn clear_resets_history() {
        let mut bq = Biquad::new();
        bq.set_coefficients(bandpass_coefficients(500.0, 1.0, 48000.0));
        bq.process(1.0);
        bq.clear();
        let mut fresh = Biquad::new();
        fresh.set_coefficients(bandpass_coefficients(500.0, 1.0, 48000.0));
        assert_eq!(bq.process(0.5), fresh.process(0.5));
    }
}

//! Small DSP math helpers.
//!
//! All functions are allocation-free and `no_std` friendly.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Level conversions
//! - [`semitones_to_ratio`] - Pitch offset to playback-rate ratio
//! - [`constant_power_pan`] - Equal-power stereo gains
//! - [`flush_denormal`] / [`finite_or_zero`] - Numeric hygiene

use core::f32::consts::FRAC_PI_4;
use libm::{exp2f, expf, logf, sincosf};

/// Convert decibels to linear gain.
///
/// ```rust
/// use howl_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
/// assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-3);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels. Gains at or below zero map to -120 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        return -120.0;
    }
    20.0 * logf(linear) / core::f32::consts::LN_10
}

/// Frequency ratio for a pitch offset in semitones (`2^(st/12)`).
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    exp2f(semitones / 12.0)
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Constant-power pan gains `(left, right)` for `pan` in [-1, 1].
///
/// `θ = (pan + 1) · π/4`, `left = cos θ`, `right = sin θ`. Centre gives
/// `1/√2` on both sides.
///
/// ```rust
/// use howl_core::constant_power_pan;
///
/// let (l, r) = constant_power_pan(-1.0);
/// assert!((l - 1.0).abs() < 1e-6 && r.abs() < 1e-6);
/// ```
#[inline]
pub fn constant_power_pan(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    let (sin, cos) = sincosf(angle);
    (cos, sin)
}

/// Flush values below ~1e-20 to zero.
///
/// Feedback paths decaying towards silence otherwise end up in denormal
/// territory, which is very slow on most CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Replace NaN or infinity with zero.
#[inline]
pub fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trip() {
        for db in [-48.0, -12.0, 0.0, 6.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} -> {back}");
        }
        assert_eq!(linear_to_db(0.0), -120.0);
    }

    #[test]
    fn octave_ratio() {
        assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-5);
        assert!((semitones_to_ratio(-12.0) - 0.5).abs() < 1e-6);
        assert_eq!(semitones_to_ratio(0.0), 1.0);
    }

    #[test]
    fn pan_is_constant_power() {
        for i in 0..=20 {
            let pan = -1.0 + i as f32 * 0.1;
            let (l, r) = constant_power_pan(pan);
            assert!((l * l + r * r - 1.0).abs() < 1e-5, "pan {pan}");
        }
        let (l, r) = constant_power_pan(0.0);
        assert!((l - r).abs() < 1e-6);
        assert!((l - core::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn hygiene_helpers() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
        assert_eq!(finite_or_zero(f32::NAN), 0.0);
        assert_eq!(finite_or_zero(f32::NEG_INFINITY), 0.0);
        assert_eq!(finite_or_zero(-0.25), -0.25);
        assert_eq!(lerp(2.0, 4.0, 0.25), 2.5);
    }
}

//! Topology-preserving state variable filter.
//!
//! Zavalishin's TPT SVF ("The Art of VA Filter Design", ch. 3). The
//! trapezoidal integrators keep the filter stable while the cutoff is swept
//! every sample, which the voices do under LFO modulation.
//!
//! One tick produces every tap at once ([`SvfOutputs`]). The band-pass tap is
//! normalised to unity gain at the centre frequency, and the notch is derived
//! from it as `input - bandpass`.

use core::f32::consts::PI;
use libm::tanf;

use crate::Effect;
use crate::flush_denormal;

/// Which tap an SVF returns from [`Effect::process`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SvfMode {
    /// Passes frequencies below the cutoff.
    #[default]
    Lowpass,
    /// Passes frequencies above the cutoff.
    Highpass,
    /// Passes a band around the cutoff.
    Bandpass,
    /// Rejects a band around the cutoff.
    Notch,
}

/// All taps produced by one filter tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvfOutputs {
    /// Low-pass output.
    pub lowpass: f32,
    /// High-pass output.
    pub highpass: f32,
    /// Unity-peak band-pass output.
    pub bandpass: f32,
    /// `input - bandpass`.
    pub notch: f32,
}

impl SvfOutputs {
    /// Pick the tap for `mode`.
    #[inline]
    pub fn select(&self, mode: SvfMode) -> f32 {
        match mode {
            SvfMode::Lowpass => self.lowpass,
            SvfMode::Highpass => self.highpass,
            SvfMode::Bandpass => self.bandpass,
            SvfMode::Notch => self.notch,
        }
    }
}

/// Map a normalized resonance in [0, 1] to a Q in [0.5, 10].
///
/// ```rust
/// use howl_core::resonance_to_q;
///
/// assert_eq!(resonance_to_q(0.0), 0.5);
/// assert_eq!(resonance_to_q(1.0), 10.0);
/// ```
#[inline]
pub fn resonance_to_q(resonance: f32) -> f32 {
    0.5 + resonance.clamp(0.0, 1.0) * 9.5
}

/// 2-pole (12 dB/oct) state variable filter.
///
/// - `cutoff`: 20 Hz to `sr * 0.49`, clamped
/// - `resonance`: Q from 0.5 to 20, clamped
///
/// ```rust
/// use howl_core::{Effect, StateVariableFilter, SvfMode};
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_cutoff(800.0);
/// svf.set_resonance(2.0);
/// svf.set_mode(SvfMode::Highpass);
/// let y = svf.process(0.25);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    s1: f32,
    s2: f32,
    g: f32,
    k: f32,
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    mode: SvfMode,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Create a low-pass at 1 kHz with Butterworth Q.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            s1: 0.0,
            s2: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: core::f32::consts::FRAC_1_SQRT_2,
            mode: SvfMode::Lowpass,
        };
        svf.update_coefficients();
        svf
    }

    /// Set the cutoff in Hz. Skips the `tan` when the value is unchanged.
    #[inline]
    pub fn set_cutoff(&mut self, freq: f32) {
        let clamped = freq.clamp(20.0, self.sample_rate * 0.49);
        if clamped != self.cutoff {
            self.cutoff = clamped;
            self.update_coefficients();
        }
    }

    /// Cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set the Q factor.
    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = q.clamp(0.5, 20.0);
        self.update_coefficients();
    }

    /// Q factor.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Select the tap returned by [`Effect::process`].
    pub fn set_mode(&mut self, mode: SvfMode) {
        self.mode = mode;
    }

    /// Selected tap.
    pub fn mode(&self) -> SvfMode {
        self.mode
    }

    fn update_coefficients(&mut self) {
        self.g = tanf(PI * self.cutoff / self.sample_rate);
        self.k = 1.0 / self.resonance;
    }

    /// Run one sample and return every tap.
    #[inline]
    pub fn process_all(&mut self, input: f32) -> SvfOutputs {
        let v3 = input - self.s2;
        let v1 = (self.g * v3 + self.s1) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.s2 + self.g * v1;

        self.s1 = flush_denormal(2.0 * v1 - self.s1);
        self.s2 = flush_denormal(2.0 * v2 - self.s2);

        let bandpass = self.k * v1;
        SvfOutputs {
            lowpass: v2,
            highpass: input - bandpass - v2,
            bandpass,
            notch: input - bandpass,
        }
    }
}

impl Effect for StateVariableFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.process_all(input).select(self.mode)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.cutoff.clamp(20.0, sample_rate * 0.49);
        self.update_coefficients();
    }

    fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}

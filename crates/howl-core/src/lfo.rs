//! Low-frequency oscillator.
//!
//! Each voice owns one of these and restarts it on every note so the
//! modulation is phase-locked to the note start.

use core::f32::consts::TAU;
use libm::sinf;

/// LFO shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Sine.
    #[default]
    Sine,
    /// Symmetric triangle starting at -1.
    Triangle,
    /// +1 for the first half cycle, -1 for the second.
    Square,
    /// Rising ramp from -1 to +1.
    Saw,
}

/// Phase-accumulator LFO producing values in [-1, 1].
///
/// ```rust
/// use howl_core::{Lfo, LfoWaveform};
///
/// let mut lfo = Lfo::new(1000.0, 250.0);
/// lfo.set_waveform(LfoWaveform::Square);
/// assert_eq!(lfo.next(), 1.0);
/// assert_eq!(lfo.next(), 1.0);
/// assert_eq!(lfo.next(), -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    increment: f32,
    sample_rate: f32,
    frequency: f32,
    waveform: LfoWaveform,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Create at `freq_hz`, sine shape, phase 0.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut lfo = Self {
            phase: 0.0,
            increment: 0.0,
            sample_rate,
            frequency: 0.0,
            waveform: LfoWaveform::Sine,
        };
        lfo.set_frequency(freq_hz);
        lfo
    }

    /// Set the rate in Hz (negative values are treated as 0).
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.increment = self.frequency / self.sample_rate;
    }

    /// Rate in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Select the shape.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Current shape.
    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    /// Recompute the increment for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency);
    }

    /// Restart the cycle.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Phase in [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Return the current value and advance one sample.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let p = self.phase;
        let value = match self.waveform {
            LfoWaveform::Sine => sinf(p * TAU),
            LfoWaveform::Triangle => {
                if p < 0.5 {
                    4.0 * p - 1.0
                } else {
                    3.0 - 4.0 * p
                }
            }
            LfoWaveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoWaveform::Saw => 2.0 * p - 1.0,
        };

        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= libm::floorf(self.phase);
        }
        value
    }
}

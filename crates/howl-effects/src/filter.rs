//! Multimode filter with a vowel formant bank.
//!
//! The four classic modes run a TPT state-variable filter per channel. The
//! formant mode replaces the signal with the weighted sum of five parallel
//! band-pass biquads tuned to a vowel, morphing A → E → I → O → U as the
//! vowel position moves from 0 to 4.
//!
//! Coefficients are only recomputed when type, resonance or vowel change;
//! the per-sample path is allocation-free and touches no scratch buffers.

use howl_core::{
    Biquad, Effect, StateVariableFilter, SvfMode, bandpass_coefficients, flush_denormal, lerp,
    resonance_to_q,
};

/// Number of formant bands.
pub const FORMANT_BANDS: usize = 5;

/// Centre frequencies in Hz, rows A, E, I, O, U.
pub const FORMANT_FREQS: [[f32; FORMANT_BANDS]; 5] = [
    [730.0, 1090.0, 2440.0, 3500.0, 4500.0],
    [530.0, 1840.0, 2480.0, 3500.0, 4500.0],
    [270.0, 2290.0, 3010.0, 3500.0, 4500.0],
    [570.0, 840.0, 2410.0, 3500.0, 4500.0],
    [300.0, 870.0, 2240.0, 3500.0, 4500.0],
];

/// Band gains, rows A, E, I, O, U.
pub const FORMANT_GAINS: [[f32; FORMANT_BANDS]; 5] = [
    [1.0, 0.5, 0.2, 0.1, 0.05],
    [1.0, 0.3, 0.2, 0.1, 0.05],
    [0.8, 1.0, 0.2, 0.1, 0.05],
    [1.0, 0.6, 0.2, 0.1, 0.05],
    [1.0, 0.5, 0.1, 0.1, 0.05],
];

/// Smallest vowel move that triggers a coefficient update.
const VOWEL_HYSTERESIS: f32 = 0.001;

/// Filter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    /// 12 dB/oct lowpass.
    #[default]
    LowPass,
    /// 12 dB/oct highpass.
    HighPass,
    /// Unity-peak bandpass.
    BandPass,
    /// Input minus bandpass.
    Notch,
    /// Five-band vowel filter.
    Formant,
}

impl FilterType {
    /// Map a choice index (0..=4) to a type; out-of-range values clamp.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => FilterType::LowPass,
            1 => FilterType::HighPass,
            2 => FilterType::BandPass,
            3 => FilterType::Notch,
            _ => FilterType::Formant,
        }
    }

    /// SVF tap for the classic modes, `None` for [`FilterType::Formant`].
    pub fn svf_mode(self) -> Option<SvfMode> {
        match self {
            FilterType::LowPass => Some(SvfMode::Lowpass),
            FilterType::HighPass => Some(SvfMode::Highpass),
            FilterType::BandPass => Some(SvfMode::Bandpass),
            FilterType::Notch => Some(SvfMode::Notch),
            FilterType::Formant => None,
        }
    }
}

/// Interpolated formant frequencies and gains at `position` in [0, 4].
///
/// ```rust
/// use howl_effects::filter::{FORMANT_FREQS, formant_table};
///
/// let (freqs, _) = formant_table(2.0);
/// assert_eq!(freqs, FORMANT_FREQS[2]);
///
/// let (freqs, gains) = formant_table(0.5);
/// assert_eq!(freqs[0], 630.0);
/// assert!((gains[1] - 0.4).abs() < 1e-6);
/// ```
pub fn formant_table(position: f32) -> ([f32; FORMANT_BANDS], [f32; FORMANT_BANDS]) {
    let position = position.clamp(0.0, 4.0);
    let i1 = position as usize;
    let i2 = (i1 + 1).min(4);
    let alpha = position - i1 as f32;

    let mut freqs = [0.0; FORMANT_BANDS];
    let mut gains = [0.0; FORMANT_BANDS];
    for k in 0..FORMANT_BANDS {
        freqs[k] = lerp(FORMANT_FREQS[i1][k], FORMANT_FREQS[i2][k], alpha);
        gains[k] = lerp(FORMANT_GAINS[i1][k], FORMANT_GAINS[i2][k], alpha);
    }
    (freqs, gains)
}

/// Stereo multimode filter.
///
/// # Example
///
/// ```rust
/// use howl_core::Effect;
/// use howl_effects::{FilterProcessor, FilterType};
///
/// let mut filter = FilterProcessor::new(48000.0);
/// filter.set_filter_type(FilterType::Formant);
/// filter.set_vowel(0.5); // "I"
///
/// let (l, r) = filter.process_stereo(0.3, 0.3);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct FilterProcessor {
    svf: [StateVariableFilter; 2],
    bands: [[Biquad; FORMANT_BANDS]; 2],
    gains: [f32; FORMANT_BANDS],
    filter_type: FilterType,
    resonance: f32,
    vowel_position: f32,
    sample_rate: f32,
}

impl FilterProcessor {
    /// Lowpass at 1 kHz, resonance 0, vowel A.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            svf: [
                StateVariableFilter::new(sample_rate),
                StateVariableFilter::new(sample_rate),
            ],
            bands: Default::default(),
            gains: [0.0; FORMANT_BANDS],
            filter_type: FilterType::LowPass,
            resonance: 0.0,
            vowel_position: 0.0,
            sample_rate,
        };
        filter.set_resonance(0.0);
        filter.set_filter_type(FilterType::LowPass);
        filter.update_formants();
        filter
    }

    /// Switch response.
    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
        match filter_type.svf_mode() {
            Some(mode) => {
                for svf in &mut self.svf {
                    svf.set_mode(mode);
                }
            }
            None => self.update_formants(),
        }
    }

    /// Current response.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// SVF cutoff in Hz.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        for svf in &mut self.svf {
            svf.set_cutoff(cutoff_hz);
        }
    }

    /// SVF cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.svf[0].cutoff()
    }

    /// Resonance in [0, 1]. Formant bands use twice the SVF Q.
    pub fn set_resonance(&mut self, resonance: f32) {
        let resonance = resonance.clamp(0.0, 1.0);
        let q = resonance_to_q(resonance);
        for svf in &mut self.svf {
            svf.set_resonance(q);
        }
        if resonance != self.resonance {
            self.resonance = resonance;
            self.update_formants();
        }
    }

    /// Resonance in [0, 1].
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Vowel in [0, 1], mapped to position 0..4 (A..U). Moves smaller than
    /// 0.001 are ignored.
    pub fn set_vowel(&mut self, vowel: f32) {
        let position = (vowel * 4.0).clamp(0.0, 4.0);
        if (position - self.vowel_position).abs() > VOWEL_HYSTERESIS {
            self.vowel_position = position;
            self.update_formants();
        }
    }

    /// Vowel position in [0, 4].
    pub fn vowel_position(&self) -> f32 {
        self.vowel_position
    }

    /// Current band gains.
    pub fn formant_gains(&self) -> [f32; FORMANT_BANDS] {
        self.gains
    }

    fn update_formants(&mut self) {
        let (freqs, gains) = formant_table(self.vowel_position);
        let q = resonance_to_q(self.resonance) * 2.0;
        let nyquist_guard = self.sample_rate * 0.49;
        for channel in &mut self.bands {
            for (band, &freq) in channel.iter_mut().zip(freqs.iter()) {
                band.set_coefficients(bandpass_coefficients(
                    freq.min(nyquist_guard),
                    q,
                    self.sample_rate,
                ));
            }
        }
        self.gains = gains;
    }

    #[inline]
    fn process_channel(&mut self, channel: usize, input: f32) -> f32 {
        if self.filter_type == FilterType::Formant {
            let mut sum = 0.0;
            for (band, gain) in self.bands[channel].iter_mut().zip(self.gains.iter()) {
                sum += band.process(input) * gain;
            }
            flush_denormal(sum)
        } else {
            self.svf[channel].process(input)
        }
    }
}

impl Effect for FilterProcessor {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.process_channel(0, input)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.process_channel(0, left), self.process_channel(1, right))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for svf in &mut self.svf {
            svf.set_sample_rate(sample_rate);
        }
        self.update_formants();
    }

    fn reset(&mut self) {
        for svf in &mut self.svf {
            svf.reset();
        }
        for band in self.bands.iter_mut().flatten() {
            band.clear();
        }
    }
}

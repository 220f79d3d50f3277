//! Sample-playback voice.
//!
//! Per rendered sample a voice:
//!
//! 1. reads its sound with linear interpolation at
//!    `ratio = 2^((note - root + tune) / 12) * source_sr / sr`, inside the
//!    `[start, end)` region, looping or stopping at the end;
//! 2. applies the sound's declick envelope;
//! 3. applies the amplitude ADSR and velocity;
//! 4. runs the state-variable filter, cutoff modulated by the LFO;
//! 5. pans with a constant-power law.
//!
//! Non-finite sample data reads as silence, and a non-finite filter output
//! is replaced by silence and resets the filter.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;

use howl_core::{
    Effect, Lfo, LfoWaveform, StateVariableFilter, SvfMode, constant_power_pan, finite_or_zero,
    resonance_to_q,
};

use crate::envelope::{AdsrEnvelope, AdsrParams};
use crate::sound::Sound;

/// Lowest cutoff the LFO can push the filter to.
pub const MIN_CUTOFF_HZ: f32 = 20.0;

/// Highest cutoff the LFO can push the filter to.
pub const MAX_CUTOFF_HZ: f32 = 20000.0;

/// What the per-voice LFO modulates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoTarget {
    /// Filter cutoff, `base * 2^(lfo * depth * 2)`.
    #[default]
    Cutoff,
    /// Amplitude, dipping by up to `depth` at the LFO trough.
    Volume,
    /// Pan position, swept by up to `depth` either side.
    Pan,
    /// Playback pitch, up to two semitones either side at full depth.
    Pitch,
}

impl LfoTarget {
    /// Map a choice index to a target; out-of-range values clamp.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => LfoTarget::Cutoff,
            1 => LfoTarget::Volume,
            2 => LfoTarget::Pan,
            _ => LfoTarget::Pitch,
        }
    }
}

/// Envelope, filter and LFO settings broadcast to every voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceParams {
    /// Amplitude envelope.
    pub envelope: AdsrParams,
    /// Base cutoff in Hz.
    pub cutoff: f32,
    /// Resonance in [0, 1].
    pub resonance: f32,
    /// Filter tap, `None` to bypass the voice filter.
    pub filter_mode: Option<SvfMode>,
    /// LFO rate in Hz.
    pub lfo_rate: f32,
    /// LFO depth in [0, 1].
    pub lfo_depth: f32,
    /// LFO shape.
    pub lfo_waveform: LfoWaveform,
    /// LFO destination.
    pub lfo_target: LfoTarget,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            envelope: AdsrParams::default(),
            cutoff: MAX_CUTOFF_HZ,
            resonance: 0.0,
            filter_mode: Some(SvfMode::Lowpass),
            lfo_rate: 1.0,
            lfo_depth: 0.0,
            lfo_waveform: LfoWaveform::Sine,
            lfo_target: LfoTarget::Cutoff,
        }
    }
}

/// Tuning and region settings broadcast to every voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleParams {
    /// Tuning offset in semitones.
    pub tune: f32,
    /// Region start as a fraction of the sample length.
    pub start: f32,
    /// Region end as a fraction of the sample length.
    pub end: f32,
    /// Loop the region instead of stopping at its end.
    pub looping: bool,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            tune: 0.0,
            start: 0.0,
            end: 1.0,
            looping: false,
        }
    }
}

impl SampleParams {
    /// `(start, end)` in frames for a sound of `len` frames. `end >= start`.
    pub fn region(&self, len: usize) -> (f64, f64) {
        let len = len as f64;
        let start = libm::floor(f64::from(self.start.clamp(0.0, 1.0)) * len);
        let end = (f64::from(self.end.clamp(0.0, 1.0)) * len).max(start);
        (start, end)
    }
}

/// One rendered sample before panning.
struct Frame {
    value: f32,
    gains: (f32, f32),
}

/// A single sampler voice.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use howl_synth::{Sound, Voice};
///
/// let sound = Arc::new(Sound::new("ramp", vec![(0..64).map(|n| n as f32 / 64.0).collect()], 48000.0));
/// let mut voice = Voice::new(48000.0);
/// voice.start_note(60, 127, sound);
///
/// let mut out = vec![0.0f32; 32];
/// voice.render_mono(&mut out);
/// assert!(voice.is_active());
///
/// voice.stop_note(false);
/// assert!(!voice.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    sound: Option<Arc<Sound>>,
    position: f64,
    pitch_ratio: f64,
    note: u8,
    velocity: f32,
    age: u64,

    declick: AdsrEnvelope,
    amp_env: AdsrEnvelope,

    filter: StateVariableFilter,
    filter_mode: Option<SvfMode>,
    base_cutoff: f32,

    lfo: Lfo,
    lfo_depth: f32,
    lfo_target: LfoTarget,

    sample: SampleParams,
    pan: f32,
    pan_gains: (f32, f32),
    sample_rate: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Voice {
    /// Create an idle voice.
    pub fn new(sample_rate: f32) -> Self {
        let mut voice = Self {
            sound: None,
            position: 0.0,
            pitch_ratio: 1.0,
            note: 0,
            velocity: 0.0,
            age: 0,
            declick: AdsrEnvelope::new(sample_rate),
            amp_env: AdsrEnvelope::new(sample_rate),
            filter: StateVariableFilter::new(sample_rate),
            filter_mode: Some(SvfMode::Lowpass),
            base_cutoff: MAX_CUTOFF_HZ,
            lfo: Lfo::new(sample_rate, 1.0),
            lfo_depth: 0.0,
            lfo_target: LfoTarget::Cutoff,
            sample: SampleParams::default(),
            pan: 0.0,
            pan_gains: constant_power_pan(0.0),
            sample_rate,
        };
        voice.update_params(&VoiceParams::default());
        voice
    }

    /// Set sample rate for all components.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.declick.set_sample_rate(sample_rate);
        self.amp_env.set_sample_rate(sample_rate);
        self.filter.set_sample_rate(sample_rate);
        self.lfo.set_sample_rate(sample_rate);
        self.refresh_pitch();
    }

    /// Apply envelope, filter and LFO settings.
    pub fn update_params(&mut self, params: &VoiceParams) {
        self.amp_env.set_parameters(params.envelope);
        self.base_cutoff = params.cutoff.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
        self.filter.set_cutoff(self.base_cutoff);
        self.filter.set_resonance(resonance_to_q(params.resonance));
        if let Some(mode) = params.filter_mode {
            self.filter.set_mode(mode);
        }
        self.filter_mode = params.filter_mode;
        self.lfo.set_frequency(params.lfo_rate);
        self.lfo.set_waveform(params.lfo_waveform);
        self.lfo_depth = params.lfo_depth.clamp(0.0, 1.0);
        self.lfo_target = params.lfo_target;
    }

    /// Apply tuning and region settings. Tuning takes effect immediately on
    /// a sounding note.
    pub fn update_sample_params(&mut self, params: &SampleParams) {
        self.sample = *params;
        self.refresh_pitch();
    }

    /// Pan position in [-1, 1].
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
        self.pan_gains = constant_power_pan(self.pan);
    }

    /// Start playing `sound` for `note`. The envelopes retrigger from their
    /// current level; the filter and LFO restart.
    pub fn start_note(&mut self, note: u8, velocity: u8, sound: Arc<Sound>) {
        self.note = note;
        self.velocity = f32::from(velocity.min(127)) / 127.0;
        self.declick
            .set_parameters(AdsrParams::declick(sound.attack_secs(), sound.release_secs()));
        self.position = self.sample.region(sound.len()).0;
        self.sound = Some(sound);
        self.refresh_pitch();

        self.declick.gate_on();
        self.amp_env.gate_on();
        self.filter.reset();
        self.lfo.reset();
    }

    /// Release the note. Without a tail the voice goes idle at once.
    pub fn stop_note(&mut self, allow_tail: bool) {
        if allow_tail {
            self.declick.gate_off();
            self.amp_env.gate_off();
            if !self.declick.is_active() || !self.amp_env.is_active() {
                self.kill();
            }
        } else {
            self.kill();
        }
    }

    /// Stop immediately and drop the sound.
    pub fn kill(&mut self) {
        self.declick.reset();
        self.amp_env.reset();
        self.sound = None;
    }

    /// Kill and clear filter and LFO state.
    pub fn reset(&mut self) {
        self.kill();
        self.filter.reset();
        self.lfo.reset();
        self.age = 0;
    }

    /// True while the amplitude envelope is running.
    pub fn is_active(&self) -> bool {
        self.amp_env.is_active()
    }

    /// True once the note has been released but is still sounding.
    pub fn is_releasing(&self) -> bool {
        self.amp_env.state() == crate::EnvelopeState::Release
    }

    /// Note this voice was last started with.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Start order stamp used for stealing.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Set the start order stamp.
    pub fn set_age(&mut self, age: u64) {
        self.age = age;
    }

    /// Current gain before the filter, for quietest-voice stealing.
    pub fn current_level(&self) -> f32 {
        self.amp_env.level() * self.declick.level() * self.velocity
    }

    /// Playback position in source frames.
    pub fn position(&self) -> f64 {
        self.position
    }

    fn refresh_pitch(&mut self) {
        if let Some(sound) = &self.sound {
            let semitones =
                f64::from(self.note) - f64::from(sound.root_note()) + f64::from(self.sample.tune);
            self.pitch_ratio = libm::pow(2.0, semitones / 12.0)
                * f64::from(sound.source_sample_rate())
                / f64::from(self.sample_rate);
        }
    }

    /// Produce one sample, or `None` once the voice has finished.
    #[inline]
    fn tick(&mut self) -> Option<Frame> {
        if !self.amp_env.is_active() {
            return None;
        }
        let sound = self.sound.as_deref()?;

        let (start, end) = self.sample.region(sound.len());
        if self.position >= end {
            if self.sample.looping && end - start >= 1.0 {
                self.position = start + (self.position - end) % (end - start);
            } else {
                return None;
            }
        }

        let index = self.position as usize;
        let frac = (self.position - index as f64) as f32;
        let next = if index + 1 >= end as usize && self.sample.looping {
            start as usize
        } else {
            index + 1
        };
        let a = finite_or_zero(sound.frame(index));
        let b = finite_or_zero(sound.frame(next));
        let raw = a + (b - a) * frac;

        let lfo = self.lfo.next() * self.lfo_depth;
        let step = match self.lfo_target {
            LfoTarget::Pitch => self.pitch_ratio * libm::pow(2.0, f64::from(lfo) * 2.0 / 12.0),
            _ => self.pitch_ratio,
        };
        self.position += step;

        let gain = self.declick.advance() * self.amp_env.advance() * self.velocity;
        let mut value = raw * gain;
        if self.lfo_target == LfoTarget::Volume {
            value *= 1.0 - 0.5 * (self.lfo_depth - lfo);
        }

        if let Some(mode) = self.filter_mode {
            if self.lfo_target == LfoTarget::Cutoff {
                let cutoff = self.base_cutoff * libm::exp2f(lfo * 2.0);
                self.filter.set_cutoff(cutoff.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ));
            }
            let filtered = self.filter.process_all(value).select(mode);
            value = if filtered.is_finite() {
                filtered
            } else {
                self.filter.reset();
                0.0
            };
        }

        let gains = if self.lfo_target == LfoTarget::Pan {
            constant_power_pan(self.pan + lfo)
        } else {
            self.pan_gains
        };

        if !self.declick.is_active() {
            self.amp_env.reset();
        }
        Some(Frame { value, gains })
    }

    /// Add this voice into a mono buffer at unit gain.
    pub fn render_mono(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            match self.tick() {
                Some(frame) => *sample += frame.value,
                None => {
                    self.kill();
                    break;
                }
            }
        }
    }

    /// Add this voice into a stereo pair with constant-power panning.
    pub fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            match self.tick() {
                Some(frame) => {
                    *l += frame.value * frame.gains.0;
                    *r += frame.value * frame.gains.1;
                }
                None => {
                    self.kill();
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    const SR: f32 = 48000.0;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|n| n as f32 / len as f32).collect()
    }

    /// Unity-gain voice: no envelopes to speak of, no filter.
    fn plain_voice() -> Voice {
        let mut voice = Voice::new(SR);
        voice.update_params(&VoiceParams {
            envelope: AdsrParams {
                attack: 0.0,
                decay: 0.0,
                sustain: 1.0,
                release: 0.0,
            },
            filter_mode: None,
            ..Default::default()
        });
        voice
    }

    fn sound(data: Vec<f32>) -> Arc<Sound> {
        Arc::new(Sound::new("test", vec![data], SR))
    }

    #[test]
    fn root_note_reproduces_the_sample() {
        let data = ramp(64);
        let mut voice = plain_voice();
        voice.start_note(60, 127, sound(data.clone()));
        let mut out = vec![0.0; 64];
        voice.render_mono(&mut out);
        assert_eq!(out, data);
    }

    #[test]
    fn octave_up_plays_twice_as_fast() {
        let data = ramp(64);
        let mut voice = plain_voice();
        voice.start_note(72, 127, sound(data.clone()));
        let mut out = vec![0.0; 32];
        voice.render_mono(&mut out);
        for (i, &y) in out.iter().enumerate() {
            assert!((y - data[2 * i]).abs() < 1e-6);
        }
    }

    #[test]
    fn tune_shifts_like_a_note_change() {
        let data = ramp(64);
        let mut voice = plain_voice();
        voice.update_sample_params(&SampleParams {
            tune: 12.0,
            ..Default::default()
        });
        voice.start_note(60, 127, sound(data.clone()));
        let mut out = vec![0.0; 16];
        voice.render_mono(&mut out);
        assert!((out[5] - data[10]).abs() < 1e-6);
    }

    #[test]
    fn source_rate_is_compensated() {
        let data = ramp(64);
        let mut voice = plain_voice();
        voice.start_note(60, 127, Arc::new(Sound::new("half", vec![data.clone()], SR / 2.0)));
        let mut out = vec![0.0; 8];
        voice.render_mono(&mut out);
        assert!((out[2] - data[1]).abs() < 1e-6);
        assert!((out[3] - (data[1] + data[2]) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn stops_hard_at_region_end() {
        let mut voice = plain_voice();
        voice.start_note(60, 127, sound(vec![0.5; 10]));
        let mut out = vec![0.0; 20];
        voice.render_mono(&mut out);
        assert!(out[..10].iter().all(|&s| s == 0.5));
        assert!(out[10..].iter().all(|&s| s == 0.0));
        assert!(!voice.is_active());
    }

    #[test]
    fn region_start_and_loop() {
        let data = ramp(40);
        let mut voice = plain_voice();
        voice.update_sample_params(&SampleParams {
            start: 0.5,
            end: 0.75,
            looping: true,
            ..Default::default()
        });
        voice.start_note(60, 127, sound(data.clone()));
        let mut out = vec![0.0; 25];
        voice.render_mono(&mut out);
        assert_eq!(out[0], data[20]);
        assert_eq!(out[9], data[29]);
        assert_eq!(out[10], data[20]);
        assert_eq!(out[24], data[24]);
        assert!(voice.is_active());
    }

    #[test]
    fn empty_region_stops_at_once() {
        let mut voice = plain_voice();
        voice.update_sample_params(&SampleParams {
            start: 0.8,
            end: 0.2,
            looping: true,
            ..Default::default()
        });
        voice.start_note(60, 127, sound(vec![1.0; 100]));
        let mut out = vec![0.0; 4];
        voice.render_mono(&mut out);
        assert_eq!(out, vec![0.0; 4]);
        assert!(!voice.is_active());
    }

    #[test]
    fn velocity_scales_output() {
        let mut voice = plain_voice();
        voice.start_note(60, 64, sound(vec![1.0; 8]));
        let mut out = vec![0.0; 1];
        voice.render_mono(&mut out);
        assert!((out[0] - 64.0 / 127.0).abs() < 1e-6);
    }

    #[test]
    fn nan_samples_never_reach_output() {
        let mut data = vec![0.25; 64];
        data[3] = f32::NAN;
        data[10] = f32::INFINITY;
        let mut voice = Voice::new(SR);
        voice.update_params(&VoiceParams {
            resonance: 1.0,
            cutoff: 800.0,
            lfo_depth: 1.0,
            lfo_rate: 5.0,
            ..Default::default()
        });
        voice.start_note(60, 100, sound(data));
        let mut left = vec![0.0; 64];
        let mut right = vec![0.0; 64];
        voice.render_stereo(&mut left, &mut right);
        assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));
    }

    #[test]
    fn hard_left_pan() {
        let mut voice = plain_voice();
        voice.set_pan(-1.0);
        voice.start_note(60, 127, sound(vec![0.5; 16]));
        let mut left = vec![0.0; 16];
        let mut right = vec![0.0; 16];
        voice.render_stereo(&mut left, &mut right);
        assert!(left.iter().all(|&s| (s - 0.5).abs() < 1e-6));
        assert!(right.iter().all(|&s| s.abs() < 1e-6));
    }

    #[test]
    fn release_with_and_without_tail() {
        let mut voice = Voice::new(SR);
        voice.update_params(&VoiceParams {
            envelope: AdsrParams {
                attack: 0.0,
                decay: 0.0,
                sustain: 1.0,
                release: 0.01,
            },
            ..Default::default()
        });
        voice.start_note(60, 127, sound(vec![0.5; 48000]));
        let mut out = vec![0.0; 100];
        voice.render_mono(&mut out);

        voice.stop_note(true);
        assert!(voice.is_active());
        assert!(voice.is_releasing());
        let mut tail = vec![0.0; 1000];
        voice.render_mono(&mut tail);
        assert!(!voice.is_active());
        assert!(tail[0] > 0.0);
        assert_eq!(*tail.last().unwrap_or(&1.0), 0.0);

        voice.start_note(60, 127, sound(vec![0.5; 48000]));
        voice.stop_note(false);
        assert!(!voice.is_active());
    }

    #[test]
    fn declick_release_ends_the_voice() {
        let mut voice = Voice::new(SR);
        voice.update_params(&VoiceParams {
            envelope: AdsrParams {
                attack: 0.0,
                decay: 0.0,
                sustain: 1.0,
                release: 5.0,
            },
            filter_mode: None,
            ..Default::default()
        });
        let short_tail =
            Arc::new(Sound::new("s", vec![vec![0.5; 48000]], SR).with_envelope(0.0, 0.001));
        voice.start_note(60, 127, short_tail);
        voice.stop_note(true);
        let mut out = vec![0.0; 100];
        voice.render_mono(&mut out);
        assert!(!voice.is_active());
    }

    #[test]
    fn cutoff_lfo_stays_in_range() {
        let mut voice = Voice::new(SR);
        voice.update_params(&VoiceParams {
            cutoff: 15000.0,
            lfo_depth: 1.0,
            lfo_rate: 20.0,
            ..Default::default()
        });
        voice.start_note(60, 127, sound(vec![0.3; 4800]));
        for _ in 0..4800 {
            voice.tick();
            let cutoff = voice.filter.cutoff();
            assert!((MIN_CUTOFF_HZ..=MAX_CUTOFF_HZ).contains(&cutoff));
        }
    }

    #[test]
    fn lfo_target_from_index() {
        assert_eq!(LfoTarget::from_index(0), LfoTarget::Cutoff);
        assert_eq!(LfoTarget::from_index(3), LfoTarget::Pitch);
        assert_eq!(LfoTarget::from_index(17), LfoTarget::Pitch);
    }
}

//! Processor construction settings and host transport state.

use howl_synth::VoiceStealing;

/// Sample rate used when the host reports none.
pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

/// Settings fixed at construction or `prepare` time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will deliver. Sizes the MIDI scratch buffer.
    pub max_block: usize,
    /// Length of the delay line in seconds.
    pub max_delay_secs: f32,
    /// What to take when all eight voices are busy.
    pub voice_stealing: VoiceStealing,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_block: 512,
            max_delay_secs: 2.0,
            voice_stealing: VoiceStealing::Oldest,
        }
    }
}

impl InstrumentConfig {
    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the largest block size.
    pub fn with_max_block(mut self, max_block: usize) -> Self {
        self.max_block = max_block;
        self
    }

    /// Set the voice-stealing policy.
    pub fn with_voice_stealing(mut self, voice_stealing: VoiceStealing) -> Self {
        self.voice_stealing = voice_stealing;
        self
    }
}

/// Fall back to 44.1 kHz for a missing or nonsensical rate.
///
/// ```rust
/// use howl_instrument::resolve_sample_rate;
///
/// assert_eq!(resolve_sample_rate(48000.0), 48000.0);
/// assert_eq!(resolve_sample_rate(0.0), 44100.0);
/// assert_eq!(resolve_sample_rate(f32::NAN), 44100.0);
/// ```
pub fn resolve_sample_rate(sample_rate: f32) -> f32 {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        sample_rate
    } else {
        DEFAULT_SAMPLE_RATE
    }
}

/// Host playhead for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    /// Tempo in BPM, `None` when the host has no tempo.
    pub bpm: Option<f32>,
    /// False while the host transport is stopped.
    pub playing: bool,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            bpm: None,
            playing: true,
        }
    }
}

impl Transport {
    /// Playing at a fixed tempo.
    pub fn at(bpm: f32) -> Self {
        Self {
            bpm: Some(bpm),
            playing: true,
        }
    }

    /// Stopped, tempo unknown.
    pub fn stopped() -> Self {
        Self {
            bpm: None,
            playing: false,
        }
    }
}

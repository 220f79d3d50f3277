//! Polyphonic sampler engine.
//!
//! A fixed pool of [`VOICE_COUNT`] voices plays from the current
//! [`SoundBank`]. Rendering splits the block at every MIDI event offset so
//! note starts and stops land on the exact sample.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;

use howl_core::{MidiBuffer, MidiMessage};

use crate::sound::SoundBank;
use crate::voice::{SampleParams, Voice, VoiceParams};

/// Size of the voice pool.
pub const VOICE_COUNT: usize = 8;

/// Which voice to take when every voice is busy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceStealing {
    /// The voice started longest ago.
    #[default]
    Oldest,
    /// The voice with the lowest current envelope level.
    Quietest,
}

/// Eight-voice sampler.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use howl_core::{MidiBuffer, MidiMessage};
/// use howl_synth::{Sound, SoundBank, SynthEngine};
///
/// let mut engine = SynthEngine::new(48000.0);
/// engine.set_sound_bank(Arc::new(SoundBank::new(vec![
///     Sound::new("tone", vec![vec![0.5; 4800]], 48000.0),
/// ])));
///
/// let mut midi = MidiBuffer::with_capacity(8);
/// midi.push(16, MidiMessage::NoteOn { channel: 1, note: 60, velocity: 100 });
///
/// let mut left = vec![0.0f32; 64];
/// let mut right = vec![0.0f32; 64];
/// engine.render(&mut [left.as_mut_slice(), right.as_mut_slice()], &midi);
///
/// assert_eq!(left[15], 0.0);
/// assert_eq!(engine.active_voice_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SynthEngine {
    voices: [Voice; VOICE_COUNT],
    bank: Arc<SoundBank>,
    stealing: VoiceStealing,
    age_counter: u64,
    sample_rate: f32,
}

impl SynthEngine {
    /// Create an engine with an empty bank.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate)),
            bank: Arc::new(SoundBank::empty()),
            stealing: VoiceStealing::Oldest,
            age_counter: 0,
            sample_rate,
        }
    }

    /// Re-initialize every voice for a new sample rate and silence them.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
            voice.reset();
        }
        self.age_counter = 0;
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Set the stealing policy.
    pub fn set_voice_stealing(&mut self, stealing: VoiceStealing) {
        self.stealing = stealing;
    }

    /// Current stealing policy.
    pub fn voice_stealing(&self) -> VoiceStealing {
        self.stealing
    }

    /// Swap in a bank. Sounding voices keep the sound they started with.
    ///
    /// Passing the bank already installed is a no-op, so this is cheap to
    /// call once per block with whatever the loader last published.
    pub fn set_sound_bank(&mut self, bank: Arc<SoundBank>) {
        if !Arc::ptr_eq(&self.bank, &bank) {
            self.bank = bank;
        }
    }

    /// Installed bank.
    pub fn sound_bank(&self) -> &Arc<SoundBank> {
        &self.bank
    }

    /// Broadcast envelope, filter and LFO settings to every voice.
    pub fn update_params(&mut self, params: &VoiceParams) {
        for voice in &mut self.voices {
            voice.update_params(params);
        }
    }

    /// Broadcast tuning and region settings to every voice.
    pub fn update_sample_params(&mut self, params: &SampleParams) {
        for voice in &mut self.voices {
            voice.update_sample_params(params);
        }
    }

    /// Broadcast the pan position to every voice.
    pub fn set_pan(&mut self, pan: f32) {
        for voice in &mut self.voices {
            voice.set_pan(pan);
        }
    }

    /// Start a note. Voices already sounding the same note are released
    /// first; notes no sound answers are ignored.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        let Some(sound) = self.bank.find(note, velocity).cloned() else {
            return;
        };
        for voice in &mut self.voices {
            if voice.is_active() && !voice.is_releasing() && voice.note() == note {
                voice.stop_note(true);
            }
        }
        let index = self.allocate_voice();
        self.age_counter += 1;
        let voice = &mut self.voices[index];
        if voice.is_active() {
            voice.kill();
        }
        voice.set_age(self.age_counter);
        voice.start_note(note, velocity, sound);
    }

    /// Release every voice playing `note`.
    pub fn note_off(&mut self, note: u8, allow_tail: bool) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.note() == note {
                voice.stop_note(allow_tail);
            }
        }
    }

    /// Release every voice.
    pub fn all_notes_off(&mut self, allow_tail: bool) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.stop_note(allow_tail);
            }
        }
    }

    /// Silence everything and clear voice state.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.age_counter = 0;
    }

    /// Apply one MIDI message.
    pub fn handle_message(&mut self, message: &MidiMessage) {
        if let Some((note, velocity)) = message.note_on() {
            self.note_on(note, velocity);
        } else if let Some(note) = message.note_off() {
            self.note_off(note, true);
        } else if let MidiMessage::AllNotesOff { .. } = message {
            self.all_notes_off(true);
        }
    }

    /// Number of sounding voices.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Read access to the pool.
    pub fn voices(&self) -> &[Voice; VOICE_COUNT] {
        &self.voices
    }

    /// Add every voice into `channels`, applying `midi` at its offsets.
    ///
    /// One channel renders mono at unit gain; two or more render the first
    /// pair panned. Events past the end of the block apply at the end.
    pub fn render(&mut self, channels: &mut [&mut [f32]], midi: &MidiBuffer) {
        let len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        let mut pos = 0;
        for event in midi {
            let at = (event.offset as usize).min(len);
            if at > pos {
                self.render_span(channels, pos, at);
                pos = at;
            }
            self.handle_message(&event.message);
        }
        if pos < len {
            self.render_span(channels, pos, len);
        }
    }

    fn render_span(&mut self, channels: &mut [&mut [f32]], from: usize, to: usize) {
        match channels {
            [] => {}
            [mono] => {
                for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
                    voice.render_mono(&mut mono[from..to]);
                }
            }
            [left, right, ..] => {
                for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
                    voice.render_stereo(&mut left[from..to], &mut right[from..to]);
                }
            }
        }
    }

    fn allocate_voice(&self) -> usize {
        if let Some(idle) = self.voices.iter().position(|v| !v.is_active()) {
            return idle;
        }
        let candidates = self.voices.iter().enumerate();
        let stolen = match self.stealing {
            VoiceStealing::Oldest => candidates.min_by_key(|(_, v)| v.age()),
            VoiceStealing::Quietest => {
                candidates.min_by(|(_, a), (_, b)| a.current_level().total_cmp(&b.current_level()))
            }
        };
        stolen.map_or(0, |(i, _)| i)
    }
}

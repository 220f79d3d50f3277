//! Sampled sounds and the bank the engine plays from.
//!
//! A [`SoundBank`] is immutable once built. Loading new material builds a
//! fresh bank off the audio thread and publishes it whole, so a block never
//! sees half of one kit and half of another. With the `std` feature,
//! [`SharedSoundBank`] wraps the publish/load handshake in an `ArcSwap`.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

/// Default root note for a sample with no loop metadata.
pub const DEFAULT_ROOT_NOTE: u8 = 60;

/// Default declick release in seconds.
pub const DEFAULT_RELEASE_SECS: f32 = 0.1;

/// A set of MIDI notes as a 128-bit bitmap.
///
/// ```rust
/// use howl_synth::NoteSet;
///
/// let kick = NoteSet::single(36);
/// assert!(kick.contains(36));
/// assert!(!kick.contains(37));
/// assert_eq!(NoteSet::all().len(), 128);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NoteSet(u128);

impl NoteSet {
    /// No notes.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every note 0..=127.
    pub const fn all() -> Self {
        Self(u128::MAX)
    }

    /// Exactly one note. Notes above 127 give an empty set.
    pub const fn single(note: u8) -> Self {
        if note < 128 { Self(1u128 << note) } else { Self(0) }
    }

    /// Every note in `range`, clipped to 0..=127.
    pub fn range(range: RangeInclusive<u8>) -> Self {
        let mut set = Self::empty();
        for note in range {
            set.insert(note);
        }
        set
    }

    /// Add a note. Notes above 127 are ignored.
    pub fn insert(&mut self, note: u8) {
        if note < 128 {
            self.0 |= 1u128 << note;
        }
    }

    /// Remove a note.
    pub fn remove(&mut self, note: u8) {
        if note < 128 {
            self.0 &= !(1u128 << note);
        }
    }

    /// True when `note` is in the set.
    pub const fn contains(&self, note: u8) -> bool {
        note < 128 && self.0 & (1u128 << note) != 0
    }

    /// Number of notes in the set.
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True when no note is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Lowest note in the set.
    pub const fn lowest(&self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }
}

/// One playable sample with its key mapping.
///
/// Audio is stored planar, one `Vec` per channel (1 or 2). Voices play a
/// mono mix: stereo material is averaged.
#[derive(Debug, Clone)]
pub struct Sound {
    name: String,
    channels: Vec<Vec<f32>>,
    source_sample_rate: f32,
    notes: NoteSet,
    root_note: u8,
    attack_secs: f32,
    release_secs: f32,
    velocities: RangeInclusive<u8>,
}

impl Sound {
    /// Create a sound mapped to every note, root 60, attack 0 s, release 0.1 s.
    ///
    /// Channels beyond the second are dropped, and all channels are cut to
    /// the length of the shortest.
    pub fn new(
        name: impl Into<String>,
        mut channels: Vec<Vec<f32>>,
        source_sample_rate: f32,
    ) -> Self {
        channels.truncate(2);
        let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
        for channel in &mut channels {
            channel.truncate(frames);
        }
        Self {
            name: name.into(),
            channels,
            source_sample_rate: if source_sample_rate > 0.0 {
                source_sample_rate
            } else {
                44100.0
            },
            notes: NoteSet::all(),
            root_note: DEFAULT_ROOT_NOTE,
            attack_secs: 0.0,
            release_secs: DEFAULT_RELEASE_SECS,
            velocities: 0..=127,
        }
    }

    /// Restrict the key mapping.
    #[must_use]
    pub fn with_notes(mut self, notes: NoteSet) -> Self {
        self.notes = notes;
        self
    }

    /// Note at which the sample plays at its recorded pitch.
    #[must_use]
    pub fn with_root_note(mut self, root_note: u8) -> Self {
        self.root_note = root_note.min(127);
        self
    }

    /// Declick attack and release in seconds.
    #[must_use]
    pub fn with_envelope(mut self, attack_secs: f32, release_secs: f32) -> Self {
        self.attack_secs = attack_secs.max(0.0);
        self.release_secs = release_secs.max(0.0);
        self
    }

    /// Restrict the velocity range.
    #[must_use]
    pub fn with_velocities(mut self, velocities: RangeInclusive<u8>) -> Self {
        self.velocities = velocities;
        self
    }

    /// Display name (usually the file stem).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Planar sample data.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Number of channels (0, 1 or 2).
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Length in frames.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// True when there is no audio.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample rate the audio was recorded at.
    pub fn source_sample_rate(&self) -> f32 {
        self.source_sample_rate
    }

    /// Mapped notes.
    pub fn notes(&self) -> NoteSet {
        self.notes
    }

    /// Root note.
    pub fn root_note(&self) -> u8 {
        self.root_note
    }

    /// Declick attack in seconds.
    pub fn attack_secs(&self) -> f32 {
        self.attack_secs
    }

    /// Declick release in seconds.
    pub fn release_secs(&self) -> f32 {
        self.release_secs
    }

    /// Velocity range.
    pub fn velocities(&self) -> &RangeInclusive<u8> {
        &self.velocities
    }

    /// True when this sound answers `note` at `velocity`.
    pub fn applies_to(&self, note: u8, velocity: u8) -> bool {
        self.notes.contains(note) && self.velocities.contains(&velocity)
    }

    /// Mono frame at `index`. Out-of-range indices read as silence.
    #[inline]
    pub fn frame(&self, index: usize) -> f32 {
        match self.channels.as_slice() {
            [mono] => mono.get(index).copied().unwrap_or(0.0),
            [left, right, ..] => match (left.get(index), right.get(index)) {
                (Some(l), Some(r)) => (l + r) * 0.5,
                _ => 0.0,
            },
            [] => 0.0,
        }
    }
}

/// The list of sounds the engine resolves note-ons against.
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    sounds: Vec<Arc<Sound>>,
}

impl SoundBank {
    /// A bank with no sounds. Every note-on is ignored.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a bank from sounds. Earlier sounds win when mappings overlap.
    pub fn new(sounds: Vec<Sound>) -> Self {
        Self {
            sounds: sounds.into_iter().map(Arc::new).collect(),
        }
    }

    /// All sounds in lookup order.
    pub fn sounds(&self) -> &[Arc<Sound>] {
        &self.sounds
    }

    /// Number of sounds.
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// True when the bank holds no sounds.
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// First sound answering `note` at `velocity`.
    pub fn find(&self, note: u8, velocity: u8) -> Option<&Arc<Sound>> {
        self.sounds.iter().find(|s| s.applies_to(note, velocity))
    }
}

/// Wait-free publish/load handle for a [`SoundBank`].
///
/// The loader thread calls [`publish`](Self::publish); the audio thread calls
/// [`load_full`](Self::load_full) once per block.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct SharedSoundBank {
    inner: arc_swap::ArcSwap<SoundBank>,
}

#[cfg(feature = "std")]
impl SharedSoundBank {
    /// Start with an empty bank.
    pub fn new() -> Self {
        Self {
            inner: arc_swap::ArcSwap::from_pointee(SoundBank::empty()),
        }
    }

    /// Replace the published bank.
    pub fn publish(&self, bank: SoundBank) {
        self.inner.store(Arc::new(bank));
    }

    /// Current bank.
    pub fn load_full(&self) -> Arc<SoundBank> {
        self.inner.load_full()
    }
}

#[cfg(feature = "std")]
impl Default for SharedSoundBank {
    fn default() -> Self {
        Self::new()
    }
}

//! Sample and drum-kit loading.
//!
//! Loading happens off the audio thread. A new [`SoundBank`] is built in
//! full, then published through [`SharedSoundBank`]; the engine picks it up
//! at its next block. A failed load publishes nothing, so whatever was
//! loaded before keeps playing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use howl_synth::{NoteSet, SharedSoundBank, Sound, SoundBank};

use crate::wav::{read_root_note, read_wav};
use crate::{Error, Result};

/// Longest sample kept, in seconds. Anything past this is dropped.
pub const MAX_SAMPLE_SECS: f32 = 60.0;

/// Note of the first kit pad (C1 in the General MIDI drum map).
pub const KIT_BASE_NOTE: u8 = 36;

/// Most pads a kit can hold.
pub const MAX_KIT_SOUNDS: usize = 16;

const DEFAULT_ROOT_NOTE: u8 = 60;
const RELEASE_SECS: f32 = 0.1;

/// Decode one WAV into a [`Sound`] mapped to every note.
///
/// The root note comes from the `smpl` chunk when present, else 60. Audio
/// longer than [`MAX_SAMPLE_SECS`] is truncated.
pub fn sound_from_file(path: impl AsRef<Path>) -> Result<Sound> {
    let path = path.as_ref();
    let (mut channels, spec) = read_wav(path)?;
    if channels.len() > 2 {
        tracing::warn!(path = %path.display(), channels = channels.len(), "keeping first two channels");
        channels.truncate(2);
    }

    let max_frames = (spec.sample_rate as f32 * MAX_SAMPLE_SECS) as usize;
    let frames = channels.first().map_or(0, Vec::len);
    if frames > max_frames {
        tracing::warn!(
            path = %path.display(),
            seconds = frames as f32 / spec.sample_rate as f32,
            "sample longer than {MAX_SAMPLE_SECS} s, truncating"
        );
        for channel in &mut channels {
            channel.truncate(max_frames);
        }
    }
    if channels.iter().all(Vec::is_empty) {
        return Err(Error::EmptySample(path.to_path_buf()));
    }

    let root = match read_root_note(path) {
        Ok(note) => note.unwrap_or(DEFAULT_ROOT_NOTE),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read smpl chunk");
            DEFAULT_ROOT_NOTE
        }
    };

    Ok(Sound::new(file_stem(path), channels, spec.sample_rate as f32)
        .with_notes(NoteSet::all())
        .with_root_note(root)
        .with_envelope(0.0, RELEASE_SECS))
}

/// Build a kit bank from the `.wav` files in `dir`.
///
/// Files are taken in name order and mapped one per note upward from
/// [`KIT_BASE_NOTE`]; each pad plays at its recorded pitch. At most
/// [`MAX_KIT_SOUNDS`] are loaded. Files that fail to decode are skipped.
pub fn kit_from_dir(dir: impl AsRef<Path>) -> Result<SoundBank> {
    let dir = dir.as_ref();
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_wav(p))
        .collect();
    files.sort();

    if files.len() > MAX_KIT_SOUNDS {
        tracing::warn!(
            dir = %dir.display(),
            found = files.len(),
            "kit holds more than {MAX_KIT_SOUNDS} samples, ignoring the rest"
        );
        files.truncate(MAX_KIT_SOUNDS);
    }

    let mut sounds = Vec::with_capacity(files.len());
    for file in &files {
        match sound_from_file(file) {
            Ok(sound) => {
                let note = KIT_BASE_NOTE + sounds.len() as u8;
                sounds.push(
                    sound
                        .with_notes(NoteSet::single(note))
                        .with_root_note(note)
                        .with_envelope(0.0, RELEASE_SECS),
                );
            }
            Err(e) => tracing::warn!(path = %file.display(), error = %e, "skipping kit sample"),
        }
    }

    if sounds.is_empty() {
        return Err(Error::NoSamples(dir.to_path_buf()));
    }
    Ok(SoundBank::new(sounds))
}

/// Loads material and publishes it to the engine's shared bank.
#[derive(Debug, Clone)]
pub struct SampleManager {
    bank: Arc<SharedSoundBank>,
}

impl Default for SampleManager {
    fn default() -> Self {
        Self::new(Arc::new(SharedSoundBank::new()))
    }
}

impl SampleManager {
    /// Manage `bank`, usually the one the engine reads.
    pub fn new(bank: Arc<SharedSoundBank>) -> Self {
        Self { bank }
    }

    /// The shared handle loads are published to.
    pub fn bank(&self) -> &Arc<SharedSoundBank> {
        &self.bank
    }

    /// Replace the bank with a single sample played across the keyboard.
    pub fn load_sound(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let sound = sound_from_file(path).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to load sample");
        })?;
        tracing::info!(
            name = sound.name(),
            frames = sound.len(),
            channels = sound.channel_count(),
            root = sound.root_note(),
            "loaded sample"
        );
        self.bank.publish(SoundBank::new(vec![sound]));
        Ok(())
    }

    /// Replace the bank with a kit directory. Returns the number of pads.
    pub fn load_kit(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let kit = kit_from_dir(dir).inspect_err(|e| {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to load kit");
        })?;
        let pads = kit.len();
        tracing::info!(dir = %dir.display(), pads, "loaded kit");
        self.bank.publish(kit);
        Ok(pads)
    }

    /// Load a file as a single sound, or a directory as a kit.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_kit(path)
        } else {
            self.load_sound(path).map(|()| 1)
        }
    }

    /// Publish an empty bank. Every note-on is ignored afterwards.
    pub fn clear(&self) {
        self.bank.publish(SoundBank::empty());
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

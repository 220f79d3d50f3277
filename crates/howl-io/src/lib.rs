//! WAV I/O and sample loading for the Howling Wolves instrument.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for planar `f32` audio,
//!   plus [`read_root_note`] for the `smpl` chunk's unity note
//! - **Sample loading**: [`SampleManager`] builds a [`SoundBank`] from a single
//!   file or a kit directory and publishes it to the engine
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use howl_io::SampleManager;
//! use howl_synth::SharedSoundBank;
//!
//! let bank = Arc::new(SharedSoundBank::new());
//! let manager = SampleManager::new(Arc::clone(&bank));
//! let pads = manager.load_kit("kits/808")?;
//! println!("{pads} pads from C1 upward");
//! # Ok::<(), howl_io::Error>(())
//! ```

use std::path::PathBuf;

mod samples;
mod wav;

pub use howl_synth::{SharedSoundBank, Sound, SoundBank};
pub use samples::{
    KIT_BASE_NOTE, MAX_KIT_SOUNDS, MAX_SAMPLE_SECS, SampleManager, kit_from_dir,
    sound_from_file,
};
pub use wav::{WavSpec, read_root_note, read_wav, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file decoded to zero frames.
    #[error("sample has no audio: {}", .0.display())]
    EmptySample(PathBuf),

    /// A kit directory held no loadable WAV files.
    #[error("no samples found in {}", .0.display())]
    NoSamples(PathBuf),

    /// Only mono and stereo are handled.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u16),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

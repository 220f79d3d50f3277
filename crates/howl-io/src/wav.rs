//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is written as float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file as planar `f32`, one `Vec` per channel.
///
/// Integer formats are scaled to [-1, 1). Every channel is kept; callers
/// decide what to do with more than two.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(Error::UnsupportedChannels(0));
    }

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok((planar, spec))
}

/// Write planar audio to a WAV file.
///
/// The channel count comes from `channels`, not `spec`; one or two channels
/// are accepted. Channels are written up to the length of the shortest.
pub fn write_wav<P: AsRef<Path>>(path: P, channels: &[&[f32]], spec: WavSpec) -> Result<()> {
    let count = channels.len();
    if !(1..=2).contains(&count) {
        return Err(Error::UnsupportedChannels(count as u16));
    }

    let spec = WavSpec {
        channels: count as u16,
        ..spec
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);

    if spec.bits_per_sample == 32 {
        for i in 0..frames {
            for channel in channels {
                writer.write_sample(channel[i])?;
            }
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for i in 0..frames {
            for channel in channels {
                let int_sample = (channel[i] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

/// MIDI unity note from the file's `smpl` chunk.
///
/// Returns `None` when the file is not RIFF/WAVE, has no `smpl` chunk, or the
/// stored note is outside 0..=127.
pub fn read_root_note<P: AsRef<Path>>(path: P) -> Result<Option<u8>> {
    let mut reader = BufReader::new(File::open(path)?);
    root_note_from_riff(&mut reader)
}

pub(crate) fn root_note_from_riff<R: Read + Seek>(reader: &mut R) -> Result<Option<u8>> {
    let mut header = [0u8; 12];
    if !read_chunk(reader, &mut header)? || &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE"
    {
        return Ok(None);
    }

    let mut chunk = [0u8; 8];
    while read_chunk(reader, &mut chunk)? {
        let size = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
        if &chunk[0..4] == b"smpl" && size >= 16 {
            // manufacturer, product, sample period, unity note
            let mut data = [0u8; 16];
            if !read_chunk(reader, &mut data)? {
                return Ok(None);
            }
            let note = u32::from_le_bytes([data[12], data[13], data[14], data[15]]);
            return Ok(u8::try_from(note).ok().filter(|n| *n <= 127));
        }
        let padded = i64::from(size) + i64::from(size & 1);
        reader.seek(SeekFrom::Current(padded))?;
    }
    Ok(None)
}

/// `read_exact` that reports a clean end of file as `false`.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

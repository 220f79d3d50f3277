//! Circular-buffer delay line with fractional reads.
//!
//! The buffer is allocated once at construction; reads and writes never
//! allocate. A read of `d` returns the sample written `d` writes before the
//! most recent one, so `read(0.0)` is the last sample written.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Fractional read strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Truncate to the nearest earlier sample.
    None,
    /// Linear interpolation between neighbours.
    #[default]
    Linear,
}

/// Heap-backed delay line.
///
/// ```rust
/// use howl_core::InterpolatedDelay;
///
/// let mut line = InterpolatedDelay::new(8);
/// line.write(1.0);
/// line.write(0.0);
/// assert_eq!(line.read(1.0), 1.0);
/// assert_eq!(line.read(0.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    interpolation: Interpolation,
}

impl InterpolatedDelay {
    /// Allocate a line holding `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
            interpolation: Interpolation::Linear,
        }
    }

    /// Allocate enough room for `max_seconds` at `sample_rate`, plus one sample.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds.max(0.0)) as usize + 1)
    }

    /// Choose how fractional delays are read.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Read `delay_samples` behind the most recent write.
    ///
    /// Delays beyond the capacity are clamped to the oldest sample.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(0.0, (len - 1) as f32);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let newer = (self.write_pos + len - 1 - whole) % len;
        match self.interpolation {
            Interpolation::None => self.buffer[newer],
            Interpolation::Linear => {
                let older = (newer + len - 1) % len;
                let a = self.buffer[newer];
                a + (self.buffer[older] - a) * frac
            }
        }
    }

    /// Push a sample and advance.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read then write in one call.
    #[inline]
    pub fn read_write(&mut self, sample: f32, delay_samples: f32) -> f32 {
        let out = self.read(delay_samples);
        self.write(sample);
        out
    }

    /// Zero the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Number of stored samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

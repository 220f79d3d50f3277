//! Arpeggiator and 16-step scale sequencer.
//!
//! Three behaviours share one clock:
//!
//! | enabled | grid      | behaviour                                          |
//! |---------|-----------|----------------------------------------------------|
//! | yes     | any       | classic arpeggio over the held notes               |
//! | no      | non-empty | step sequencer, `lowest held + SCALE_DEGREES[cell]`|
//! | no      | empty     | passthrough                                        |
//!
//! While generating, incoming note events are consumed as held-note
//! bookkeeping and replaced by the generated notes; everything else passes
//! through at its original offset.
//!
//! Gates are tracked in samples. A note whose gate runs past the end of the
//! block is kept in flight and gets its note-off in a later block at the
//! exact sample its gate expires.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use howl_core::{MidiBuffer, MidiMessage, NoteDivision, resolve_bpm};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Cells in the sequencer grid.
pub const GRID_STEPS: usize = 16;

/// Semitone offsets for grid cells 0..=7.
pub const SCALE_DEGREES: [u8; 8] = [0, 2, 3, 5, 7, 9, 10, 12];

/// Floor on the step length so absurd tempos cannot flood the output.
pub const MIN_SAMPLES_PER_STEP: f64 = 100.0;

/// Largest span the clock advances without re-checking the step boundary.
const CHUNK: usize = 32;

const OUT_CHANNEL: u8 = 1;
const OUT_VELOCITY: u8 = 100;
const DEFAULT_SEED: u64 = 0x4857_4f4c_4641_5250;

/// Order the classic arpeggio walks the held notes in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArpMode {
    /// Lowest to highest.
    #[default]
    Up,
    /// Highest to lowest.
    Down,
    /// Up then down, ends not repeated.
    UpDown,
    /// Uniformly random held note each step.
    Random,
}

impl ArpMode {
    /// Map a choice index; out-of-range values clamp to [`ArpMode::Random`].
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => ArpMode::Up,
            1 => ArpMode::Down,
            2 => ArpMode::UpDown,
            _ => ArpMode::Random,
        }
    }
}

/// Map the normalized rate control to a step length.
///
/// ```rust
/// use howl_core::NoteDivision;
/// use howl_midi::rate_division;
///
/// assert_eq!(rate_division(0.0), NoteDivision::Quarter);
/// assert_eq!(rate_division(0.3), NoteDivision::Eighth);
/// assert_eq!(rate_division(0.5), NoteDivision::Sixteenth);
/// assert_eq!(rate_division(0.9), NoteDivision::ThirtySecond);
/// ```
pub fn rate_division(rate: f32) -> NoteDivision {
    if rate <= 0.1 {
        NoteDivision::Quarter
    } else if rate <= 0.4 {
        NoteDivision::Eighth
    } else if rate <= 0.7 {
        NoteDivision::Sixteenth
    } else {
        NoteDivision::ThirtySecond
    }
}

/// Arpeggiator controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArpSettings {
    /// Classic arpeggio on; off falls back to the sequencer or passthrough.
    pub enabled: bool,
    /// Walk order.
    pub mode: ArpMode,
    /// Normalized rate, see [`rate_division`].
    pub rate: f32,
    /// Octaves spanned, 1..=4.
    pub octaves: u8,
    /// Gate as a fraction of the step, 0..=1.
    pub gate: f32,
    /// Stored for presets; does not drive the generator.
    pub density: f32,
    /// Stored for presets; does not drive the generator.
    pub complexity: f32,
    /// Stored for presets; does not drive the generator.
    pub spread: f32,
}

impl Default for ArpSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: ArpMode::Up,
            rate: 0.5,
            octaves: 1,
            gate: 0.5,
            density: 0.5,
            complexity: 0.5,
            spread: 0.5,
        }
    }
}

impl ArpSettings {
    fn clamped(self) -> Self {
        Self {
            rate: self.rate.clamp(0.0, 1.0),
            octaves: self.octaves.clamp(1, 4),
            gate: self.gate.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// A generated note still waiting for its note-off.
#[derive(Clone, Copy, Debug)]
struct InFlight {
    note: u8,
    remaining: usize,
}

/// Tempo-synced note generator.
///
/// # Example
///
/// ```rust
/// use howl_core::{MidiBuffer, MidiMessage};
/// use howl_midi::Arpeggiator;
///
/// let mut arp = Arpeggiator::new(48000.0);
/// arp.set_rhythm_step(0, Some(4)); // perfect fifth
///
/// let mut midi = MidiBuffer::with_capacity(16);
/// midi.push(0, MidiMessage::NoteOn { channel: 1, note: 48, velocity: 90 });
/// arp.process(&mut midi, 256, None);
///
/// assert_eq!(midi.iter().next().and_then(|e| e.message.note_on()), Some((55, 100)));
/// ```
#[derive(Debug, Clone)]
pub struct Arpeggiator {
    settings: ArpSettings,
    held: Vec<u8>,
    grid: [Option<u8>; GRID_STEPS],
    step: usize,
    note_time: f64,
    trigger_pending: bool,
    in_flight: Vec<InFlight>,
    scratch: MidiBuffer,
    rng: SmallRng,
    sample_rate: f32,
}

impl Arpeggiator {
    /// Create with default settings and an empty grid.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, DEFAULT_SEED)
    }

    /// Create with a specific seed for [`ArpMode::Random`].
    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        Self {
            settings: ArpSettings::default(),
            held: Vec::with_capacity(128),
            grid: [None; GRID_STEPS],
            step: 0,
            note_time: 0.0,
            trigger_pending: false,
            in_flight: Vec::with_capacity(64),
            scratch: MidiBuffer::with_capacity(256),
            rng: SmallRng::seed_from_u64(seed),
            sample_rate,
        }
    }

    /// Set the sample rate used for step timing.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Apply new controls. Values are clamped to their ranges.
    pub fn set_settings(&mut self, settings: ArpSettings) {
        self.settings = settings.clamped();
    }

    /// Current controls.
    pub fn settings(&self) -> &ArpSettings {
        &self.settings
    }

    /// Set grid cell `step` to a scale degree (clamped to 7) or a rest.
    /// Steps past the grid are ignored.
    pub fn set_rhythm_step(&mut self, step: usize, degree: Option<u8>) {
        if let Some(cell) = self.grid.get_mut(step) {
            *cell = degree.map(|d| d.min(SCALE_DEGREES.len() as u8 - 1));
        }
    }

    /// Grid cell `step`; `None` for a rest or an out-of-range step.
    pub fn rhythm_step(&self, step: usize) -> Option<u8> {
        self.grid.get(step).copied().flatten()
    }

    /// Whole grid.
    pub fn grid(&self) -> &[Option<u8>; GRID_STEPS] {
        &self.grid
    }

    /// Set every cell to a rest.
    pub fn clear_rhythm(&mut self) {
        self.grid = [None; GRID_STEPS];
    }

    /// True when every cell is a rest.
    pub fn is_grid_empty(&self) -> bool {
        self.grid.iter().all(Option::is_none)
    }

    /// Held notes, ascending and unique.
    pub fn held_notes(&self) -> &[u8] {
        &self.held
    }

    /// Steps taken since the last restart.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Generated notes still awaiting their note-off.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// True while notes are being generated rather than passed through.
    pub fn is_generating(&self) -> bool {
        self.settings.enabled || !self.is_grid_empty()
    }

    /// Forget held and in-flight notes and rewind the clock.
    pub fn reset(&mut self) {
        self.held.clear();
        self.in_flight.clear();
        self.step = 0;
        self.note_time = 0.0;
        self.trigger_pending = false;
    }

    /// Record a held note. The first note after silence restarts the
    /// pattern and fires on the current block.
    pub fn note_on(&mut self, note: u8) {
        if note > 127 {
            return;
        }
        let was_empty = self.held.is_empty();
        if let Err(at) = self.held.binary_search(&note) {
            self.held.insert(at, note);
        }
        if was_empty {
            self.step = 0;
            self.trigger_pending = true;
        }
    }

    /// Release a held note.
    pub fn note_off(&mut self, note: u8) {
        if let Ok(at) = self.held.binary_search(&note) {
            self.held.remove(at);
        }
    }

    /// Samples per step at `bpm`, floored at [`MIN_SAMPLES_PER_STEP`].
    pub fn samples_per_step(&self, bpm: Option<f32>) -> f64 {
        let samples = rate_division(self.settings.rate).to_samples(resolve_bpm(bpm), self.sample_rate);
        f64::from(samples).max(MIN_SAMPLES_PER_STEP)
    }

    /// Process one block of `num_samples`, replacing `midi` with the
    /// generated stream.
    ///
    /// `bpm` is the host tempo, `None` when the host has no transport.
    pub fn process(&mut self, midi: &mut MidiBuffer, num_samples: usize, bpm: Option<f32>) {
        for event in midi.iter() {
            if let Some((note, _)) = event.message.note_on() {
                self.note_on(note);
            } else if let Some(note) = event.message.note_off() {
                self.note_off(note);
            } else if let MidiMessage::AllNotesOff { .. } = event.message {
                self.reset();
            }
        }

        if !self.is_generating() {
            // the instant trigger belongs to generated notes only
            self.trigger_pending = false;
            flush_in_flight(&mut self.in_flight, midi, num_samples);
            return;
        }

        self.scratch.clear();
        for event in midi.iter().filter(|e| !e.message.is_note()) {
            self.scratch.push_event(*event);
        }
        flush_in_flight(&mut self.in_flight, &mut self.scratch, num_samples);

        if !self.held.is_empty() {
            self.run_clock(num_samples, self.samples_per_step(bpm));
        }

        core::mem::swap(midi, &mut self.scratch);
    }

    fn run_clock(&mut self, num_samples: usize, samples_per_step: f64) {
        let mut pos = 0;
        let mut remaining = num_samples;
        while remaining > 0 {
            if self.trigger_pending {
                self.trigger_pending = false;
                self.note_time = 0.0;
                self.fire(pos, remaining, samples_per_step);
            } else if self.note_time >= samples_per_step {
                self.note_time -= samples_per_step;
                self.fire(pos, remaining, samples_per_step);
            }

            let mut amount = remaining.min(CHUNK);
            let distance = samples_per_step - self.note_time;
            if distance > 0.0 && distance < CHUNK as f64 {
                amount = libm::ceil(distance) as usize;
            }
            let amount = amount.clamp(1, remaining);

            self.note_time += amount as f64;
            remaining -= amount;
            pos += amount;
        }
    }

    fn fire(&mut self, pos: usize, remaining: usize, samples_per_step: f64) {
        if let Some(note) = self.next_note() {
            self.scratch.push(
                pos as u32,
                MidiMessage::NoteOn {
                    channel: OUT_CHANNEL,
                    note,
                    velocity: OUT_VELOCITY,
                },
            );
            let gate = (samples_per_step * f64::from(self.settings.gate)) as usize;
            if gate < remaining {
                self.scratch.push(
                    (pos + gate) as u32,
                    MidiMessage::NoteOff {
                        channel: OUT_CHANNEL,
                        note,
                    },
                );
            } else {
                self.in_flight.push(InFlight {
                    note,
                    remaining: gate - remaining,
                });
            }
        }
        self.step = self.step.wrapping_add(1);
    }

    /// Note for the current step, `None` for a rest or an out-of-range note.
    fn next_note(&mut self) -> Option<u8> {
        let root = *self.held.first()?;
        let n = self.held.len();

        let note = if self.settings.enabled {
            let index = match self.settings.mode {
                ArpMode::Up => self.step % n,
                ArpMode::Down => (n - 1) - self.step % n,
                ArpMode::UpDown if n < 2 => 0,
                ArpMode::UpDown => {
                    let span = 2 * n - 2;
                    let p = self.step % span;
                    if p < n { p } else { span - p }
                }
                ArpMode::Random => self.rng.random_range(0..n),
            };
            let octaves = usize::from(self.settings.octaves);
            let octave = if octaves > 1 {
                (self.step / n) % octaves
            } else {
                0
            };
            usize::from(self.held[index]) + 12 * octave
        } else {
            let degree = self.grid[self.step % GRID_STEPS]?;
            usize::from(root) + usize::from(SCALE_DEGREES[usize::from(degree)])
        };

        (1..=127).contains(&note).then_some(note as u8)
    }
}

/// Emit note-offs for in-flight notes expiring within this block and age
/// the rest.
fn flush_in_flight(in_flight: &mut Vec<InFlight>, out: &mut MidiBuffer, num_samples: usize) {
    in_flight.retain_mut(|pending| {
        if pending.remaining < num_samples {
            out.push(
                pending.remaining as u32,
                MidiMessage::NoteOff {
                    channel: OUT_CHANNEL,
                    note: pending.note,
                },
            );
            false
        } else {
            pending.remaining -= num_samples;
            true
        }
    });
}

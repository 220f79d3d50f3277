//! Chord generator with hold.
//!
//! Every note-on becomes the root plus the mode's intervals; note-offs follow
//! the same expansion. With hold on, note-offs are swallowed and remembered.
//! Turning hold off releases every remembered note once, at the start of the
//! next block.

use howl_core::{MidiBuffer, MidiMessage};

/// Flush note-offs carry this channel; no input channel is known for them.
const FLUSH_CHANNEL: u8 = 1;

/// Chord shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChordMode {
    /// Passthrough.
    #[default]
    Off,
    /// Root, major third, fifth.
    Major,
    /// Root, minor third, fifth.
    Minor,
    /// Dominant seventh.
    Seventh,
    /// Major triad plus the ninth.
    Ninth,
}

impl ChordMode {
    /// Map a choice index; out-of-range values clamp to [`ChordMode::Ninth`].
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => ChordMode::Off,
            1 => ChordMode::Major,
            2 => ChordMode::Minor,
            3 => ChordMode::Seventh,
            _ => ChordMode::Ninth,
        }
    }

    /// Semitone offsets above the root.
    ///
    /// ```rust
    /// use howl_midi::ChordMode;
    ///
    /// assert_eq!(ChordMode::Seventh.intervals(), &[4, 7, 10]);
    /// assert!(ChordMode::Off.intervals().is_empty());
    /// ```
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordMode::Off => &[],
            ChordMode::Major => &[4, 7],
            ChordMode::Minor => &[3, 7],
            ChordMode::Seventh => &[4, 7, 10],
            ChordMode::Ninth => &[4, 7, 14],
        }
    }
}

/// Note-in, chord-out MIDI stage.
#[derive(Debug, Clone)]
pub struct ChordEngine {
    mode: ChordMode,
    hold: bool,
    held: [bool; 128],
    flush_pending: bool,
    scratch: MidiBuffer,
}

impl Default for ChordEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordEngine {
    /// Create in passthrough with hold off.
    pub fn new() -> Self {
        Self {
            mode: ChordMode::Off,
            hold: false,
            held: [false; 128],
            flush_pending: false,
            scratch: MidiBuffer::with_capacity(256),
        }
    }

    /// Set the chord shape.
    pub fn set_mode(&mut self, mode: ChordMode) {
        self.mode = mode;
    }

    /// Switch hold. Turning it off schedules one release of every held note.
    pub fn set_hold(&mut self, hold: bool) {
        if self.hold && !hold {
            self.flush_pending = true;
        }
        self.hold = hold;
    }

    /// Chord shape as set.
    pub fn mode(&self) -> ChordMode {
        self.mode
    }

    /// Hold state.
    pub fn hold(&self) -> bool {
        self.hold
    }

    /// Shape actually applied: hold with no shape plays minor chords.
    pub fn effective_mode(&self) -> ChordMode {
        if self.hold && self.mode == ChordMode::Off {
            ChordMode::Minor
        } else {
            self.mode
        }
    }

    /// Notes waiting for release, ascending.
    pub fn held_notes(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..128).filter(|&n| self.held[usize::from(n)])
    }

    /// Process one block in place.
    pub fn process(&mut self, midi: &mut MidiBuffer) {
        let mode = self.effective_mode();
        if mode == ChordMode::Off && !self.flush_pending {
            return;
        }

        self.scratch.clear();
        if self.flush_pending {
            self.flush_pending = false;
            for note in 0u8..128 {
                if core::mem::take(&mut self.held[usize::from(note)]) {
                    self.scratch.push(
                        0,
                        MidiMessage::NoteOff {
                            channel: FLUSH_CHANNEL,
                            note,
                        },
                    );
                }
            }
        }

        for event in midi.iter() {
            let (offset, message) = (event.offset, event.message);
            if mode == ChordMode::Off || !message.is_note() {
                self.scratch.push(offset, message);
                continue;
            }
            let channel = match message {
                MidiMessage::NoteOn { channel, .. } | MidiMessage::NoteOff { channel, .. } => channel,
                _ => FLUSH_CHANNEL,
            };

            if let Some((root, velocity)) = message.note_on() {
                for note in chord_notes(root, mode) {
                    self.scratch.push(
                        offset,
                        MidiMessage::NoteOn {
                            channel,
                            note,
                            velocity,
                        },
                    );
                    if self.hold {
                        self.held[usize::from(note)] = true;
                    }
                }
            } else if let Some(root) = message.note_off() {
                for note in chord_notes(root, mode) {
                    if self.hold {
                        self.held[usize::from(note)] = true;
                    } else {
                        self.held[usize::from(note)] = false;
                        self.scratch.push(offset, MidiMessage::NoteOff { channel, note });
                    }
                }
            }
        }

        core::mem::swap(midi, &mut self.scratch);
    }
}

/// Root and stacked notes, dropping anything above 127.
fn chord_notes(root: u8, mode: ChordMode) -> impl Iterator<Item = u8> {
    core::iter::once(0)
        .chain(mode.intervals().iter().copied())
        .map(move |interval| u16::from(root) + u16::from(interval))
        .filter(|&note| note <= 127)
        .map(|note| note as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    extern crate alloc;
    #[cfg(feature = "std")]
    extern crate std as alloc;
    use alloc::vec::Vec;

    fn ons(midi: &MidiBuffer) -> Vec<u8> {
        midi.iter()
            .filter_map(|e| e.message.note_on().map(|(n, _)| n))
            .collect()
    }

    fn offs(midi: &MidiBuffer) -> Vec<u8> {
        midi.iter().filter_map(|e| e.message.note_off()).collect()
    }

    fn block(events: &[(u32, MidiMessage)]) -> MidiBuffer {
        let mut midi = MidiBuffer::new();
        for &(offset, message) in events {
            midi.push(offset, message);
        }
        midi
    }

    const ON_60: MidiMessage = MidiMessage::NoteOn {
        channel: 1,
        note: 60,
        velocity: 100,
    };
    const OFF_60: MidiMessage = MidiMessage::NoteOff { channel: 1, note: 60 };

    #[test]
    fn major_triad_on_and_off() {
        let mut chord = ChordEngine::new();
        chord.set_mode(ChordMode::Major);
        let mut midi = block(&[(4, ON_60), (40, OFF_60)]);
        chord.process(&mut midi);
        assert_eq!(ons(&midi), [60, 64, 67]);
        assert_eq!(offs(&midi), [60, 64, 67]);
        assert!(midi.iter().take(3).all(|e| e.offset == 4));
    }

    #[test]
    fn every_shape() {
        for (mode, expected) in [
            (ChordMode::Minor, &[60u8, 63, 67][..]),
            (ChordMode::Seventh, &[60, 64, 67, 70][..]),
            (ChordMode::Ninth, &[60, 64, 67, 74][..]),
        ] {
            let mut chord = ChordEngine::new();
            chord.set_mode(mode);
            let mut midi = block(&[(0, ON_60)]);
            chord.process(&mut midi);
            assert_eq!(ons(&midi), expected, "{mode:?}");
        }
    }

    #[test]
    fn notes_above_127_are_dropped() {
        let mut chord = ChordEngine::new();
        chord.set_mode(ChordMode::Ninth);
        let mut midi = block(&[(0, MidiMessage::NoteOn { channel: 1, note: 118, velocity: 1 })]);
        chord.process(&mut midi);
        assert_eq!(ons(&midi), [118, 122, 125]);
    }

    #[test]
    fn off_is_passthrough() {
        let mut chord = ChordEngine::new();
        let mut midi = block(&[(0, ON_60), (8, MidiMessage::PitchBend { channel: 2, value: 100 })]);
        chord.process(&mut midi);
        assert_eq!(ons(&midi), [60]);
        assert_eq!(midi.len(), 2);
    }

    #[test]
    fn hold_suppresses_then_flushes_once() {
        let mut chord = ChordEngine::new();
        chord.set_mode(ChordMode::Major);
        chord.set_hold(true);

        let mut midi = block(&[(0, ON_60), (10, OFF_60)]);
        chord.process(&mut midi);
        assert_eq!(ons(&midi), [60, 64, 67]);
        assert!(offs(&midi).is_empty());
        assert_eq!(chord.held_notes().collect::<Vec<_>>(), [60, 64, 67]);

        chord.set_hold(false);
        let mut midi = MidiBuffer::new();
        chord.process(&mut midi);
        assert_eq!(offs(&midi), [60, 64, 67]);
        assert!(midi.iter().all(|e| e.offset == 0));

        let mut midi = MidiBuffer::new();
        chord.process(&mut midi);
        assert!(midi.is_empty());
        assert_eq!(chord.held_notes().count(), 0);
    }

    #[test]
    fn hold_alone_plays_minor() {
        let mut chord = ChordEngine::new();
        chord.set_hold(true);
        assert_eq!(chord.effective_mode(), ChordMode::Minor);
        let mut midi = block(&[(0, ON_60)]);
        chord.process(&mut midi);
        assert_eq!(ons(&midi), [60, 63, 67]);
    }

    #[test]
    fn flush_still_happens_in_passthrough() {
        let mut chord = ChordEngine::new();
        chord.set_hold(true);
        let mut midi = block(&[(0, ON_60)]);
        chord.process(&mut midi);

        chord.set_hold(false);
        let mut midi = block(&[(5, MidiMessage::NoteOn { channel: 1, note: 72, velocity: 80 })]);
        chord.process(&mut midi);
        assert_eq!(offs(&midi), [60, 63, 67]);
        assert_eq!(ons(&midi), [72]);
    }
}

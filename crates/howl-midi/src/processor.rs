//! Chord stage followed by the arpeggiator.

use howl_core::MidiBuffer;

use crate::arpeggiator::{ArpSettings, Arpeggiator};
use crate::chord::{ChordEngine, ChordMode};

/// Per-block MIDI pipeline: chords first, then arpeggiation.
#[derive(Debug, Clone)]
pub struct MidiProcessor {
    chord: ChordEngine,
    arp: Arpeggiator,
}

impl MidiProcessor {
    /// Create with both stages in passthrough.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            chord: ChordEngine::new(),
            arp: Arpeggiator::new(sample_rate),
        }
    }

    /// Create with a seed for the random arpeggio.
    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        Self {
            chord: ChordEngine::new(),
            arp: Arpeggiator::with_seed(sample_rate, seed),
        }
    }

    /// Set the sample rate and rewind the arpeggiator.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.arp.set_sample_rate(sample_rate);
        self.arp.reset();
    }

    /// Transport stop or panic: drop held and in-flight arpeggio notes.
    pub fn reset(&mut self) {
        self.arp.reset();
    }

    /// Chord shape and hold.
    pub fn set_chord(&mut self, mode: ChordMode, hold: bool) {
        self.chord.set_mode(mode);
        self.chord.set_hold(hold);
    }

    /// Arpeggiator controls.
    pub fn set_arp(&mut self, settings: ArpSettings) {
        self.arp.set_settings(settings);
    }

    /// The chord stage.
    pub fn chord(&self) -> &ChordEngine {
        &self.chord
    }

    /// The arpeggiator, for grid editing.
    pub fn arpeggiator(&self) -> &Arpeggiator {
        &self.arp
    }

    /// Mutable arpeggiator.
    pub fn arpeggiator_mut(&mut self) -> &mut Arpeggiator {
        &mut self.arp
    }

    /// Run both stages over one block, replacing `midi`.
    pub fn process(&mut self, midi: &mut MidiBuffer, num_samples: usize, bpm: Option<f32>) {
        self.chord.process(midi);
        self.arp.process(midi, num_samples, bpm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arpeggiator::ArpMode;
    use howl_core::MidiMessage;

    #[test]
    fn chord_feeds_the_arpeggiator() {
        let mut proc = MidiProcessor::new(48000.0);
        proc.set_chord(ChordMode::Minor, false);
        proc.set_arp(ArpSettings {
            enabled: true,
            mode: ArpMode::Down,
            ..Default::default()
        });
        let mut midi = MidiBuffer::new();
        midi.push(0, MidiMessage::NoteOn { channel: 1, note: 57, velocity: 70 });
        proc.process(&mut midi, 64, None);
        assert_eq!(proc.arpeggiator().held_notes(), &[57, 60, 64]);
        // Down starts from the top of the chord.
        assert_eq!(midi.iter().next().and_then(|e| e.message.note_on()), Some((64, 100)));
    }

    #[test]
    fn reset_rewinds_the_arpeggiator() {
        let mut proc = MidiProcessor::new(48000.0);
        proc.set_arp(ArpSettings {
            enabled: true,
            ..Default::default()
        });
        let mut midi = MidiBuffer::new();
        midi.push(0, MidiMessage::NoteOn { channel: 1, note: 60, velocity: 70 });
        proc.process(&mut midi, 64, None);
        proc.reset();
        assert!(proc.arpeggiator().held_notes().is_empty());
        assert_eq!(proc.arpeggiator().current_step(), 0);
    }

    #[test]
    fn both_off_is_transparent() {
        let mut proc = MidiProcessor::new(44100.0);
        let mut midi = MidiBuffer::new();
        midi.push(3, MidiMessage::NoteOn { channel: 2, note: 40, velocity: 12 });
        proc.process(&mut midi, 64, Some(90.0));
        assert_eq!(midi.len(), 1);
        assert_eq!(midi.iter().next().map(|e| e.offset), Some(3));
        assert!(!proc.chord().hold());
    }
}

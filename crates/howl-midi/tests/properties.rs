//! Property-based tests for howl-midi.
//!
//! The arpeggiator clock is driven with arbitrary block sizes while the
//! generator flips between classic, sequencer and passthrough modes. Every
//! generated note-on gets exactly one note-off, every gate is the same whole
//! number of samples, and no event lands outside its block.

use std::collections::{HashMap, VecDeque};

use howl_core::{MidiBuffer, MidiMessage};
use howl_midi::{ArpMode, ArpSettings, Arpeggiator};
use proptest::prelude::*;

const HELD: [u8; 3] = [60, 64, 67];
const BPM: f32 = 120.0;

/// Generator state for one block.
#[derive(Debug, Clone, Copy)]
enum Generate {
    Classic,
    Sequencer,
    Passthrough,
}

fn generate() -> impl Strategy<Value = Generate> {
    prop_oneof![
        2 => Just(Generate::Classic),
        2 => Just(Generate::Sequencer),
        1 => Just(Generate::Passthrough),
    ]
}

fn configure(arp: &mut Arpeggiator, base: ArpSettings, mode: Generate) {
    arp.set_settings(ArpSettings {
        enabled: matches!(mode, Generate::Classic),
        ..base
    });
    arp.clear_rhythm();
    if matches!(mode, Generate::Sequencer) {
        for (step, degree) in [(0, 0), (2, 4), (3, 7), (5, 0), (9, 2), (12, 5)] {
            arp.set_rhythm_step(step, Some(degree));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gates_balance_and_stay_exact(
        sample_rate in prop_oneof![Just(44100.0f32), Just(48000.0f32)],
        rate in 0.0f32..=1.0,
        gate in 0.0f32..=1.0,
        mode in 0usize..4,
        octaves in 1u8..=2,
        blocks in prop::collection::vec((1usize..=2048, generate()), 20..80),
    ) {
        let base = ArpSettings {
            rate,
            gate,
            mode: ArpMode::from_index(mode),
            octaves,
            ..ArpSettings::default()
        };
        let mut arp = Arpeggiator::new(sample_rate);
        configure(&mut arp, base, Generate::Classic);
        let expected_gate = (arp.samples_per_step(Some(BPM)) * f64::from(gate)) as u64;

        let mut open: HashMap<u8, VecDeque<u64>> = HashMap::new();
        let mut ons = 0usize;
        let mut now = 0u64;
        let mut midi = MidiBuffer::with_capacity(64);

        for (i, &(num_samples, state)) in blocks.iter().enumerate() {
            // the held notes arrive while generating so none leak through
            let state = if i == 0 { Generate::Classic } else { state };
            configure(&mut arp, base, state);

            midi.clear();
            if i == 0 {
                for note in HELD {
                    midi.push(0, MidiMessage::NoteOn { channel: 1, note, velocity: 90 });
                }
            }
            arp.process(&mut midi, num_samples, Some(BPM));

            for event in midi.iter() {
                prop_assert!((event.offset as usize) < num_samples);
                let at = now + u64::from(event.offset);
                if let Some((note, _)) = event.message.note_on() {
                    open.entry(note).or_default().push_back(at);
                    ons += 1;
                } else if let Some(note) = event.message.note_off() {
                    let started = open.get_mut(&note).and_then(VecDeque::pop_front);
                    prop_assert!(started.is_some(), "note-off {} without a note-on", note);
                    if let Some(started) = started {
                        prop_assert_eq!(at - started, expected_gate);
                    }
                }
            }
            now += num_samples as u64;
        }

        prop_assert!(ons > 0);
        let still_open: usize = open.values().map(VecDeque::len).sum();
        prop_assert_eq!(still_open, arp.in_flight_count());
    }
}

//! Integration tests for howl-midi.
//!
//! Timing is checked in absolute samples across many blocks of uneven size,
//! the way a host delivers them.

use howl_core::{MidiBuffer, MidiMessage, NoteDivision};
use howl_midi::{ArpMode, ArpSettings, Arpeggiator, ChordMode, MidiProcessor};

const SR: f32 = 48000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    On,
    Off,
}

/// Run `blocks` through `process`, returning `(absolute sample, kind, note)`.
fn run(
    mut process: impl FnMut(&mut MidiBuffer, usize),
    first: &[MidiMessage],
    block_sizes: &[usize],
    total: usize,
) -> Vec<(usize, Kind, u8)> {
    let mut out = Vec::new();
    let mut now = 0;
    let mut midi = MidiBuffer::with_capacity(64);
    for message in first {
        midi.push(0, *message);
    }
    let mut sizes = block_sizes.iter().cycle();
    while now < total {
        let len = sizes.next().copied().unwrap_or(512);
        process(&mut midi, len);
        for event in midi.iter() {
            let at = now + event.offset as usize;
            if let Some((note, _)) = event.message.note_on() {
                out.push((at, Kind::On, note));
            } else if let Some(note) = event.message.note_off() {
                out.push((at, Kind::Off, note));
            }
        }
        midi.clear();
        now += len;
    }
    out
}

fn hold(notes: &[u8]) -> Vec<MidiMessage> {
    notes
        .iter()
        .map(|&note| MidiMessage::NoteOn {
            channel: 1,
            note,
            velocity: 100,
        })
        .collect()
}

fn quarter_arp(mode: ArpMode) -> Arpeggiator {
    let mut arp = Arpeggiator::new(SR);
    arp.set_settings(ArpSettings {
        enabled: true,
        mode,
        rate: 0.0,
        gate: 0.5,
        ..Default::default()
    });
    arp
}

// ---------------------------------------------------------------------------
// 1. Classic arpeggio timing
// ---------------------------------------------------------------------------

#[test]
fn up_quarter_notes_every_half_second() {
    let mut arp = quarter_arp(ArpMode::Up);
    let events = run(
        |midi, len| arp.process(midi, len, Some(120.0)),
        &hold(&[60, 64, 67]),
        &[512],
        120_000,
    );
    let ons: Vec<(usize, u8)> = events
        .iter()
        .filter(|e| e.1 == Kind::On)
        .map(|e| (e.0, e.2))
        .collect();
    assert_eq!(
        &ons[..5],
        &[(0, 60), (24000, 64), (48000, 67), (72000, 60), (96000, 64)]
    );
    let offs: Vec<usize> = events.iter().filter(|e| e.1 == Kind::Off).map(|e| e.0).collect();
    assert_eq!(&offs[..3], &[12000, 36000, 60000]);
}

#[test]
fn down_quarter_notes() {
    let mut arp = quarter_arp(ArpMode::Down);
    let events = run(
        |midi, len| arp.process(midi, len, Some(120.0)),
        &hold(&[60, 64, 67]),
        &[333, 1024, 77],
        100_000,
    );
    let ons: Vec<u8> = events.iter().filter(|e| e.1 == Kind::On).map(|e| e.2).collect();
    assert_eq!(&ons[..4], &[67, 64, 60, 67]);
}

#[test]
fn missing_tempo_means_120() {
    let mut with = quarter_arp(ArpMode::Up);
    let mut without = quarter_arp(ArpMode::Up);
    let a = run(|m, l| with.process(m, l, Some(120.0)), &hold(&[60]), &[256], 60_000);
    let b = run(|m, l| without.process(m, l, None), &hold(&[60]), &[256], 60_000);
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// 2. Gate length across block boundaries
// ---------------------------------------------------------------------------

#[test]
fn gate_length_is_exact_across_blocks() {
    let sr = 44100.0;
    let bpm = 133.0;
    let gate = 0.37f32;
    let mut arp = Arpeggiator::new(sr);
    arp.set_settings(ArpSettings {
        enabled: true,
        mode: ArpMode::Up,
        rate: 0.5,
        gate,
        ..Default::default()
    });
    let samples_per_step = f64::from(NoteDivision::Sixteenth.to_samples(bpm, sr));
    let gate_samples = (samples_per_step * f64::from(gate)) as usize;

    let events = run(
        |midi, len| arp.process(midi, len, Some(bpm)),
        &hold(&[48, 55]),
        &[37, 512, 1000, 64, 4096, 3],
        200_000,
    );
    let ons: Vec<&(usize, Kind, u8)> = events.iter().filter(|e| e.1 == Kind::On).collect();
    let offs: Vec<&(usize, Kind, u8)> = events.iter().filter(|e| e.1 == Kind::Off).collect();
    assert!(ons.len() > 30);
    assert!(offs.len() + 1 >= ons.len());
    for (on, off) in ons.iter().zip(offs.iter()) {
        assert_eq!(on.2, off.2, "note-off for the wrong note");
        assert_eq!(off.0 - on.0, gate_samples, "gate drifted at sample {}", on.0);
    }
}

#[test]
fn full_gate_spanning_many_blocks() {
    let mut arp = quarter_arp(ArpMode::Up);
    arp.set_settings(ArpSettings {
        gate: 1.0,
        ..*arp.settings()
    });
    let events = run(
        |midi, len| arp.process(midi, len, Some(120.0)),
        &hold(&[60]),
        &[64],
        50_000,
    );
    let offs: Vec<usize> = events.iter().filter(|e| e.1 == Kind::Off).map(|e| e.0).collect();
    assert_eq!(offs[0], 24000);
}

// ---------------------------------------------------------------------------
// 3. Passthrough and sequencer
// ---------------------------------------------------------------------------

#[test]
fn disabling_mid_note_still_sends_its_note_off() {
    let mut arp = quarter_arp(ArpMode::Up);
    let mut midi = MidiBuffer::new();
    midi.push(0, MidiMessage::NoteOn { channel: 1, note: 60, velocity: 100 });
    arp.process(&mut midi, 1000, None);
    assert_eq!(arp.in_flight_count(), 1);

    arp.set_settings(ArpSettings {
        enabled: false,
        ..*arp.settings()
    });
    let mut offs = Vec::new();
    let mut now = 1000;
    for _ in 0..20 {
        let mut midi = MidiBuffer::new();
        arp.process(&mut midi, 1000, None);
        offs.extend(midi.iter().filter_map(|e| e.message.note_off().map(|n| (now + e.offset as usize, n))));
        now += 1000;
    }
    assert_eq!(offs, vec![(12000, 60)]);
    assert_eq!(arp.in_flight_count(), 0);
}

#[test]
fn sequencer_plays_grid_with_rests() {
    let mut arp = Arpeggiator::new(SR);
    arp.set_settings(ArpSettings {
        rate: 0.0,
        ..Default::default()
    });
    for (step, degree) in [(0, 0), (1, 4), (3, 6)] {
        arp.set_rhythm_step(step, Some(degree));
    }
    let events = run(
        |midi, len| arp.process(midi, len, Some(120.0)),
        &hold(&[45]),
        &[480],
        24000 * 4,
    );
    let ons: Vec<(usize, u8)> = events
        .iter()
        .filter(|e| e.1 == Kind::On)
        .map(|e| (e.0, e.2))
        .collect();
    assert_eq!(ons, vec![(0, 45), (24000, 52), (72000, 55)]);
}

// ---------------------------------------------------------------------------
// 4. Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn held_chord_releases_once_through_the_pipeline() {
    let mut proc = MidiProcessor::new(SR);
    proc.set_chord(ChordMode::Seventh, true);

    let mut midi = MidiBuffer::new();
    midi.push(0, MidiMessage::NoteOn { channel: 1, note: 50, velocity: 64 });
    midi.push(100, MidiMessage::NoteOff { channel: 1, note: 50 });
    proc.process(&mut midi, 256, None);
    assert_eq!(midi.iter().filter(|e| e.message.note_on().is_some()).count(), 4);
    assert_eq!(midi.iter().filter(|e| e.message.note_off().is_some()).count(), 0);

    proc.set_chord(ChordMode::Seventh, false);
    let mut releases = 0;
    for _ in 0..3 {
        let mut midi = MidiBuffer::new();
        proc.process(&mut midi, 256, None);
        releases += midi.iter().filter(|e| e.message.note_off().is_some()).count();
    }
    assert_eq!(releases, 4);
}

#[test]
fn chord_then_arp_up_walks_the_chord() {
    let mut proc = MidiProcessor::new(SR);
    proc.set_chord(ChordMode::Major, false);
    proc.set_arp(ArpSettings {
        enabled: true,
        rate: 0.0,
        ..Default::default()
    });
    let events = run(
        |midi, len| proc.process(midi, len, Some(120.0)),
        &hold(&[62]),
        &[1024],
        70_000,
    );
    let ons: Vec<u8> = events.iter().filter(|e| e.1 == Kind::On).map(|e| e.2).collect();
    assert_eq!(ons, vec![62, 66, 69]);
}

//! Sample-stamped MIDI events.
//!
//! Every event carries the offset (in samples) from the start of the block it
//! belongs to. [`MidiBuffer`] keeps events ordered by offset, with ties kept
//! in insertion order, so a consumer can walk it front to back and split
//! rendering at each offset.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

/// Channel-voice messages the instrument understands.
///
/// Channels are 1-based (1..=16).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// Key pressed. Velocity 0 is treated as a note-off by consumers.
    NoteOn {
        /// Channel.
        channel: u8,
        /// Note number.
        note: u8,
        /// Velocity 1..=127.
        velocity: u8,
    },
    /// Key released.
    NoteOff {
        /// Channel.
        channel: u8,
        /// Note number.
        note: u8,
    },
    /// Controller 123: release every sounding note.
    AllNotesOff {
        /// Channel.
        channel: u8,
    },
    /// Any other controller. Passed through untouched.
    ControlChange {
        /// Channel.
        channel: u8,
        /// Controller number.
        controller: u8,
        /// Value.
        value: u8,
    },
    /// Pitch wheel, -8192..=8191. Passed through untouched.
    PitchBend {
        /// Channel.
        channel: u8,
        /// Bend amount.
        value: i16,
    },
}

impl MidiMessage {
    /// Note number for note-on (velocity > 0) events.
    pub fn note_on(&self) -> Option<(u8, u8)> {
        match *self {
            MidiMessage::NoteOn { note, velocity, .. } if velocity > 0 => Some((note, velocity)),
            _ => None,
        }
    }

    /// Note number for note-off events, including note-on with velocity 0.
    pub fn note_off(&self) -> Option<u8> {
        match *self {
            MidiMessage::NoteOff { note, .. } => Some(note),
            MidiMessage::NoteOn { note, velocity: 0, .. } => Some(note),
            _ => None,
        }
    }

    /// Whether this is a note-on or note-off of any kind.
    pub fn is_note(&self) -> bool {
        matches!(self, MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. })
    }

    /// Build a controller message, mapping CC 123 to [`MidiMessage::AllNotesOff`].
    pub fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        if controller == 123 {
            MidiMessage::AllNotesOff { channel }
        } else {
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            }
        }
    }
}

/// A message at a sample offset within the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    /// Samples from the start of the block.
    pub offset: u32,
    /// Payload.
    pub message: MidiMessage,
}

impl MidiEvent {
    /// Pair a message with its offset.
    pub fn new(offset: u32, message: MidiMessage) -> Self {
        Self { offset, message }
    }
}

/// Offset-ordered event list for one block.
///
/// Pre-size it with [`MidiBuffer::with_capacity`]; pushes within that
/// capacity never allocate.
///
/// ```rust
/// use howl_core::{MidiBuffer, MidiMessage};
///
/// let mut buf = MidiBuffer::with_capacity(8);
/// buf.push(10, MidiMessage::NoteOff { channel: 1, note: 60 });
/// buf.push(0, MidiMessage::NoteOn { channel: 1, note: 60, velocity: 100 });
/// buf.push(10, MidiMessage::NoteOn { channel: 1, note: 62, velocity: 100 });
///
/// let offsets: Vec<u32> = buf.iter().map(|e| e.offset).collect();
/// assert_eq!(offsets, [0, 10, 10]);
/// assert_eq!(buf.iter().nth(2).and_then(|e| e.message.note_on()), Some((62, 100)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MidiBuffer {
    events: Vec<MidiEvent>,
}

impl MidiBuffer {
    /// Empty buffer with no reserved room.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    /// Insert after every event at the same or an earlier offset.
    #[inline]
    pub fn push(&mut self, offset: u32, message: MidiMessage) {
        self.push_event(MidiEvent::new(offset, message));
    }

    /// Insert a prebuilt event.
    pub fn push_event(&mut self, event: MidiEvent) {
        let at = self.events.partition_point(|e| e.offset <= event.offset);
        self.events.insert(at, event);
    }

    /// Remove every event, keeping the allocation.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events in offset order.
    pub fn iter(&self) -> core::slice::Iter<'_, MidiEvent> {
        self.events.iter()
    }

    /// Events as a slice.
    pub fn as_slice(&self) -> &[MidiEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when no events are queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Reserved room.
    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }
}

impl<'a> IntoIterator for &'a MidiBuffer {
    type Item = &'a MidiEvent;
    type IntoIter = core::slice::Iter<'a, MidiEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(note: u8) -> MidiMessage {
        MidiMessage::NoteOn {
            channel: 1,
            note,
            velocity: 100,
        }
    }

    #[test]
    fn keeps_insertion_order_on_ties() {
        let mut buf = MidiBuffer::with_capacity(16);
        buf.push(5, on(1));
        buf.push(5, on(2));
        buf.push(0, on(3));
        buf.push(5, on(4));
        let notes: Vec<u8> = buf.iter().filter_map(|e| e.message.note_on()).map(|n| n.0).collect();
        assert_eq!(notes, [3, 1, 2, 4]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = MidiBuffer::with_capacity(32);
        for i in 0..10 {
            buf.push(i, on(60));
        }
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 32);
    }

    #[test]
    fn velocity_zero_is_note_off() {
        let msg = MidiMessage::NoteOn {
            channel: 1,
            note: 64,
            velocity: 0,
        };
        assert_eq!(msg.note_on(), None);
        assert_eq!(msg.note_off(), Some(64));
        assert!(msg.is_note());
    }

    #[test]
    fn cc_123_is_all_notes_off() {
        assert_eq!(
            MidiMessage::control_change(3, 123, 0),
            MidiMessage::AllNotesOff { channel: 3 }
        );
        assert!(!MidiMessage::control_change(1, 1, 64).is_note());
    }
}

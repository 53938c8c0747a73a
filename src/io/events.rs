//! Timed note events and paired notes
//!
//! The analysis pipeline consumes a single, time-ordered stream of events with
//! delta timestamps in ticks, as produced by an event normalizer (see
//! [`read_midi`](super::midi::read_midi) when the `midi` feature is enabled).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;

/// Kind of a timed event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Note starts sounding (a zero velocity means note-off)
    NoteOn,
    /// Note stops sounding
    NoteOff,
    /// Controller, program change, meta message, ...
    ///
    /// Advances time but never changes the set of sounding pitches.
    Other,
}

/// A single event of the normalized stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Event kind
    pub kind: EventKind,
    /// MIDI pitch (0-127), ignored for [`EventKind::Other`]
    pub pitch: u8,
    /// MIDI velocity (0-127)
    pub velocity: u8,
    /// Ticks since the previous event
    pub delta_time: u64,
}

impl TimedEvent {
    /// Note-on event
    pub fn note_on(pitch: u8, velocity: u8, delta_time: u64) -> Self {
        Self {
            kind: EventKind::NoteOn,
            pitch,
            velocity,
            delta_time,
        }
    }

    /// Note-off event
    pub fn note_off(pitch: u8, delta_time: u64) -> Self {
        Self {
            kind: EventKind::NoteOff,
            pitch,
            velocity: 0,
            delta_time,
        }
    }

    /// Any event that only advances time
    pub fn other(delta_time: u64) -> Self {
        Self {
            kind: EventKind::Other,
            pitch: 0,
            velocity: 0,
            delta_time,
        }
    }

    /// True for a note-on with non-zero velocity
    pub fn starts_note(&self) -> bool {
        self.kind == EventKind::NoteOn && self.velocity > 0
    }

    /// True for a note-off or a note-on with zero velocity
    pub fn ends_note(&self) -> bool {
        match self.kind {
            EventKind::NoteOff => true,
            EventKind::NoteOn => self.velocity == 0,
            EventKind::Other => false,
        }
    }
}

/// A note with absolute onset and duration, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI pitch
    pub pitch: u8,
    /// Onset velocity
    pub velocity: u8,
    /// Absolute onset time
    pub onset: u64,
    /// Sounding duration
    pub duration: u64,
}

impl Note {
    /// Pitch class (0-11)
    pub fn pitch_class(&self) -> usize {
        (self.pitch % 12) as usize
    }
}

/// Pair note-on events with their note-offs
///
/// Delta times are accumulated into absolute time. A note ends at the next
/// note-off (or zero-velocity note-on) of the same pitch; striking a pitch
/// that is already sounding ends the previous note first. Notes that are
/// still sounding when the stream ends are dropped.
///
/// Returned notes are ordered by onset.
pub fn pair_notes<I>(events: I) -> Vec<Note>
where
    I: IntoIterator,
    I::Item: Borrow<TimedEvent>,
{
    let mut notes = Vec::new();
    let mut sounding: HashMap<u8, (u64, u8)> = HashMap::new();
    let mut now = 0u64;

    for event in events {
        let event: &TimedEvent = event.borrow();
        now += event.delta_time;

        if event.starts_note() {
            if let Some((onset, velocity)) = sounding.insert(event.pitch, (now, event.velocity)) {
                notes.push(Note {
                    pitch: event.pitch,
                    velocity,
                    onset,
                    duration: now - onset,
                });
            }
        } else if event.ends_note() {
            match sounding.remove(&event.pitch) {
                Some((onset, velocity)) => notes.push(Note {
                    pitch: event.pitch,
                    velocity,
                    onset,
                    duration: now - onset,
                }),
                None => log::debug!("Note-off for silent pitch {} at tick {}", event.pitch, now),
            }
        }
    }

    if !sounding.is_empty() {
        log::warn!(
            "{} notes still sounding at end of stream (tick {}), dropped",
            sounding.len(),
            now
        );
    }

    notes.sort_by_key(|n| (n.onset, n.pitch));
    notes
}

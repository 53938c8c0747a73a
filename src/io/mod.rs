//! Event I/O modules
//!
//! The normalized event stream consumed by the analysis pipeline, note pairing,
//! and (with the `midi` feature) a Standard MIDI File reader using midly.

pub mod events;
#[cfg(feature = "midi")]
pub mod midi;

pub use events::{pair_notes, EventKind, Note, TimedEvent};
#[cfg(feature = "midi")]
pub use midi::{read_midi, MidiStream};

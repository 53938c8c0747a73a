//! Standard MIDI File reading using midly
//!
//! Flattens every track of a file into one time-ordered delta stream. Tracks
//! are merged on absolute tick time; events at the same tick keep file order
//! (track by track), so a note-off written before a note-on on the same tick
//! still closes the earlier note first.

use super::events::{EventKind, TimedEvent};
use crate::error::AnalysisError;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

/// Default tempo when a file carries no tempo meta event
const DEFAULT_TEMPO_BPM: f64 = 120.0;

/// A decoded event stream plus its timing constants
#[derive(Debug, Clone)]
pub struct MidiStream {
    /// Merged, time-ordered events with delta times in ticks
    pub events: Vec<TimedEvent>,
    /// Resolution in ticks per quarter note
    pub ticks_per_beat: u32,
    /// Tempo from the first tempo meta event (default 120 BPM)
    pub tempo_bpm: f64,
}

/// Decode a Standard MIDI File
///
/// # Errors
///
/// Returns `AnalysisError::Midi` if the bytes are not a valid SMF and
/// `AnalysisError::InvalidInput` for timecode (SMPTE) timing, which has no
/// ticks-per-beat resolution.
pub fn read_midi(bytes: &[u8]) -> Result<MidiStream, AnalysisError> {
    let smf = Smf::parse(bytes).map_err(|e| AnalysisError::Midi(e.to_string()))?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(tpb) => u32::from(tpb.as_int()),
        Timing::Timecode(..) => {
            return Err(AnalysisError::InvalidInput(
                "SMPTE timecode timing is not supported".to_string(),
            ))
        }
    };

    let mut tempo_bpm = None;
    let mut absolute: Vec<(u64, TimedEvent)> = Vec::new();

    for track in &smf.tracks {
        let mut now = 0u64;
        for event in track {
            now += u64::from(event.delta.as_int());
            let kind = match event.kind {
                TrackEventKind::Midi { message, .. } => match message {
                    MidiMessage::NoteOn { key, vel } => {
                        Some((EventKind::NoteOn, key.as_int(), vel.as_int()))
                    }
                    MidiMessage::NoteOff { key, vel } => {
                        Some((EventKind::NoteOff, key.as_int(), vel.as_int()))
                    }
                    _ => None,
                },
                TrackEventKind::Meta(MetaMessage::Tempo(t)) => {
                    if tempo_bpm.is_none() && t.as_int() > 0 {
                        tempo_bpm = Some(60_000_000.0 / f64::from(t.as_int()));
                    }
                    None
                }
                _ => None,
            };

            let (kind, pitch, velocity) = kind.unwrap_or((EventKind::Other, 0, 0));
            absolute.push((
                now,
                TimedEvent {
                    kind,
                    pitch,
                    velocity,
                    delta_time: 0,
                },
            ));
        }
    }

    // Stable: same-tick events keep track order
    absolute.sort_by_key(|(t, _)| *t);

    let mut last = 0u64;
    let events: Vec<TimedEvent> = absolute
        .into_iter()
        .map(|(t, mut e)| {
            e.delta_time = t - last;
            last = t;
            e
        })
        .collect();

    log::debug!(
        "Decoded {} events from {} tracks ({} ticks per beat)",
        events.len(),
        smf.tracks.len(),
        ticks_per_beat
    );

    Ok(MidiStream {
        events,
        ticks_per_beat,
        tempo_bpm: tempo_bpm.unwrap_or(DEFAULT_TEMPO_BPM),
    })
}

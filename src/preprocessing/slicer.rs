//! Salami slicing
//!
//! Partitions a timed event stream into maximal intervals over which the set of
//! sounding pitches is constant.
//!
//! # Algorithm
//!
//! 1. Accumulate delta times into an absolute clock
//! 2. When the clock has moved past the last boundary and pitches are sounding,
//!    close a window covering the elapsed time with the set as it was *before*
//!    the current event
//! 3. Apply the event (note-on adds, note-off or zero-velocity note-on removes)
//!
//! Events at the same tick as the last boundary only update the set, so chords
//! struck together land in one slice. Rests produce no slice. A window whose set
//! equals the previous slice is folded into that slice, which is why the slicer
//! holds one slice back before yielding it.

use super::time::{convert, TimeUnit};
use crate::error::AnalysisError;
use crate::io::events::TimedEvent;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;

/// Velocity used for note-ons synthesized by [`slices_to_events`]
const SYNTHETIC_VELOCITY: u8 = 100;

/// A maximal interval of constant sounding pitches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Sounding MIDI pitches
    pub pitches: BTreeSet<u8>,
    /// Duration, in ticks unless converted
    pub duration: f64,
}

impl Slice {
    /// Create a slice
    pub fn new(pitches: impl IntoIterator<Item = u8>, duration: f64) -> Self {
        Self {
            pitches: pitches.into_iter().collect(),
            duration,
        }
    }

    /// Pitches as plain integers, lowest first
    pub fn pitch_list(&self) -> Vec<i32> {
        self.pitches.iter().map(|&p| i32::from(p)).collect()
    }

    /// Unique pitch classes
    pub fn pitch_classes(&self) -> BTreeSet<u8> {
        self.pitches.iter().map(|p| p % 12).collect()
    }
}

/// Lazy slicer over a timed event stream
///
/// Yields slices with durations in ticks. The iterator is single-pass; slicing
/// the same input again produces the same slices.
///
/// # Example
///
/// ```
/// use pitchscape::io::TimedEvent;
/// use pitchscape::preprocessing::slicer::Slicer;
///
/// let events = vec![
///     TimedEvent::note_on(60, 90, 0),
///     TimedEvent::note_on(64, 90, 0),
///     TimedEvent::note_off(64, 480),
///     TimedEvent::note_off(60, 480),
/// ];
/// let slices: Vec<_> = Slicer::new(&events).collect();
/// assert_eq!(slices.len(), 2);
/// assert_eq!(slices[0].pitch_list(), vec![60, 64]);
/// assert_eq!(slices[1].duration, 480.0);
/// ```
#[derive(Debug)]
pub struct Slicer<I> {
    events: I,
    active: BTreeSet<u8>,
    now: u64,
    boundary: u64,
    pending: Option<Slice>,
}

impl<I> Slicer<I>
where
    I: Iterator,
    I::Item: Borrow<TimedEvent>,
{
    /// Slice an event stream
    pub fn new<E>(events: E) -> Self
    where
        E: IntoIterator<IntoIter = I>,
    {
        Self {
            events: events.into_iter(),
            active: BTreeSet::new(),
            now: 0,
            boundary: 0,
            pending: None,
        }
    }

    /// Close the window ending at the current tick, if it carries content
    ///
    /// Returns the slice that became final, if any.
    fn close_window(&mut self) -> Option<Slice> {
        if self.now == self.boundary || self.active.is_empty() {
            return None;
        }
        let duration = (self.now - self.boundary) as f64;

        match self.pending.as_mut() {
            Some(previous) if previous.pitches == self.active => {
                previous.duration += duration;
                None
            }
            _ => self.pending.replace(Slice {
                pitches: self.active.clone(),
                duration,
            }),
        }
    }

    fn apply(&mut self, event: &TimedEvent) {
        if event.starts_note() {
            self.active.insert(event.pitch);
        } else if event.ends_note() && !self.active.remove(&event.pitch) {
            log::debug!(
                "Ignoring note-off for silent pitch {} at tick {}",
                event.pitch,
                self.now
            );
        }
    }
}

impl<I> Iterator for Slicer<I>
where
    I: Iterator,
    I::Item: Borrow<TimedEvent>,
{
    type Item = Slice;

    fn next(&mut self) -> Option<Slice> {
        while let Some(item) = self.events.next() {
            let event = *Borrow::<TimedEvent>::borrow(&item);
            self.now += event.delta_time;

            let ready = self.close_window();
            self.boundary = self.now;
            self.apply(&event);

            if ready.is_some() {
                return ready;
            }
        }
        self.pending.take()
    }
}

/// Slice an event stream and report durations in `unit`
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero resolution or a
/// non-positive tempo (when converting to seconds).
pub fn slice_events(
    events: &[TimedEvent],
    ticks_per_beat: u32,
    unit: TimeUnit,
    tempo_bpm: f64,
) -> Result<Vec<Slice>, AnalysisError> {
    // Validate the conversion once, even for streams that produce no slices
    convert(0.0, unit, ticks_per_beat, tempo_bpm)?;

    let slices = Slicer::new(events)
        .map(|slice| {
            Ok(Slice {
                duration: convert(slice.duration, unit, ticks_per_beat, tempo_bpm)?,
                pitches: slice.pitches,
            })
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    log::debug!(
        "Sliced {} events into {} slices ({:?})",
        events.len(),
        slices.len(),
        unit
    );
    Ok(slices)
}

/// Synthesize an event stream that plays `slices` back to back
///
/// Durations are read as ticks (rounded). Pitches held across a boundary keep
/// sounding; only changed pitches get note-offs and note-ons.
pub fn slices_to_events(slices: &[Slice]) -> Vec<TimedEvent> {
    let mut events = Vec::new();
    let mut previous: BTreeSet<u8> = BTreeSet::new();
    let mut delta = 0u64;

    for slice in slices {
        for &pitch in previous.difference(&slice.pitches) {
            events.push(TimedEvent::note_off(pitch, std::mem::take(&mut delta)));
        }
        for &pitch in slice.pitches.difference(&previous) {
            events.push(TimedEvent::note_on(
                pitch,
                SYNTHETIC_VELOCITY,
                std::mem::take(&mut delta),
            ));
        }
        delta += slice.duration.max(0.0).round() as u64;
        previous = slice.pitches.clone();
    }

    for &pitch in &previous {
        events.push(TimedEvent::note_off(pitch, std::mem::take(&mut delta)));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice_all(events: &[TimedEvent]) -> Vec<Slice> {
        Slicer::new(events).collect()
    }

    #[test]
    fn test_simultaneous_onsets_share_a_slice() {
        let events = vec![
            TimedEvent::note_on(60, 80, 0),
            TimedEvent::note_on(64, 80, 0),
            TimedEvent::note_on(67, 80, 0),
            TimedEvent::note_off(60, 480),
            TimedEvent::note_off(64, 0),
            TimedEvent::note_off(67, 0),
        ];
        let slices = slice_all(&events);
        assert_eq!(slices, vec![Slice::new([60, 64, 67], 480.0)]);
    }

    #[test]
    fn test_overlapping_notes() {
        // C held for 960, E enters at 240 and leaves at 720
        let events = vec![
            TimedEvent::note_on(60, 80, 0),
            TimedEvent::note_on(64, 80, 240),
            TimedEvent::note_off(64, 480),
            TimedEvent::note_off(60, 240),
        ];
        let slices = slice_all(&events);
        assert_eq!(
            slices,
            vec![
                Slice::new([60], 240.0),
                Slice::new([60, 64], 480.0),
                Slice::new([60], 240.0),
            ]
        );
    }

    #[test]
    fn test_rests_are_not_emitted() {
        let events = vec![
            TimedEvent::note_on(60, 80, 0),
            TimedEvent::note_off(60, 100),
            TimedEvent::note_on(62, 80, 200),
            TimedEvent::note_off(62, 100),
        ];
        let slices = slice_all(&events);
        assert_eq!(slices, vec![Slice::new([60], 100.0), Slice::new([62], 100.0)]);
    }

    #[test]
    fn test_other_events_do_not_split_slices() {
        let events = vec![
            TimedEvent::note_on(60, 80, 0),
            TimedEvent::other(100),
            TimedEvent::other(50),
            TimedEvent::note_off(60, 50),
        ];
        let slices = slice_all(&events);
        assert_eq!(slices, vec![Slice::new([60], 200.0)]);
    }

    #[test]
    fn test_unknown_note_off_is_ignored() {
        let events = vec![
            TimedEvent::note_off(72, 0),
            TimedEvent::note_on(60, 80, 10),
            TimedEvent::note_off(61, 20),
            TimedEvent::note_on(60, 0, 20),
        ];
        let slices = slice_all(&events);
        assert_eq!(slices, vec![Slice::new([60], 40.0)]);
    }

    #[test]
    fn test_no_trailing_slice_without_note_off() {
        // Only events actually present define boundaries
        let events = vec![
            TimedEvent::note_on(60, 80, 0),
            TimedEvent::note_on(64, 80, 100),
        ];
        let slices = slice_all(&events);
        assert_eq!(slices, vec![Slice::new([60], 100.0)]);
    }

    #[test]
    fn test_empty_stream() {
        assert!(slice_all(&[]).is_empty());
    }

    #[test]
    fn test_slice_events_in_beats() {
        let events = vec![
            TimedEvent::note_on(60, 80, 0),
            TimedEvent::note_off(60, 960),
        ];
        let slices = slice_events(&events, 480, TimeUnit::Beats, 120.0).unwrap();
        assert_eq!(slices[0].duration, 2.0);

        let slices = slice_events(&events, 480, TimeUnit::Seconds, 60.0).unwrap();
        assert!((slices[0].duration - 2.0).abs() < 1e-12);

        assert!(slice_events(&events, 0, TimeUnit::Beats, 120.0).is_err());
    }

    #[test]
    fn test_reslicing_is_idempotent() {
        let events = vec![
            TimedEvent::note_on(48, 80, 0),
            TimedEvent::note_on(64, 80, 0),
            TimedEvent::note_on(67, 80, 120),
            TimedEvent::other(60),
            TimedEvent::note_off(64, 60),
            TimedEvent::note_on(65, 80, 0),
            TimedEvent::note_off(67, 240),
            TimedEvent::note_off(65, 0),
            TimedEvent::note_on(72, 80, 0),
            TimedEvent::note_off(48, 120),
            TimedEvent::note_off(72, 100),
            TimedEvent::note_on(48, 80, 300),
            TimedEvent::note_off(48, 100),
        ];
        let first = slice_all(&events);
        let second = slice_all(&slices_to_events(&first));
        assert_eq!(first, second);
    }
}

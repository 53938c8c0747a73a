//! # Pitchscape
//!
//! A symbolic music analysis engine for music-information-retrieval research,
//! extracting harmonic content and tonal key from timed note events.
//!
//! ## Features
//!
//! - **Salami Slicing**: Partition an event stream into intervals of constant sounding pitches
//! - **Pitch-Class Distributions**: Duration, velocity or count weighted 12-bin histograms
//! - **Chord Identification**: Forte interval vectors with bass-interval disambiguation
//! - **Key Finding**: Krumhansl-Schmuckler correlation against six tone profiles and four metrics
//! - **MIDI Input**: Optional Standard MIDI File reader (`midi` feature)
//!
//! ## Quick Start
//!
//! ```
//! use pitchscape::{analyze_events, AnalysisConfig, Key, TimedEvent};
//!
//! // I - IV - V - I in C major, one beat per chord
//! let mut events = Vec::new();
//! for chord in [[60u8, 64, 67], [65, 69, 72], [67, 71, 74], [60, 64, 67]] {
//!     events.extend(chord.iter().map(|&p| TimedEvent::note_on(p, 90, 0)));
//!     events.push(TimedEvent::note_off(chord[0], 480));
//!     events.extend(chord[1..].iter().map(|&p| TimedEvent::note_off(p, 0)));
//! }
//!
//! let result = analyze_events(&events, 480, &AnalysisConfig::default())?;
//!
//! assert_eq!(result.key, Key::Major(0));
//! assert_eq!(result.chords[1].chord.symbol.as_deref(), Some("Fmaj"));
//! println!("Key: {} (clarity: {:.2})", result.key.name(), result.key_clarity);
//! # Ok::<(), pitchscape::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! Events → Slicer → { Pitch-Class Distribution, Per-Slice Chords } → Key Scores → Output
//! ```
//!
//! Every stage is a pure function of its input; the chord tables and tone
//! profiles are read-only and shared, so independent inputs can be analyzed
//! in parallel without coordination.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::result::{AnalysisFlag, AnalysisResult, Key, Mode, SliceChord};
pub use analysis::metadata::AnalysisMetadata;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::chord::{classify, ChordResult, KeyContext};
pub use features::key::{mode_polarity, score_keys, KeyScores};
pub use io::{pair_notes, EventKind, Note, TimedEvent};
pub use preprocessing::{Slice, Slicer, TimeUnit};

use features::chord::ChordIdentifier;
use features::distribution::{pcd_from_notes, pcd_from_slices, Weighting};
use features::key::{key_clarity, polarity, KeyFinder, ModeMethod};
use preprocessing::time::convert;

/// Share of slice time that may go without a chord symbol before flagging
const UNCLASSIFIED_TIME_LIMIT: f64 = 0.5;

/// Main analysis function
///
/// Slices the event stream, builds the pitch-class distribution, labels every
/// slice with a chord and scores all 24 keys.
///
/// # Arguments
///
/// * `events` - Time-ordered note events with delta times in ticks
/// * `ticks_per_beat` - Time resolution of the stream
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnalysisResult` containing slices, chords, distribution, key scores and
/// the derived key, clarity and mode polarity
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - `ticks_per_beat` is zero, or the tempo is unusable for the Seconds unit
/// - The key context or profile name is not recognized
/// - No note ever sounds (`EmptyInput`)
/// - The distribution cannot be scored under the metric (`NumericalError`)
pub fn analyze_events(
    events: &[TimedEvent],
    ticks_per_beat: u32,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting symbolic analysis: {} events at {} ticks per beat",
        events.len(),
        ticks_per_beat
    );

    // Validate configuration before doing any work
    convert(0.0, config.time_unit, ticks_per_beat, config.tempo_bpm)?;
    let configured_context: KeyContext = config.key_context.parse()?;

    // 1. Slicing (durations in ticks until the end)
    let tick_slices: Vec<Slice> = Slicer::new(events).collect();
    if tick_slices.is_empty() {
        return Err(AnalysisError::EmptyInput(
            "no pitches sound in the event stream".to_string(),
        ));
    }
    let notes = pair_notes(events);
    let total_ticks: u64 = events.iter().map(|e| e.delta_time).sum();
    log::debug!(
        "Sliced {} ticks into {} slices, paired {} notes",
        total_ticks,
        tick_slices.len(),
        notes.len()
    );

    // 2. Pitch-class distribution
    let pcd = match config.weighting {
        Weighting::Velocity => pcd_from_notes(&notes, Weighting::Velocity)?,
        weighting => pcd_from_slices(&tick_slices, weighting)?,
    };

    // 3. Key finding
    let finder = KeyFinder::new();
    let key_scores = finder.score_keys(pcd.as_slice(), &config.profile, config.metric)?;
    let (key, key_score) = key_scores.best_key().ok_or_else(|| {
        AnalysisError::NumericalError("no key could be scored".to_string())
    })?;
    let clarity = key_clarity(&key_scores);
    let mode_polarity = polarity(&key_scores, config.mode_method);
    log::debug!(
        "Best key {} (score {:.4}, clarity {:.4}, polarity {:.4})",
        key.name(),
        key_score,
        clarity,
        mode_polarity
    );

    // 4. Per-slice chords
    let spelling = if config.use_detected_key_for_spelling {
        KeyContext::from_key(key)
    } else {
        configured_context
    };
    let identifier = ChordIdentifier::new();

    let mut slices = Vec::with_capacity(tick_slices.len());
    let mut chords = Vec::with_capacity(tick_slices.len());
    let mut offset = 0.0;
    let mut unclassified = 0.0;
    let mut total = 0.0;
    for slice in tick_slices {
        let duration = convert(slice.duration, config.time_unit, ticks_per_beat, config.tempo_bpm)?;
        let chord = identifier.classify(&slice.pitch_list(), &spelling);
        if !chord.is_classified() {
            unclassified += duration;
        }
        total += duration;

        chords.push(SliceChord {
            offset,
            duration,
            chord,
        });
        offset += duration;
        slices.push(Slice {
            pitches: slice.pitches,
            duration,
        });
    }

    // 5. Flags
    let mut flags = Vec::new();
    let mut warnings = Vec::new();
    if clarity < config.weak_tonality_threshold {
        flags.push(AnalysisFlag::WeakTonality);
        warnings.push(format!(
            "Key clarity {:.3} is below {:.3}",
            clarity, config.weak_tonality_threshold
        ));
    }
    let best_mode_margin = polarity(&key_scores, ModeMethod::Best);
    if best_mode_margin.abs() < config.ambiguous_mode_threshold {
        flags.push(AnalysisFlag::AmbiguousMode);
        warnings.push(format!(
            "Best major and minor keys differ by only {:.3}",
            best_mode_margin.abs()
        ));
    }
    if total > 0.0 && unclassified / total > UNCLASSIFIED_TIME_LIMIT {
        flags.push(AnalysisFlag::MostlyUnclassifiedChords);
        warnings.push(format!(
            "{:.0}% of the slice time has no chord symbol",
            100.0 * unclassified / total
        ));
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Analysis complete: {} slices, key {} in {:.2} ms",
        slices.len(),
        key.name(),
        processing_time_ms
    );

    Ok(AnalysisResult {
        metadata: AnalysisMetadata {
            slice_count: slices.len(),
            note_count: notes.len(),
            total_ticks,
            ticks_per_beat,
            profile: config.profile.clone(),
            metric: config.metric.to_string(),
            spelling_context: spelling.to_string(),
            processing_time_ms,
            flags,
            warnings,
            ..AnalysisMetadata::default()
        },
        slices,
        chords,
        pcd,
        key_scores,
        key,
        key_clarity: clarity,
        mode_polarity,
    })
}

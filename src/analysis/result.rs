//! Analysis result types

use super::metadata::AnalysisMetadata;
use crate::features::chord::ChordResult;
use crate::features::distribution::PitchClassDistribution;
use crate::features::key::KeyScores;
use crate::preprocessing::slicer::Slice;
use serde::{Deserialize, Serialize};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Major or minor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    /// Major mode
    Major,
    /// Minor mode
    Minor,
}

impl Mode {
    /// Suffix used in key context strings ("maj" / "min")
    pub fn suffix(&self) -> &'static str {
        match self {
            Mode::Major => "maj",
            Mode::Minor => "min",
        }
    }
}

/// Musical key
///
/// Ordering is all major keys (C to B) before all minor keys, which is also
/// the order in which key scores are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u8),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u8),
}

impl Key {
    /// Key with the given tonic pitch class and mode
    pub fn new(tonic: u8, mode: Mode) -> Self {
        match mode {
            Mode::Major => Key::Major(tonic % 12),
            Mode::Minor => Key::Minor(tonic % 12),
        }
    }

    /// All 24 keys, majors first
    pub fn all() -> impl Iterator<Item = Key> {
        (0..12)
            .map(Key::Major)
            .chain((0..12).map(Key::Minor))
    }

    /// Tonic pitch class
    pub fn tonic(&self) -> u8 {
        match self {
            Key::Major(i) | Key::Minor(i) => *i % 12,
        }
    }

    /// Mode of the key
    pub fn mode(&self) -> Mode {
        match self {
            Key::Major(_) => Mode::Major,
            Key::Minor(_) => Mode::Minor,
        }
    }

    /// Get key name in musical notation (e.g., "C", "Am", "F#", "D#m")
    ///
    /// # Example
    ///
    /// ```
    /// use pitchscape::analysis::result::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C");
    /// assert_eq!(Key::Minor(9).name(), "Am");
    /// ```
    pub fn name(&self) -> String {
        match self {
            Key::Major(_) => NOTE_NAMES[self.tonic() as usize].to_string(),
            Key::Minor(_) => format!("{}m", NOTE_NAMES[self.tonic() as usize]),
        }
    }
}

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Best and runner-up key scores are nearly equal
    WeakTonality,
    /// Best major and best minor scores are nearly equal
    AmbiguousMode,
    /// More than half of the slice time carries no chord symbol
    MostlyUnclassifiedChords,
}

/// Chord label of one slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceChord {
    /// Slice onset, in the configured time unit (rests excluded)
    pub offset: f64,
    /// Slice duration, in the configured time unit
    pub duration: f64,
    /// Chord classification of the slice
    pub chord: ChordResult,
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Slices with durations in the configured time unit
    pub slices: Vec<Slice>,

    /// Chord label per slice
    pub chords: Vec<SliceChord>,

    /// Pitch-class duration distribution
    pub pcd: PitchClassDistribution,

    /// Similarity of the PCD to all 24 key rotations
    pub key_scores: KeyScores,

    /// Best-scoring key
    pub key: Key,

    /// Key clarity (0.0-1.0), margin between the best and runner-up key
    pub key_clarity: f64,

    /// Major/minor polarity (positive leans major for the "best" method)
    pub mode_polarity: f64,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

//! Chord identification
//!
//! Classifies a pitch collection by its interval vector, resolves shared
//! signatures through the bass-interval pattern, and spells a chord symbol.
//!
//! # Root heuristic
//!
//! Root and bass are both taken to be the lowest sounding pitch, so inverted
//! chords are named from their bass. This is a known approximation; see
//! [`pitch_salience`](super::salience::pitch_salience) for a salience-based
//! root estimate.

use super::interval::{bass_intervals, interval_vector, unique_pitch_classes};
use super::spelling::KeyContext;
use super::tables::{ChordVocabulary, QualityLookup, StandardVocabulary};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Fewest unique pitch classes that can carry a chord symbol
const MIN_CHORD_CARDINALITY: usize = 3;

/// Chord classification of a pitch collection
///
/// Every field is `None` when the collection has fewer than three pitch
/// classes or matches no known quality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChordResult {
    /// Chord quality label (e.g. "maj", "min7", "7b9")
    pub quality: Option<String>,
    /// Root pitch
    pub root: Option<i32>,
    /// Root pitch class
    pub root_pitch_class: Option<u8>,
    /// Root note name in the key context
    pub root_note: Option<String>,
    /// Bass pitch
    pub bass: Option<i32>,
    /// Bass pitch class
    pub bass_pitch_class: Option<u8>,
    /// Bass note name in the key context
    pub bass_note: Option<String>,
    /// Chord symbol, e.g. "Cmaj" or "Cmaj/E"
    pub symbol: Option<String>,
}

impl ChordResult {
    /// Result with no classification
    pub fn unclassified() -> Self {
        Self::default()
    }

    /// True when a quality was found
    pub fn is_classified(&self) -> bool {
        self.quality.is_some()
    }
}

/// Chord identifier over a chord vocabulary
#[derive(Debug, Clone, Default)]
pub struct ChordIdentifier<V = StandardVocabulary> {
    vocabulary: V,
}

impl ChordIdentifier<StandardVocabulary> {
    /// Identifier using the built-in tables
    pub fn new() -> Self {
        Self {
            vocabulary: StandardVocabulary,
        }
    }
}

impl<V: ChordVocabulary> ChordIdentifier<V> {
    /// Identifier using custom tables
    pub fn with_vocabulary(vocabulary: V) -> Self {
        Self { vocabulary }
    }

    /// Chord quality of a pitch collection, `None` if unclassifiable
    pub fn quality(&self, pitches: &[i32]) -> Option<String> {
        if unique_pitch_classes(pitches).len() < MIN_CHORD_CARDINALITY {
            return None;
        }

        let vector = interval_vector(pitches);
        match self.vocabulary.quality(&vector)? {
            QualityLookup::Unique(quality) => Some(quality.to_string()),
            QualityLookup::Ambiguous(candidates) => {
                let pattern = bass_intervals(pitches);
                let resolved = self.vocabulary.bass_quality(&pattern);
                if resolved.is_none() {
                    log::warn!(
                        "Unresolved chord ambiguity {:?} for bass pattern {:?}",
                        candidates,
                        pattern
                    );
                }
                resolved.map(str::to_string)
            }
        }
    }

    /// Classify a pitch collection and spell its symbol in `key`
    ///
    /// # Example
    ///
    /// ```
    /// use pitchscape::features::chord::{ChordIdentifier, KeyContext};
    ///
    /// let identifier = ChordIdentifier::new();
    /// let chord = identifier.classify(&[60, 63, 67], &KeyContext::default());
    /// assert_eq!(chord.quality.as_deref(), Some("min"));
    /// assert_eq!(chord.symbol.as_deref(), Some("Cmin"));
    /// ```
    pub fn classify(&self, pitches: &[i32], key: &KeyContext) -> ChordResult {
        let Some(quality) = self.quality(pitches) else {
            return ChordResult::unclassified();
        };
        // A classified chord has at least three pitches
        let Some(&lowest) = pitches.iter().min() else {
            return ChordResult::unclassified();
        };

        let root = lowest;
        let bass = lowest;
        let root_pc = root.rem_euclid(12) as u8;
        let bass_pc = bass.rem_euclid(12) as u8;
        let root_note = key.note_name(root_pc);
        let bass_note = key.note_name(bass_pc);

        let symbol = if root == bass {
            format!("{}{}", root_note, quality)
        } else {
            format!("{}{}/{}", root_note, quality, bass_note)
        };

        ChordResult {
            quality: Some(quality),
            root: Some(root),
            root_pitch_class: Some(root_pc),
            root_note: Some(root_note.to_string()),
            bass: Some(bass),
            bass_pitch_class: Some(bass_pc),
            bass_note: Some(bass_note.to_string()),
            symbol: Some(symbol),
        }
    }
}

/// Classify a pitch collection with the built-in tables
///
/// `key_context` is a string such as "Cmaj" or "Ebmin".
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a malformed key context. An
/// unclassifiable chord is not an error.
pub fn classify(pitches: &[i32], key_context: &str) -> Result<ChordResult, AnalysisError> {
    let key: KeyContext = key_context.parse()?;
    Ok(ChordIdentifier::new().classify(pitches, &key))
}

/// Exact triad quality by transposition-set membership
///
/// Recognizes major, minor, augmented and diminished triads regardless of
/// voicing; anything else is `None`.
pub fn triad_quality(pitches: &[i32]) -> Option<&'static str> {
    const TRIADS: [(&str, [u8; 3]); 4] = [
        ("maj", [0, 4, 7]),
        ("min", [0, 3, 7]),
        ("aug", [0, 4, 8]),
        ("dim", [0, 3, 6]),
    ];

    let classes = unique_pitch_classes(pitches);
    if classes.len() != 3 {
        return None;
    }
    TRIADS.iter().find_map(|(name, shape)| {
        (0..12u8)
            .any(|root| shape.iter().all(|s| classes.contains(&((root + s) % 12))))
            .then_some(*name)
    })
}

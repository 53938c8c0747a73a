//! Chord quality lookup tables
//!
//! Two-stage lookup: an interval vector names one quality or several candidates
//! (the mapping is not injective), and candidates are told apart by the pattern
//! of intervals above the bass.
//!
//! Tables are process-wide, built on first use and never mutated. Callers go
//! through [`ChordVocabulary`] so tests can substitute their own tables.

use super::interval::IntervalVector;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Interval-vector signatures of the supported chord qualities
///
/// `[2, 1, 1, 2, 3, 1]` was historically listed for both `min6/9` and
/// `maj7#11`; the later entry (`maj7#11`) is the one in effect.
const CHORD_QUALITIES: [([u8; 6], &[&str]); 19] = [
    // Triads
    ([0, 0, 1, 1, 1, 0], &["maj", "min"]),
    ([0, 0, 2, 0, 0, 1], &["dim"]),
    ([0, 0, 0, 3, 0, 0], &["aug"]),
    ([0, 1, 0, 0, 2, 0], &["sus2", "sus4"]),
    // Tetrads
    ([1, 0, 1, 2, 2, 0], &["maj7"]),
    ([0, 1, 2, 1, 2, 0], &["min7"]),
    ([1, 0, 1, 3, 1, 0], &["minmaj7"]),
    ([0, 1, 2, 1, 1, 1], &["7", "min7b5"]),
    ([0, 0, 4, 0, 0, 2], &["dim7"]),
    ([0, 2, 0, 2, 0, 2], &["7b5"]),
    ([0, 2, 1, 1, 2, 0], &["majadd9"]),
    ([1, 1, 1, 1, 2, 0], &["minadd9"]),
    // Pentads
    ([0, 3, 2, 1, 4, 0], &["maj6/9"]),
    ([2, 1, 1, 2, 3, 1], &["maj7#11"]),
    ([1, 2, 2, 2, 3, 0], &["maj9", "min9"]),
    ([1, 1, 3, 2, 2, 1], &["7#9"]),
    ([0, 3, 2, 2, 2, 1], &["9"]),
    ([1, 1, 4, 1, 1, 2], &["7b9"]),
    // Sextads
    ([2, 5, 4, 3, 6, 1], &["13"]),
];

/// Bass-interval patterns of qualities with a shared interval vector
///
/// sus2 and sus4 are inversions of each other and resolve to plain `sus`.
const BASS_QUALITIES: [(&[u8], &str); 17] = [
    (&[4, 7], "maj"),
    (&[3, 8], "maj"),
    (&[5, 9], "maj"),
    (&[3, 7], "min"),
    (&[4, 9], "min"),
    (&[5, 8], "min"),
    (&[2, 7], "sus"),
    (&[5, 10], "sus"),
    (&[5, 7], "sus"),
    (&[3, 6, 10], "min7b5"),
    (&[3, 7, 9], "min7b5"),
    (&[4, 6, 9], "min7b5"),
    (&[2, 5, 8], "min7b5"),
    (&[4, 7, 10], "7"),
    (&[3, 6, 8], "7"),
    (&[3, 5, 9], "7"),
    (&[2, 6, 9], "7"),
];

/// Result of the primary (interval vector) lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityLookup<'a> {
    /// Exactly one quality has this signature
    Unique(&'a str),
    /// Several qualities share this signature
    Ambiguous(Vec<&'a str>),
}

/// Lookup interface over the chord tables
pub trait ChordVocabulary {
    /// Qualities whose interval vector matches
    fn quality(&self, vector: &IntervalVector) -> Option<QualityLookup<'_>>;

    /// Quality for a sorted bass-interval pattern
    fn bass_quality(&self, bass_intervals: &[u8]) -> Option<&str>;
}

/// The built-in chord vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardVocabulary;

fn quality_table() -> &'static HashMap<IntervalVector, &'static [&'static str]> {
    static TABLE: OnceLock<HashMap<IntervalVector, &'static [&'static str]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        CHORD_QUALITIES
            .iter()
            .map(|(vector, qualities)| (IntervalVector(*vector), *qualities))
            .collect()
    })
}

fn bass_table() -> &'static HashMap<&'static [u8], &'static str> {
    static TABLE: OnceLock<HashMap<&'static [u8], &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| BASS_QUALITIES.iter().copied().collect())
}

impl ChordVocabulary for StandardVocabulary {
    fn quality(&self, vector: &IntervalVector) -> Option<QualityLookup<'_>> {
        quality_table().get(vector).map(|qualities| match qualities {
            [single] => QualityLookup::Unique(*single),
            many => QualityLookup::Ambiguous(many.to_vec()),
        })
    }

    fn bass_quality(&self, bass_intervals: &[u8]) -> Option<&str> {
        bass_table().get(bass_intervals).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_and_ambiguous_entries() {
        let vocab = StandardVocabulary;
        assert_eq!(
            vocab.quality(&IntervalVector([0, 0, 2, 0, 0, 1])),
            Some(QualityLookup::Unique("dim"))
        );
        assert_eq!(
            vocab.quality(&IntervalVector([0, 0, 1, 1, 1, 0])),
            Some(QualityLookup::Ambiguous(vec!["maj", "min"]))
        );
        assert_eq!(vocab.quality(&IntervalVector([1, 1, 1, 1, 1, 1])), None);
    }

    #[test]
    fn test_bass_patterns() {
        let vocab = StandardVocabulary;
        assert_eq!(vocab.bass_quality(&[3, 7]), Some("min"));
        assert_eq!(vocab.bass_quality(&[2, 6, 9]), Some("7"));
        assert_eq!(vocab.bass_quality(&[7, 3]), None, "patterns are sorted");
    }

    #[test]
    fn test_table_keys_are_unique() {
        assert_eq!(quality_table().len(), CHORD_QUALITIES.len());
        assert_eq!(bass_table().len(), BASS_QUALITIES.len());
    }
}

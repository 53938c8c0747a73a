//! Pitch-class set measures
//!
//! Interval vectors after Forte (1973) and bass-interval patterns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tally of interval classes 1-6 over all unordered pitch-class pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalVector(pub [u8; 6]);

/// Unique pitch classes of a pitch collection
///
/// Negative values are folded into 0-11 as well.
pub fn unique_pitch_classes(pitches: &[i32]) -> BTreeSet<u8> {
    pitches.iter().map(|p| p.rem_euclid(12) as u8).collect()
}

/// Interval vector of a pitch collection
///
/// Intervals larger than a tritone are replaced by their inversion
/// (`12 - interval`), so every pair lands in one of six bins.
///
/// # Example
///
/// ```
/// use pitchscape::features::chord::interval::{interval_vector, IntervalVector};
///
/// assert_eq!(interval_vector(&[60, 64, 67]), IntervalVector([0, 0, 1, 1, 1, 0]));
/// ```
pub fn interval_vector(pitches: &[i32]) -> IntervalVector {
    let classes: Vec<u8> = unique_pitch_classes(pitches).into_iter().collect();
    let mut bins = [0u8; 6];

    for (i, &a) in classes.iter().enumerate() {
        for &b in &classes[i + 1..] {
            let interval = a.abs_diff(b) % 12;
            let class = if interval > 6 { 12 - interval } else { interval };
            // Unique classes never form a unison
            bins[(class - 1) as usize] += 1;
        }
    }
    IntervalVector(bins)
}

/// Semitone distances from the lowest pitch to every other pitch
///
/// Distances are reduced mod 12; unisons and octave doublings of the bass are
/// dropped and the result is sorted ascending without duplicates.
pub fn bass_intervals(pitches: &[i32]) -> Vec<u8> {
    let Some(&bass) = pitches.iter().min() else {
        return Vec::new();
    };
    let distances: BTreeSet<u8> = pitches
        .iter()
        .map(|p| (p - bass).rem_euclid(12) as u8)
        .filter(|&d| d != 0)
        .collect();
    distances.into_iter().collect()
}

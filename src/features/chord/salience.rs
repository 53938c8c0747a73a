//! Root salience after Parncutt (1988, 1993)
//!
//! Each candidate root collects support from the chord tones that sit at
//! characteristic intervals above it (unison, fifth, major third, minor
//! seventh, major second). Supports are normalised by the maximum and then
//! by the root ambiguity `ra`, the square root of their sum.

use super::interval::unique_pitch_classes;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

const WEIGHTS_1988: [f64; 12] = [1.0, 0.0, 0.2, 0.1, 0.33, 0.0, 0.0, 0.5, 0.0, 0.0, 0.25, 0.0];
const WEIGHTS_1993: [f64; 12] = [10.0, 0.0, 1.0, 0.0, 3.0, 0.0, 0.0, 5.0, 0.0, 0.0, 2.0, 0.0];

/// Saliences closer than this are treated as tied
const TIE_EPSILON: f64 = 1e-9;

/// Root-support weight set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SalienceWeights {
    /// Parncutt (1988)
    Parncutt1988,
    /// Parncutt (1993)
    #[default]
    Parncutt1993,
}

impl SalienceWeights {
    /// Weight per interval above the candidate root
    pub fn values(&self) -> &'static [f64; 12] {
        match self {
            SalienceWeights::Parncutt1988 => &WEIGHTS_1988,
            SalienceWeights::Parncutt1993 => &WEIGHTS_1993,
        }
    }
}

/// Root salience profile of a chord
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchSalience {
    /// Normalised salience per candidate root pitch class
    pub salience: [f64; 12],
    /// Root ambiguity (higher means less clear root)
    pub ra: f64,
    /// Most salient pitch class, `None` on a tie
    pub root_pitch_class: Option<u8>,
    /// Lowest input pitch of the root pitch class
    pub root: Option<i32>,
}

/// Compute root salience of a pitch collection
///
/// # Arguments
///
/// * `pitches` - MIDI pitches (any octave, any order)
/// * `weights` - Root-support weight set
///
/// # Returns
///
/// Salience profile; `root` is `None` when two candidates tie
///
/// # Errors
///
/// Returns `AnalysisError::EmptyInput` for an empty collection
///
/// # Example
///
/// ```
/// use pitchscape::features::chord::{pitch_salience, SalienceWeights};
///
/// let ps = pitch_salience(&[64, 67, 72], SalienceWeights::Parncutt1993)?;
/// assert_eq!(ps.root_pitch_class, Some(0));
/// assert_eq!(ps.root, Some(72));
/// # Ok::<(), pitchscape::AnalysisError>(())
/// ```
pub fn pitch_salience(
    pitches: &[i32],
    weights: SalienceWeights,
) -> Result<PitchSalience, AnalysisError> {
    let classes = unique_pitch_classes(pitches);
    if classes.is_empty() {
        return Err(AnalysisError::EmptyInput(
            "pitch salience needs at least one pitch".to_string(),
        ));
    }

    let w = weights.values();
    let mut support = [0.0f64; 12];
    for (root, slot) in support.iter_mut().enumerate() {
        *slot = classes
            .iter()
            .map(|&pc| w[(pc as usize + 12 - root) % 12])
            .sum();
    }

    // The unison weight is positive, so every present class supports itself
    let max = support.iter().copied().fold(f64::MIN, f64::max);
    if max <= 0.0 {
        return Err(AnalysisError::NumericalError(
            "root support vanished for a non-empty chord".to_string(),
        ));
    }

    let relative: Vec<f64> = support.iter().map(|s| s / max).collect();
    let ra = relative.iter().sum::<f64>().sqrt();

    let mut salience = [0.0f64; 12];
    for (slot, r) in salience.iter_mut().zip(&relative) {
        *slot = r / ra;
    }

    let peak = salience.iter().copied().fold(f64::MIN, f64::max);
    let winners: Vec<usize> = (0..12)
        .filter(|&pc| (salience[pc] - peak).abs() < TIE_EPSILON)
        .collect();

    let root_pitch_class = match winners.as_slice() {
        [single] => Some(*single as u8),
        _ => None,
    };
    let root = root_pitch_class.and_then(|pc| {
        pitches
            .iter()
            .copied()
            .filter(|p| p.rem_euclid(12) as u8 == pc)
            .min()
    });

    log::debug!(
        "Pitch salience: ra={:.3}, root={:?} ({} candidates at peak)",
        ra,
        root_pitch_class,
        winners.len()
    );

    Ok(PitchSalience {
        salience,
        ra,
        root_pitch_class,
        root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_triad_root() {
        let ps = pitch_salience(&[60, 64, 67], SalienceWeights::Parncutt1993).unwrap();
        assert_eq!(ps.root_pitch_class, Some(0));
        assert_eq!(ps.root, Some(60));
        let peak = ps.salience[0];
        assert!(ps.salience.iter().all(|&s| s <= peak));
    }

    #[test]
    fn test_inverted_triad_finds_true_root() {
        // First inversion of C major; the lowest-note heuristic would say E
        let ps = pitch_salience(&[64, 67, 72, 76], SalienceWeights::Parncutt1988).unwrap();
        assert_eq!(ps.root_pitch_class, Some(0));
        assert_eq!(ps.root, Some(72));
    }

    #[test]
    fn test_symmetric_chord_has_no_unique_root() {
        // Augmented triad is invariant under major-third transposition
        let ps = pitch_salience(&[60, 64, 68], SalienceWeights::Parncutt1993).unwrap();
        assert_eq!(ps.root_pitch_class, None);
        assert_eq!(ps.root, None);
    }

    #[test]
    fn test_ra_normalisation() {
        let ps = pitch_salience(&[60, 64, 67], SalienceWeights::Parncutt1993).unwrap();
        // salience * ra recovers support / max, whose peak is 1
        let peak = ps.salience.iter().copied().fold(f64::MIN, f64::max);
        assert!((peak * ps.ra - 1.0).abs() < 1e-12);
        assert!(ps.ra >= 1.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            pitch_salience(&[], SalienceWeights::Parncutt1993),
            Err(AnalysisError::EmptyInput(_))
        ));
    }
}

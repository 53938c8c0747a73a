//! Pitch-class duration distribution (PCD) construction
//!
//! Maps every pitch to its pitch class (`pitch mod 12`) and accumulates a weight
//! per class, then divides by the total weight. The symbolic counterpart of an
//! averaged chroma vector.

use super::{PitchClassDistribution, Weighting};
use crate::error::AnalysisError;
use crate::io::events::Note;
use crate::preprocessing::slicer::Slice;

const MAX_VELOCITY: f64 = 127.0;

/// Unnormalized pitch-class histogram of paired notes
pub fn raw_pcd_from_notes(notes: &[Note], weighting: Weighting) -> [f64; 12] {
    let mut histogram = [0.0f64; 12];
    for note in notes {
        let weight = match weighting {
            Weighting::Duration => note.duration as f64,
            Weighting::Velocity => note.duration as f64 * f64::from(note.velocity) / MAX_VELOCITY,
            Weighting::Count => 1.0,
        };
        histogram[note.pitch_class()] += weight;
    }
    histogram
}

/// Unnormalized pitch-class histogram of slices
///
/// Each sounding pitch of a slice contributes the slice duration (or 1 for
/// [`Weighting::Count`]); octave doublings count once per pitch.
///
/// # Errors
///
/// Slices carry no velocities, so [`Weighting::Velocity`] is rejected with
/// `AnalysisError::InvalidInput`.
pub fn raw_pcd_from_slices(slices: &[Slice], weighting: Weighting) -> Result<[f64; 12], AnalysisError> {
    let mut histogram = [0.0f64; 12];
    for slice in slices {
        let weight = match weighting {
            Weighting::Duration => slice.duration,
            Weighting::Count => 1.0,
            Weighting::Velocity => {
                return Err(AnalysisError::InvalidInput(
                    "velocity weighting needs paired notes, slices carry no velocity".to_string(),
                ))
            }
        };
        for &pitch in &slice.pitches {
            histogram[(pitch % 12) as usize] += weight;
        }
    }
    Ok(histogram)
}

/// Normalize a raw histogram so that it sums to 1
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for negative or non-finite buckets and
/// `AnalysisError::EmptyInput` when the total weight is zero.
pub fn normalize(histogram: &[f64; 12]) -> Result<PitchClassDistribution, AnalysisError> {
    if let Some(pc) = histogram.iter().position(|w| !w.is_finite() || *w < 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "pitch class {} has invalid weight {}",
            pc, histogram[pc]
        )));
    }

    let total: f64 = histogram.iter().sum();
    if total <= 0.0 {
        return Err(AnalysisError::EmptyInput(
            "total weight is zero, nothing to distribute".to_string(),
        ));
    }

    let mut weights = [0.0f64; 12];
    for (w, h) in weights.iter_mut().zip(histogram) {
        *w = h / total;
    }
    Ok(PitchClassDistribution::from_normalized(weights))
}

/// Build a PCD from paired notes
///
/// # Example
///
/// ```
/// use pitchscape::features::distribution::{pcd_from_notes, Weighting};
/// use pitchscape::io::Note;
///
/// let notes = vec![
///     Note { pitch: 60, velocity: 90, onset: 0, duration: 300 },
///     Note { pitch: 67, velocity: 90, onset: 0, duration: 100 },
/// ];
/// let pcd = pcd_from_notes(&notes, Weighting::Duration)?;
/// assert_eq!(pcd[0], 0.75);
/// assert_eq!(pcd[7], 0.25);
/// # Ok::<(), pitchscape::AnalysisError>(())
/// ```
pub fn pcd_from_notes(notes: &[Note], weighting: Weighting) -> Result<PitchClassDistribution, AnalysisError> {
    log::debug!("Building PCD from {} notes ({:?})", notes.len(), weighting);
    normalize(&raw_pcd_from_notes(notes, weighting))
}

/// Build a PCD from slices
pub fn pcd_from_slices(slices: &[Slice], weighting: Weighting) -> Result<PitchClassDistribution, AnalysisError> {
    log::debug!("Building PCD from {} slices ({:?})", slices.len(), weighting);
    normalize(&raw_pcd_from_slices(slices, weighting)?)
}

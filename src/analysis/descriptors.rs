//! Summary descriptors of a note stream
//!
//! Scalar features reported next to the harmonic analysis: pitch range,
//! duration-weighted register and slice density.

use crate::error::AnalysisError;
use crate::io::events::Note;
use crate::preprocessing::slicer::Slice;

/// MIDI pitch of the lowest piano key (A0) minus one
const PIANO_KEY_OFFSET: f64 = 20.0;

/// Lowest and highest pitch among `notes`
///
/// # Errors
///
/// Returns `AnalysisError::EmptyInput` when there are no notes
pub fn ambitus(notes: &[Note]) -> Result<(u8, u8), AnalysisError> {
    let lowest = notes.iter().map(|n| n.pitch).min();
    let highest = notes.iter().map(|n| n.pitch).max();
    match (lowest, highest) {
        (Some(lo), Some(hi)) => Ok((lo, hi)),
        _ => Err(AnalysisError::EmptyInput("ambitus of an empty note list".to_string())),
    }
}

/// Duration-weighted mean pitch as a piano key number (A0 = 1, C4 = 40)
///
/// # Errors
///
/// Returns `AnalysisError::EmptyInput` when the notes have no total duration
pub fn pitch_height(notes: &[Note]) -> Result<f64, AnalysisError> {
    let total: f64 = notes.iter().map(|n| n.duration as f64).sum();
    if total <= 0.0 {
        return Err(AnalysisError::EmptyInput(
            "pitch height needs notes with non-zero duration".to_string(),
        ));
    }

    let weighted: f64 = notes
        .iter()
        .map(|n| (f64::from(n.pitch) - PIANO_KEY_OFFSET) * n.duration as f64)
        .sum();
    Ok(weighted / total)
}

/// Slices per beat
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a non-positive or non-finite
/// `total_beats`
pub fn onset_rate(slices: &[Slice], total_beats: f64) -> Result<f64, AnalysisError> {
    if !total_beats.is_finite() || total_beats <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "onset rate needs a positive length in beats, got {}",
            total_beats
        )));
    }
    Ok(slices.len() as f64 / total_beats)
}

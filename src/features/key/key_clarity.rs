//! Key clarity scoring
//!
//! Estimates how "tonal" vs "atonal" a passage is from the margin between the
//! best and runner-up key.

use super::detector::KeyScores;

/// Compute key clarity from key scores
///
/// # Arguments
///
/// * `scores` - Scores of all 24 keys
///
/// # Returns
///
/// Best score minus second-best score, clamped to 0.0-1.0; higher = more
/// tonal. Fewer than two scores give 0.0.
pub fn key_clarity(scores: &KeyScores) -> f64 {
    let ranked = scores.ranked();
    log::debug!("Computing key clarity from {} scores", ranked.len());

    match ranked.as_slice() {
        [(_, best), (_, second), ..] => (best - second).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

//! Tick to beat/second conversion

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Unit in which slice durations are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Raw ticks, as in the input stream
    Ticks,
    /// Quarter-note beats (ticks / ticks per beat)
    Beats,
    /// Seconds at a constant tempo
    Seconds,
}

/// Convert ticks to beats
pub fn ticks_to_beats(ticks: f64, ticks_per_beat: u32) -> Result<f64, AnalysisError> {
    if ticks_per_beat == 0 {
        return Err(AnalysisError::InvalidInput(
            "ticks_per_beat must be positive".to_string(),
        ));
    }
    Ok(ticks / f64::from(ticks_per_beat))
}

/// Convert ticks to seconds at a constant tempo
pub fn ticks_to_seconds(ticks: f64, ticks_per_beat: u32, tempo_bpm: f64) -> Result<f64, AnalysisError> {
    if !(tempo_bpm > 0.0) || !tempo_bpm.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "tempo must be a positive number of BPM, got {}",
            tempo_bpm
        )));
    }
    Ok(ticks_to_beats(ticks, ticks_per_beat)? * 60.0 / tempo_bpm)
}

/// Convert ticks into `unit`
pub fn convert(
    ticks: f64,
    unit: TimeUnit,
    ticks_per_beat: u32,
    tempo_bpm: f64,
) -> Result<f64, AnalysisError> {
    match unit {
        TimeUnit::Ticks => Ok(ticks),
        TimeUnit::Beats => ticks_to_beats(ticks, ticks_per_beat),
        TimeUnit::Seconds => ticks_to_seconds(ticks, ticks_per_beat, tempo_bpm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(ticks_to_beats(960.0, 480).unwrap(), 2.0);
        // 2 beats at 120 BPM = 1 second
        assert!((ticks_to_seconds(960.0, 480, 120.0).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(convert(960.0, TimeUnit::Ticks, 480, 120.0).unwrap(), 960.0);
    }

    #[test]
    fn test_invalid_resolution_and_tempo() {
        assert!(ticks_to_beats(10.0, 0).is_err());
        assert!(ticks_to_seconds(10.0, 480, 0.0).is_err());
        assert!(ticks_to_seconds(10.0, 480, f64::NAN).is_err());
    }
}

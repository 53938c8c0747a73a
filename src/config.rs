//! Configuration parameters for symbolic analysis

use crate::features::distribution::Weighting;
use crate::features::key::{ModeMethod, SimilarityMetric};
use crate::preprocessing::time::TimeUnit;
use serde::{Deserialize, Serialize};

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    // Slicing
    /// Unit of reported slice durations (default: Beats)
    pub time_unit: TimeUnit,

    /// Tempo for the Seconds unit (default: 120.0)
    /// Used when the input carries no tempo of its own
    pub tempo_bpm: f64,

    // Distribution
    /// Weight accumulated per pitch class (default: Duration)
    /// Velocity weighting pairs notes instead of using slices
    pub weighting: Weighting,

    // Key finding
    /// Tone profile name (default: "KrumhanslKessler")
    pub profile: String,

    /// Similarity metric (default: Pearson)
    pub metric: SimilarityMetric,

    /// Major/minor polarity method (default: Best)
    pub mode_method: ModeMethod,

    // Chord spelling
    /// Key context for chord note names (default: "Cmaj")
    pub key_context: String,

    /// Spell chord names in the detected key instead of `key_context`
    /// (default: false)
    pub use_detected_key_for_spelling: bool,

    // Flags
    /// Key clarity below which `WeakTonality` is flagged (default: 0.05)
    pub weak_tonality_threshold: f64,

    /// Absolute best-major minus best-minor score below which
    /// `AmbiguousMode` is flagged (default: 0.02)
    pub ambiguous_mode_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_unit: TimeUnit::Beats,
            tempo_bpm: 120.0,
            weighting: Weighting::Duration,
            profile: "KrumhanslKessler".to_string(),
            metric: SimilarityMetric::Pearson,
            mode_method: ModeMethod::Best,
            key_context: "Cmaj".to_string(),
            use_detected_key_for_spelling: false,
            weak_tonality_threshold: 0.05,
            ambiguous_mode_threshold: 0.02,
        }
    }
}

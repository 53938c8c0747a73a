//! Analysis metadata structures

use super::result::AnalysisFlag;
use serde::{Deserialize, Serialize};

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Number of slices produced by the slicer
    pub slice_count: usize,

    /// Number of notes paired from the event stream
    pub note_count: usize,

    /// Length of the event stream in ticks
    pub total_ticks: u64,

    /// Time resolution of the input
    pub ticks_per_beat: u32,

    /// Tone profile used for key finding
    pub profile: String,

    /// Similarity metric used for key finding
    pub metric: String,

    /// Key context the chord names are spelled in
    pub spelling_context: String,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,

    /// Human-readable notes on degraded results
    pub warnings: Vec<String>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            slice_count: 0,
            note_count: 0,
            total_ticks: 0,
            ticks_per_beat: 0,
            profile: String::new(),
            metric: String::new(),
            spelling_context: String::new(),
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            flags: vec![],
            warnings: vec![],
        }
    }
}

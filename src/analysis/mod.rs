//! Analysis and result aggregation modules
//!
//! Combines all feature extraction results into final analysis:
//! - Summary descriptors (ambitus, pitch height, onset rate)
//! - Result types
//! - Metadata

pub mod descriptors;
pub mod metadata;
pub mod result;

pub use descriptors::{ambitus, onset_rate, pitch_height};
pub use metadata::AnalysisMetadata;
pub use result::{AnalysisFlag, AnalysisResult, Key, Mode, SliceChord};

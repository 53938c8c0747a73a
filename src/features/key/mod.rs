//! Key detection modules
//!
//! Detect musical key using:
//! - Named tone profiles (Krumhansl-Kessler, Temperley, ...) in 24 rotations
//! - Interchangeable similarity metrics
//! - Major/minor polarity and key clarity scoring

pub mod detector;
pub mod key_clarity;
pub mod similarity;
pub mod templates;

pub use detector::{mode_polarity, polarity, score_keys, KeyFinder, KeyScores, ModeMethod};
pub use key_clarity::key_clarity;
pub use similarity::SimilarityMetric;
pub use templates::{ProfileBank, ProfileTemplates, ToneProfile};

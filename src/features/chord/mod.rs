//! Chord identification modules
//!
//! Name the harmony of a pitch collection:
//! - Forte interval vectors and bass-interval patterns
//! - Two-stage quality lookup (interval vector, then bass pattern)
//! - Note-name spelling in a key context
//! - Parncutt root salience as an alternative root estimate

pub mod identifier;
pub mod interval;
pub mod salience;
pub mod spelling;
pub mod tables;

pub use identifier::{classify, triad_quality, ChordIdentifier, ChordResult};
pub use interval::{bass_intervals, interval_vector, IntervalVector};
pub use salience::{pitch_salience, PitchSalience, SalienceWeights};
pub use spelling::KeyContext;
pub use tables::{ChordVocabulary, QualityLookup, StandardVocabulary};

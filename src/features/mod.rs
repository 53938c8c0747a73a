//! Feature extraction modules
//!
//! This module contains all symbolic feature extraction algorithms:
//! - Pitch-class distributions (duration, velocity or count weighted)
//! - Chord identification (interval vectors + bass disambiguation)
//! - Key detection (tone-profile correlation)

pub mod chord;
pub mod distribution;
pub mod key;

//! Pitch-class distribution modules
//!
//! Summarize pitch content as a 12-bin distribution:
//! - Duration, velocity or count weighting
//! - Construction from paired notes or from slices
//! - Normalization to unit sum

pub mod builder;

pub use builder::{normalize, pcd_from_notes, pcd_from_slices, raw_pcd_from_notes, raw_pcd_from_slices};

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Weight accumulated into each pitch-class bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    /// Sounding duration
    Duration,
    /// Sounding duration scaled by velocity / 127 (notes only)
    Velocity,
    /// One per note (or per sounding pitch of a slice)
    Count,
}

/// Normalized pitch-class duration distribution
///
/// Index 0 is C, 11 is B. Buckets are in [0, 1] and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchClassDistribution {
    weights: [f64; 12],
}

impl PitchClassDistribution {
    pub(crate) fn from_normalized(weights: [f64; 12]) -> Self {
        Self { weights }
    }

    /// Bucket values in pitch-class order
    pub fn values(&self) -> &[f64; 12] {
        &self.weights
    }

    /// Bucket values as a slice, ready for key finding
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Pitch class with the largest share (lowest index on ties)
    pub fn peak(&self) -> usize {
        let mut best = 0;
        for (pc, &w) in self.weights.iter().enumerate() {
            if w > self.weights[best] {
                best = pc;
            }
        }
        best
    }
}

impl Index<usize> for PitchClassDistribution {
    type Output = f64;

    fn index(&self, pitch_class: usize) -> &f64 {
        &self.weights[pitch_class]
    }
}

//! Similarity metrics between a profile rotation and a distribution
//!
//! All metrics are oriented so that larger means more similar:
//! - Pearson correlation coefficient (0 when either input is constant)
//! - Cosine similarity (1 - cosine distance)
//! - Euclidean similarity (1 - Euclidean distance, not scale-invariant)
//! - Spearman rank correlation (average ranks for ties)

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variances and norms below this are treated as zero
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Similarity metric used to score a distribution against key rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Pearson correlation coefficient
    #[default]
    Pearson,
    /// Cosine similarity
    Cosine,
    /// One minus Euclidean distance
    Euclidean,
    /// Spearman rank correlation
    Spearman,
}

impl SimilarityMetric {
    /// Registry name of the metric
    pub fn name(&self) -> &'static str {
        match self {
            SimilarityMetric::Pearson => "pearson",
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Euclidean => "euclidean",
            SimilarityMetric::Spearman => "spearman",
        }
    }

    /// Similarity of `distribution` to the reference `profile`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NumericalError` if either input has zero norm
    /// under the cosine metric.
    pub fn score(&self, profile: &[f64; 12], distribution: &[f64; 12]) -> Result<f64, AnalysisError> {
        match self {
            SimilarityMetric::Pearson => Ok(pearson(profile, distribution)),
            SimilarityMetric::Cosine => cosine(profile, distribution),
            SimilarityMetric::Euclidean => Ok(1.0 - euclidean_distance(profile, distribution)),
            SimilarityMetric::Spearman => Ok(pearson(&average_ranks(profile), &average_ranks(distribution))),
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pearson" | "pearsonr" => Ok(SimilarityMetric::Pearson),
            "cosine" => Ok(SimilarityMetric::Cosine),
            "euclidean" => Ok(SimilarityMetric::Euclidean),
            "spearman" => Ok(SimilarityMetric::Spearman),
            other => Err(AnalysisError::InvalidMetric(other.to_string())),
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient of two equal-length sequences
///
/// A constant sequence has no linear relation to anything and scores 0.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let (mean_a, mean_b) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a < DEGENERATE_EPSILON || var_b < DEGENERATE_EPSILON {
        return 0.0;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

/// Cosine similarity of two equal-length sequences
pub fn cosine(a: &[f64], b: &[f64]) -> Result<f64, AnalysisError> {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a < DEGENERATE_EPSILON || norm_b < DEGENERATE_EPSILON {
        return Err(AnalysisError::NumericalError(
            "cosine similarity is undefined for a zero vector".to_string(),
        ));
    }
    Ok(dot / (norm_a * norm_b))
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// 1-based ranks, tied values share the average of their ranks
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAMP: [f64; 12] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0];

    #[test]
    fn test_parse_metric_names() {
        assert_eq!("pearson".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Pearson);
        assert_eq!("pearsonr".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Pearson);
        assert_eq!("spearman".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Spearman);
        assert_eq!(
            "manhattan".parse::<SimilarityMetric>().unwrap_err(),
            AnalysisError::InvalidMetric("manhattan".to_string())
        );
        assert_eq!(SimilarityMetric::Euclidean.to_string(), "euclidean");
    }

    #[test]
    fn test_pearson() {
        let doubled: Vec<f64> = RAMP.iter().map(|x| 2.0 * x + 3.0).collect();
        assert!((pearson(&RAMP, &doubled) - 1.0).abs() < 1e-12);

        let reversed: Vec<f64> = RAMP.iter().rev().copied().collect();
        assert!((pearson(&RAMP, &reversed) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_sequence_has_zero_correlation() {
        assert_eq!(pearson(&RAMP, &[1.0; 12]), 0.0);
        assert_eq!(SimilarityMetric::Spearman.score(&RAMP, &[1.0 / 12.0; 12]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_and_euclidean() {
        let mut unit = [0.0; 12];
        unit[0] = 1.0;
        assert!((cosine(&unit, &unit).unwrap() - 1.0).abs() < 1e-12);
        assert!(cosine(&unit, &[0.0; 12]).is_err());

        let score = SimilarityMetric::Euclidean.score(&[0.25; 12], &[0.25; 12]).unwrap();
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_is_not_scale_invariant() {
        // C major Krumhansl-Kessler weights against the same weights scaled to unit sum
        let major = [6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88];
        let total: f64 = major.iter().sum();
        let mut unit = major;
        for x in unit.iter_mut() {
            *x /= total;
        }

        let score = SimilarityMetric::Euclidean.score(&major, &unit).unwrap();
        let distance: f64 = major.iter().zip(&unit).map(|(a, b)| (a - b) * (a - b)).sum::<f64>().sqrt();
        assert!((score - (1.0 - distance)).abs() < 1e-12);
        assert!((score + 11.5257).abs() < 1e-3, "got {}", score);
        assert_eq!(SimilarityMetric::Euclidean.score(&major, &major).unwrap(), 1.0);
    }

    #[test]
    fn test_average_ranks_ties() {
        assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
    }

    #[test]
    fn test_spearman_is_rank_based() {
        let mut squared = RAMP;
        for x in squared.iter_mut() {
            *x = *x * *x;
        }
        let rho = SimilarityMetric::Spearman.score(&RAMP, &squared).unwrap();
        assert!((rho - 1.0).abs() < 1e-12, "monotone transform keeps rho = 1");
        let r = SimilarityMetric::Pearson.score(&RAMP, &squared).unwrap();
        assert!(r < 1.0 - 1e-6);
    }
}

//! Profile-correlation key finding
//!
//! Scores a pitch-class distribution against every rotation of a named tone
//! profile (Krumhansl-Schmuckler method) and derives a major/minor polarity.
//!
//! # Reference
//!
//! Krumhansl, C. L. (1990). *Cognitive Foundations of Musical Pitch*. Oxford
//! University Press.

use super::similarity::SimilarityMetric;
use super::templates::ProfileBank;
use crate::analysis::result::{Key, Mode};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How [`KeyFinder::mode_polarity`] combines the major and minor scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeMethod {
    /// Best major score minus best minor score
    #[default]
    Best,
    /// Sum of all major scores plus sum of all minor scores
    ///
    /// This adds rather than contrasts the two modes and is kept for
    /// compatibility with existing results; it does not express a polarity.
    Sum,
}

impl ModeMethod {
    /// Registry name of the method
    pub fn name(&self) -> &'static str {
        match self {
            ModeMethod::Best => "best",
            ModeMethod::Sum => "sum",
        }
    }
}

impl FromStr for ModeMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best" => Ok(ModeMethod::Best),
            "sum" => Ok(ModeMethod::Sum),
            other => Err(AnalysisError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ModeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Similarity score of each of the 24 keys
///
/// Entries are stored in `Key::all()` order: C major to B major, then C minor
/// to B minor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyScores {
    scores: Vec<(Key, f64)>,
}

impl KeyScores {
    /// Score of one key
    pub fn get(&self, key: Key) -> Option<f64> {
        self.scores.iter().find(|(k, _)| *k == key).map(|(_, s)| *s)
    }

    /// All (key, score) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = &(Key, f64)> {
        self.scores.iter()
    }

    /// Scores of one mode, in tonic order
    pub fn mode_scores(&self, mode: Mode) -> impl Iterator<Item = f64> + '_ {
        self.scores
            .iter()
            .filter(move |(k, _)| k.mode() == mode)
            .map(|(_, s)| *s)
    }

    /// Number of scored keys
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when no key was scored
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Highest-scoring key
    ///
    /// Ties go to the first key in key order, so C major wins over any equal
    /// score further along.
    pub fn best_key(&self) -> Option<(Key, f64)> {
        self.scores.iter().copied().fold(None, |best, (key, score)| match best {
            Some((_, top)) if score <= top => best,
            _ => Some((key, score)),
        })
    }

    /// All keys sorted by descending score, ties kept in key order
    pub fn ranked(&self) -> Vec<(Key, f64)> {
        let mut ranked = self.scores.clone();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Key finder over a profile bank
#[derive(Debug, Clone, Copy)]
pub struct KeyFinder<'a> {
    bank: &'a ProfileBank,
}

impl Default for KeyFinder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyFinder<'static> {
    /// Key finder using the built-in profiles
    pub fn new() -> Self {
        Self {
            bank: ProfileBank::builtin(),
        }
    }
}

impl<'a> KeyFinder<'a> {
    /// Key finder using a custom profile bank
    pub fn with_bank(bank: &'a ProfileBank) -> Self {
        Self { bank }
    }

    /// Profile bank in use
    pub fn bank(&self) -> &'a ProfileBank {
        self.bank
    }

    /// Score a distribution against all 24 rotations of a profile
    ///
    /// # Arguments
    ///
    /// * `pcd` - 12 values in pitch-class order (C = 0). Pearson and Spearman
    ///   are scale-invariant; cosine and Euclidean expect a unit-sum input.
    /// * `profile` - Registered profile name
    /// * `metric` - Similarity metric
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` if:
    /// - The profile is not registered (`InvalidProfile`)
    /// - `pcd` does not hold exactly 12 finite values (`InvalidInput`)
    /// - The metric is undefined for `pcd`, e.g. an all-zero input under
    ///   cosine (`NumericalError`)
    pub fn score_keys(
        &self,
        pcd: &[f64],
        profile: &str,
        metric: SimilarityMetric,
    ) -> Result<KeyScores, AnalysisError> {
        log::debug!("Scoring keys with profile {} and metric {}", profile, metric);

        let templates = self.bank.get(profile)?;
        let distribution = validate_distribution(pcd)?;

        let scores = templates
            .rotations()
            .iter()
            .map(|(key, rotation)| Ok((*key, metric.score(rotation, &distribution)?)))
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        Ok(KeyScores { scores })
    }

    /// Single scalar of major-versus-minor bias
    ///
    /// With [`ModeMethod::Best`] a positive value leans major and a negative
    /// value leans minor.
    ///
    /// # Errors
    ///
    /// Same conditions as [`score_keys`](Self::score_keys)
    pub fn mode_polarity(
        &self,
        pcd: &[f64],
        profile: &str,
        method: ModeMethod,
        metric: SimilarityMetric,
    ) -> Result<f64, AnalysisError> {
        let scores = self.score_keys(pcd, profile, metric)?;
        Ok(polarity(&scores, method))
    }
}

/// Combine major and minor scores per `method`
pub fn polarity(scores: &KeyScores, method: ModeMethod) -> f64 {
    match method {
        ModeMethod::Best => {
            let best = |mode: Mode| scores.mode_scores(mode).fold(f64::NEG_INFINITY, f64::max);
            best(Mode::Major) - best(Mode::Minor)
        }
        ModeMethod::Sum => {
            let sum_major: f64 = scores.mode_scores(Mode::Major).sum();
            let sum_minor: f64 = scores.mode_scores(Mode::Minor).sum();
            sum_major + sum_minor
        }
    }
}

fn validate_distribution(pcd: &[f64]) -> Result<[f64; 12], AnalysisError> {
    let distribution: [f64; 12] = pcd.try_into().map_err(|_| {
        AnalysisError::InvalidInput(format!(
            "pitch-class distribution must have 12 elements, got {}",
            pcd.len()
        ))
    })?;
    if let Some(pc) = distribution.iter().position(|v| !v.is_finite()) {
        return Err(AnalysisError::InvalidInput(format!(
            "pitch-class distribution value at index {} is not finite",
            pc
        )));
    }
    Ok(distribution)
}

/// Score a distribution by profile and metric name
///
/// # Errors
///
/// Returns `InvalidMetric` for an unknown metric name, otherwise the
/// conditions of [`KeyFinder::score_keys`].
///
/// # Example
///
/// ```
/// use pitchscape::analysis::result::Key;
/// use pitchscape::features::key::score_keys;
///
/// let pcd = [6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88];
/// let scores = score_keys(&pcd, "KrumhanslKessler", "pearson")?;
/// assert_eq!(scores.best_key().map(|(k, _)| k), Some(Key::Major(0)));
/// # Ok::<(), pitchscape::AnalysisError>(())
/// ```
pub fn score_keys(pcd: &[f64], profile: &str, metric: &str) -> Result<KeyScores, AnalysisError> {
    let metric: SimilarityMetric = metric.parse()?;
    KeyFinder::new().score_keys(pcd, profile, metric)
}

/// Major/minor polarity by profile, method and metric name
///
/// # Errors
///
/// Returns `InvalidMethod` or `InvalidMetric` for unknown names, otherwise
/// the conditions of [`KeyFinder::score_keys`].
pub fn mode_polarity(
    pcd: &[f64],
    profile: &str,
    method: &str,
    metric: &str,
) -> Result<f64, AnalysisError> {
    let method: ModeMethod = method.parse()?;
    let metric: SimilarityMetric = metric.parse()?;
    KeyFinder::new().mode_polarity(pcd, profile, method, metric)
}

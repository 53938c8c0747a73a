//! Error types for the symbolic analysis engine
//!
//! Only input validation and degenerate inputs are errors. An unclassifiable
//! chord is a normal outcome and is reported through `Option` fields on
//! [`ChordResult`](crate::features::chord::ChordResult) instead.

use thiserror::Error;

/// Errors that can occur during symbolic analysis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Invalid input parameters (wrong distribution length, bad resolution, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tone profile name is not registered in the profile bank
    #[error("Invalid profile name: {0}")]
    InvalidProfile(String),

    /// Similarity metric name is not one of pearson, cosine, euclidean, spearman
    #[error("Invalid similarity metric: {0}")]
    InvalidMetric(String),

    /// Mode polarity method is not one of best, sum
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Nothing to aggregate (zero total weight, no notes)
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Numerical error (zero variance, zero norm, ...)
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Malformed tone profile table
    #[error("Profile format error at line {line}: {message}")]
    ProfileFormat {
        /// 1-based line number in the source text
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Standard MIDI File could not be decoded
    #[cfg(feature = "midi")]
    #[error("MIDI decoding error: {0}")]
    Midi(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_argument() {
        let err = AnalysisError::InvalidProfile("Nonexistent".to_string());
        assert_eq!(err.to_string(), "Invalid profile name: Nonexistent");

        let err = AnalysisError::ProfileFormat {
            line: 4,
            message: "expected 25 columns, got 13".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Profile format error at line 4: expected 25 columns, got 13"
        );
    }
}

//! Error types for scoring operations

use thiserror::Error;

/// Validation errors raised by scoring operations.
///
/// These are never transient: a call that fails validation produces no
/// partial result. Degenerate inputs (no units on either side) are not
/// errors and yield zero-valued outputs instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// Paired sequences (or a sequence and its mask/curve) differ in length
    #[error("length mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Length of the reference sequence
        expected: usize,
        /// Length of the offending sequence
        actual: usize,
    },

    /// Data does not fit its declared representation
    #[error("representation violation: {reason}")]
    RepresentationViolation {
        /// What was wrong with the data
        reason: String,
    },

    /// A numeric policy parameter is out of range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl ScoreError {
    pub(crate) fn representation(reason: impl Into<String>) -> Self {
        Self::RepresentationViolation {
            reason: reason.into(),
        }
    }

    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for scoring operations
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Ensure two lengths agree.
pub(crate) fn ensure_same_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ScoreError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// Ensure a threshold-like parameter is finite and within `[lo, hi]`.
pub(crate) fn ensure_in_range(name: &'static str, value: f64, lo: f64, hi: f64) -> Result<()> {
    if !value.is_finite() || value < lo || value > hi {
        return Err(ScoreError::parameter(
            name,
            format!("{value} is outside [{lo}, {hi}]"),
        ));
    }
    Ok(())
}

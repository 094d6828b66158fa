//! Precision / recall / F1 aggregation
//!
//! Every variant ends in the same place: a [`PrfScores`] built either from
//! raw counts or from two independently computed ratios. Zero denominators
//! yield zero scores, never NaN.

pub mod framewise;
pub mod margin;
pub mod unit;
pub mod window;

pub use framewise::{
    binary_confusion, framewise_accuracy, framewise_prf1, framewise_prf1_multiclass, per_class_accuracy,
    weighted_accuracy, weighted_from_classes, BinaryConfusion, ClassAccuracy,
};
pub use margin::{margin_prf1, margin_prf1_units};
pub use unit::{unit_prf1, unit_prf1_matched};
pub use window::window_prf1;

/// Match counts behind a precision/recall pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchCounts {
    /// True positive count
    pub true_positives: usize,
    /// False positive count
    pub false_positives: usize,
    /// False negative count
    pub false_negatives: usize,
}

/// Precision, recall and F1
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrfScores {
    /// Precision: TP / (TP + FP)
    pub precision: f64,
    /// Recall: TP / (TP + FN)
    pub recall: f64,
    /// F1 score: 2 * (precision * recall) / (precision + recall)
    pub f1: f64,
}

impl PrfScores {
    /// Create scores from raw counts
    pub fn from_counts(counts: MatchCounts) -> Self {
        let precision = ratio(
            counts.true_positives,
            counts.true_positives + counts.false_positives,
        );
        let recall = ratio(
            counts.true_positives,
            counts.true_positives + counts.false_negatives,
        );
        Self::from_ratios(precision, recall)
    }

    /// Create scores from a precision and a recall computed separately
    pub fn from_ratios(precision: f64, recall: f64) -> Self {
        let f1 = if precision + recall > 0.0 {
            2.0 * (precision * recall) / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
        }
    }

    /// All-zero scores for degenerate inputs
    pub fn zero() -> Self {
        Self::default()
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_counts() {
        let scores = PrfScores::from_counts(MatchCounts {
            true_positives: 3,
            false_positives: 0,
            false_negatives: 0,
        });
        assert_eq!(scores.precision, 1.0);
        assert_eq!(scores.recall, 1.0);
        assert_eq!(scores.f1, 1.0);
    }

    #[test]
    fn test_no_predictions() {
        let scores = PrfScores::from_counts(MatchCounts {
            true_positives: 0,
            false_positives: 0,
            false_negatives: 3,
        });
        assert_eq!(scores, PrfScores::zero());
    }

    #[test]
    fn test_partial_counts() {
        let scores = PrfScores::from_counts(MatchCounts {
            true_positives: 1,
            false_positives: 1,
            false_negatives: 3,
        });
        assert_eq!(scores.precision, 0.5);
        assert_eq!(scores.recall, 0.25);
        assert!((scores.f1 - 1.0 / 3.0).abs() < 1e-12);
    }
}

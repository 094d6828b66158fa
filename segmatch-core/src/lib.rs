//! Interval-overlap scoring for temporal segmentation
//!
//! This crate scores framewise label predictions (sign-language annotation
//! streams, for instance) against ground truth by matching labeled intervals
//! instead of comparing frames one by one.
//!
//! # Pipeline
//!
//! - [`labels`]: raw class indices or one-hot / probability matrices are
//!   canonicalized into one class index per frame
//! - [`units`]: maximal runs of a non-background class become units
//! - [`matching`]: Wolf overlap matrix, best matches, thresholded and
//!   margin-based compatibility
//! - [`metrics`]: framewise and unit-based precision / recall / F1
//! - [`sweep`]: tolerance sweeps and their integral summaries
//!
//! Everything is a pure function of its inputs. Batches of independent
//! sequences can be scored in parallel by the caller.
//!
//! # Example
//!
//! ```rust
//! use segmatch_core::{prf_star, unit_prf1, Labels};
//!
//! let truth = [0, 1, 1, 1, 0, 2, 2, 0];
//! let pred = [0, 1, 1, 0, 0, 2, 2, 2];
//!
//! let scores = unit_prf1(&Labels::classes(&truth), &Labels::classes(&pred), 0.3, 0.3).unwrap();
//! assert_eq!(scores.f1, 1.0);
//!
//! let curves = prf_star(&Labels::classes(&truth), &Labels::classes(&pred), 0.01).unwrap();
//! let summary = curves.integrals();
//! assert!(summary.average > 0.0 && summary.average <= 1.0);
//! ```

#![warn(missing_docs)]

pub mod concat;
pub mod error;
pub mod labels;
pub mod matching;
pub mod metrics;
pub mod sweep;
pub mod units;

pub use concat::{concatenate, Concatenated};
pub use error::{Result, ScoreError};
pub use labels::{canonical_pair, LabelSequence, Labels, BACKGROUND};
pub use matching::{
    best_matches, compatibility_matrix, interval_compatible, is_matched, overlap_matrix,
    overlap_matrix_brute_force, wolf_score, BestMatches, MarginPolicy, UnitMatching,
};
pub use metrics::{
    binary_confusion, framewise_accuracy, framewise_prf1, framewise_prf1_multiclass, margin_prf1,
    margin_prf1_units, per_class_accuracy, unit_prf1, unit_prf1_matched, weighted_accuracy,
    weighted_from_classes, window_prf1, BinaryConfusion, ClassAccuracy, MatchCounts, PrfScores,
};
pub use sweep::{
    harmonic_f1, integral_values, prf_star, prf_star_matched, tolerance_grid, IntegralSummary,
    SweepCurves, MIN_STEP,
};
pub use units::{extract_units, Unit};

//! Overlap matching between true and predicted units
//!
//! Every unit-based score is built on the same pieces: the Wolf overlap
//! matrix, the best match for each unit on the other side, and the
//! thresholded `is_matched` predicate. Margin policies use the weaker
//! [`interval_compatible`] predicate instead.

use crate::error::Result;
use crate::labels::{argmax, canonical_pair, LabelSequence, Labels};
use crate::units::Unit;
use ndarray::{Array2, Axis};
use std::collections::HashMap;

/// Wolf measure: `2 * |A ∩ B| / (|A| + |B|)` for same-class units, else 0.
///
/// Symmetric in its arguments.
pub fn wolf_score(a: &Unit, b: &Unit) -> f64 {
    if !a.same_class(b) {
        return 0.0;
    }
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    2.0 * a.intersection(b) as f64 / total as f64
}

/// Overlap score matrix of shape `[true_units.len(), pred_units.len()]`.
///
/// Only same-class, range-overlapping pairs are visited. Units as produced by
/// [`extract_units`](crate::units::extract_units) are sorted and disjoint,
/// which lets each true unit binary-search its candidates; any other input
/// falls back to [`overlap_matrix_brute_force`].
pub fn overlap_matrix(true_units: &[Unit], pred_units: &[Unit]) -> Array2<f64> {
    if !is_sorted_disjoint(pred_units) {
        tracing::trace!("predicted units unordered, using all-pairs overlap");
        return overlap_matrix_brute_force(true_units, pred_units);
    }

    let mut matrix = Array2::zeros((true_units.len(), pred_units.len()));

    let mut by_class: HashMap<usize, Vec<usize>> = HashMap::new();
    for (j, unit) in pred_units.iter().enumerate() {
        by_class.entry(unit.class_label).or_default().push(j);
    }

    for (i, truth) in true_units.iter().enumerate() {
        let Some(candidates) = by_class.get(&truth.class_label) else {
            continue;
        };

        // Within one class, ends increase with starts.
        let first = candidates.partition_point(|&j| pred_units[j].end <= truth.start);
        for &j in &candidates[first..] {
            let pred = &pred_units[j];
            if pred.start >= truth.end {
                break;
            }
            matrix[[i, j]] = wolf_score(truth, pred);
        }
    }

    matrix
}

/// All-pairs overlap score matrix, the reference for [`overlap_matrix`]
pub fn overlap_matrix_brute_force(true_units: &[Unit], pred_units: &[Unit]) -> Array2<f64> {
    Array2::from_shape_fn((true_units.len(), pred_units.len()), |(i, j)| {
        wolf_score(&true_units[i], &pred_units[j])
    })
}

fn is_sorted_disjoint(units: &[Unit]) -> bool {
    units.iter().all(|unit| unit.start <= unit.end)
        && units.windows(2).all(|pair| pair[0].end <= pair[1].start)
}

/// Best-match indices in both directions
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestMatches {
    /// For each predicted unit, the index of its best true unit
    pub true_for_pred: Vec<usize>,
    /// For each true unit, the index of its best predicted unit
    pub pred_for_true: Vec<usize>,
}

/// Argmax along both axes of an overlap matrix.
///
/// Ties go to the lowest index, so a unit overlapping nothing is paired with
/// index 0. Returns `None` when either side has no units.
pub fn best_matches(matrix: &Array2<f64>) -> Option<BestMatches> {
    if matrix.nrows() == 0 || matrix.ncols() == 0 {
        return None;
    }

    Some(BestMatches {
        true_for_pred: matrix.axis_iter(Axis(1)).map(argmax).collect(),
        pred_for_true: matrix.axis_iter(Axis(0)).map(argmax).collect(),
    })
}

/// Thresholded match between a true and a predicted unit.
///
/// Both ratios must strictly exceed their threshold: an intersection covering
/// exactly `tp` of the prediction does not match.
pub fn is_matched(true_unit: &Unit, pred_unit: &Unit, tp: f64, tr: f64) -> bool {
    if !true_unit.same_class(pred_unit) || true_unit.len() == 0 || pred_unit.len() == 0 {
        return false;
    }
    let intersection = true_unit.intersection(pred_unit) as f64;
    intersection / pred_unit.len() as f64 > tp && intersection / true_unit.len() as f64 > tr
}

/// How two units are compared under a tolerance margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MarginPolicy {
    /// Spans may be separated by a gap smaller than the margin
    #[default]
    Boundary,
    /// Midpoints may differ by at most the margin
    Midpoint,
}

/// Whether two same-class units are close enough under `policy`.
///
/// Boundary: neither unit starts `margin` or more frames after the other
/// ends. With a zero margin this is plain span overlap.
/// Midpoint: `|mid(a) - mid(b)| <= margin`.
pub fn interval_compatible(a: &Unit, b: &Unit, margin: f64, policy: MarginPolicy) -> bool {
    if !a.same_class(b) {
        return false;
    }
    match policy {
        MarginPolicy::Boundary => {
            let separated_after = a.start as f64 >= b.end as f64 + margin;
            let separated_before = b.start as f64 >= a.end as f64 + margin;
            !separated_after && !separated_before
        }
        MarginPolicy::Midpoint => (a.midpoint() - b.midpoint()).abs() <= margin,
    }
}

/// Compatibility of every (true, pred) pair, shape `[true, pred]`
pub fn compatibility_matrix(
    true_units: &[Unit],
    pred_units: &[Unit],
    margin: f64,
    policy: MarginPolicy,
) -> Array2<bool> {
    Array2::from_shape_fn((true_units.len(), pred_units.len()), |(i, j)| {
        interval_compatible(&true_units[i], &pred_units[j], margin, policy)
    })
}

/// Units, overlap scores and best matches for one annotation/prediction pair
#[derive(Debug, Clone)]
pub struct UnitMatching {
    /// Units of the annotation
    pub true_units: Vec<Unit>,
    /// Units of the prediction
    pub pred_units: Vec<Unit>,
    /// Wolf overlap matrix `[true, pred]`
    pub overlaps: Array2<f64>,
    /// Best matches, absent when either side has no units
    pub best: Option<BestMatches>,
}

impl UnitMatching {
    /// Match two canonical sequences
    pub fn new(truth: &LabelSequence, pred: &LabelSequence) -> Self {
        Self::from_units(truth.units(), pred.units())
    }

    /// Canonicalize, check lengths, and match
    pub fn from_labels(truth: &Labels<'_>, pred: &Labels<'_>) -> Result<Self> {
        let (truth, pred) = canonical_pair(truth, pred)?;
        Ok(Self::new(&truth, &pred))
    }

    /// Match pre-extracted units
    pub fn from_units(true_units: Vec<Unit>, pred_units: Vec<Unit>) -> Self {
        let overlaps = overlap_matrix(&true_units, &pred_units);
        let best = best_matches(&overlaps);
        Self {
            true_units,
            pred_units,
            overlaps,
            best,
        }
    }

    /// Whether either side has no units
    pub fn is_degenerate(&self) -> bool {
        self.best.is_none()
    }

    /// Each predicted unit paired with its best true unit, as `(true, pred)`
    pub fn pred_pairs(&self) -> impl Iterator<Item = (&Unit, &Unit)> + '_ {
        self.best.iter().flat_map(move |best| {
            best.true_for_pred
                .iter()
                .zip(&self.pred_units)
                .map(move |(&i, pred)| (&self.true_units[i], pred))
        })
    }

    /// Each true unit paired with its best predicted unit, as `(true, pred)`
    pub fn true_pairs(&self) -> impl Iterator<Item = (&Unit, &Unit)> + '_ {
        self.best.iter().flat_map(move |best| {
            best.pred_for_true
                .iter()
                .zip(&self.true_units)
                .map(move |(&j, truth)| (truth, &self.pred_units[j]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::extract_units;

    fn worked_example() -> (Vec<Unit>, Vec<Unit>) {
        (
            extract_units(&[0, 1, 1, 1, 0, 2, 2, 0]),
            extract_units(&[0, 1, 1, 0, 0, 2, 2, 2]),
        )
    }

    #[test]
    fn test_worked_example_overlaps() {
        let (truth, pred) = worked_example();
        let matrix = overlap_matrix(&truth, &pred);

        assert_eq!(matrix.shape(), &[2, 2]);
        assert!((matrix[[0, 0]] - 0.8).abs() < 1e-12);
        assert!((matrix[[1, 1]] - 0.8).abs() < 1e-12);
        assert_eq!(matrix[[0, 1]], 0.0);
        assert_eq!(matrix[[1, 0]], 0.0);

        for (t, p) in [(0, 0), (1, 1)] {
            assert!(is_matched(&truth[t], &pred[p], 0.3, 0.3));
        }
    }

    #[test]
    fn test_wolf_score_is_symmetric() {
        let a = Unit::new(1, 0, 5);
        let b = Unit::new(1, 3, 9);
        assert_eq!(wolf_score(&a, &b), wolf_score(&b, &a));
        assert_eq!(wolf_score(&a, &Unit::new(2, 0, 5)), 0.0);
    }

    #[test]
    fn test_best_matches_argmax() {
        let truth = extract_units(&[1, 1, 1, 0, 1, 1, 0, 0]);
        let pred = extract_units(&[1, 1, 0, 0, 0, 1, 1, 1]);
        let matrix = overlap_matrix(&truth, &pred);
        let best = best_matches(&matrix).unwrap();

        assert_eq!(best.true_for_pred, vec![0, 1]);
        assert_eq!(best.pred_for_true, vec![0, 1]);
    }

    #[test]
    fn test_best_matches_unmatched_unit_points_at_zero() {
        let truth = vec![Unit::new(1, 0, 2)];
        let pred = vec![Unit::new(2, 0, 2), Unit::new(1, 1, 2)];
        let best = best_matches(&overlap_matrix(&truth, &pred)).unwrap();
        assert_eq!(best.true_for_pred, vec![0, 0]);
        assert_eq!(best.pred_for_true, vec![1]);
    }

    #[test]
    fn test_best_matches_empty_is_none() {
        let truth = extract_units(&[0, 1, 1]);
        let matrix = overlap_matrix(&truth, &[]);
        assert_eq!(matrix.shape(), &[1, 0]);
        assert!(best_matches(&matrix).is_none());
        assert!(best_matches(&overlap_matrix(&[], &truth)).is_none());
    }

    #[test]
    fn test_is_matched_threshold_is_strict() {
        // intersection 2, pred len 4, true len 2
        let truth = Unit::new(1, 2, 4);
        let pred = Unit::new(1, 0, 4);
        assert!(!is_matched(&truth, &pred, 0.5, 0.0));
        assert!(is_matched(&truth, &pred, 0.49, 0.0));
        assert!(!is_matched(&truth, &pred, 0.0, 1.0));
        assert!(!is_matched(&Unit::new(2, 2, 4), &pred, 0.0, 0.0));
    }

    #[test]
    fn test_unordered_units_use_brute_force() {
        let truth = vec![Unit::new(1, 0, 4), Unit::new(1, 6, 9)];
        let pred = vec![Unit::new(1, 7, 9), Unit::new(1, 1, 3)];
        assert_eq!(
            overlap_matrix(&truth, &pred),
            overlap_matrix_brute_force(&truth, &pred)
        );
    }

    #[test]
    fn test_inverted_units_score_zero() {
        let truth = vec![Unit::new(1, 0, 4)];
        let pred = vec![
            Unit {
                class_label: 1,
                start: 3,
                end: 1,
            },
            Unit::new(1, 6, 8),
        ];
        let matrix = overlap_matrix(&truth, &pred);
        assert_eq!(matrix, overlap_matrix_brute_force(&truth, &pred));
        assert!(matrix.iter().all(|&score| score == 0.0));
        assert!(!is_matched(&truth[0], &pred[0], 0.0, 0.0));
    }

    #[test]
    fn test_boundary_compatibility() {
        let a = Unit::new(1, 0, 4);
        let b = Unit::new(1, 6, 8);
        assert!(!interval_compatible(&a, &b, 0.0, MarginPolicy::Boundary));
        assert!(!interval_compatible(&a, &b, 2.0, MarginPolicy::Boundary));
        assert!(interval_compatible(&a, &b, 2.5, MarginPolicy::Boundary));
        assert!(interval_compatible(&b, &a, 2.5, MarginPolicy::Boundary));
        assert!(!interval_compatible(
            &a,
            &Unit::new(2, 0, 4),
            10.0,
            MarginPolicy::Boundary
        ));
    }

    #[test]
    fn test_touching_units_do_not_overlap_without_margin() {
        let a = Unit::new(1, 0, 4);
        let b = Unit::new(1, 4, 6);
        assert!(!interval_compatible(&a, &b, 0.0, MarginPolicy::Boundary));
        assert!(interval_compatible(&a, &b, 0.5, MarginPolicy::Boundary));
    }

    #[test]
    fn test_midpoint_compatibility() {
        let a = Unit::new(1, 0, 4); // mid 2
        let b = Unit::new(1, 3, 9); // mid 6
        assert!(interval_compatible(&a, &b, 4.0, MarginPolicy::Midpoint));
        assert!(!interval_compatible(&a, &b, 3.9, MarginPolicy::Midpoint));
        assert!(interval_compatible(&a, &a, 0.0, MarginPolicy::Midpoint));
    }

    #[test]
    fn test_unit_matching_pairs() {
        let truth = LabelSequence::new(vec![0, 1, 1, 1, 0, 2, 2, 0]);
        let pred = LabelSequence::new(vec![0, 1, 1, 0, 0, 2, 2, 2]);
        let matching = UnitMatching::new(&truth, &pred);

        let pairs: Vec<_> = matching.pred_pairs().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.class_label, 1);
        assert_eq!(pairs[1].1.class_label, 2);
        assert_eq!(matching.true_pairs().count(), 2);
    }

    #[test]
    fn test_unit_matching_degenerate() {
        let truth = LabelSequence::new(vec![0, 1, 1]);
        let pred = LabelSequence::new(vec![0, 0, 0]);
        let matching = UnitMatching::new(&truth, &pred);
        assert!(matching.is_degenerate());
        assert_eq!(matching.pred_pairs().count(), 0);
        assert_eq!(matching.true_pairs().count(), 0);
    }
}

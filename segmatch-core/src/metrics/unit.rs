//! Strict-threshold unit precision and recall

use super::{ratio, PrfScores};
use crate::error::{ensure_in_range, Result};
use crate::labels::Labels;
use crate::matching::{is_matched, UnitMatching};
use crate::units::Unit;

/// Unit precision, recall and F1 at fixed thresholds `(tp, tr)`.
///
/// A predicted unit is correct when it matches its best annotated unit, an
/// annotated unit is found when it matches its best predicted unit, both via
/// [`is_matched`].
pub fn unit_prf1(truth: &Labels<'_>, pred: &Labels<'_>, tp: f64, tr: f64) -> Result<PrfScores> {
    ensure_in_range("tp", tp, 0.0, 1.0)?;
    ensure_in_range("tr", tr, 0.0, 1.0)?;
    let matching = UnitMatching::from_labels(truth, pred)?;
    Ok(unit_prf1_matched(&matching, tp, tr))
}

/// [`unit_prf1`] over an existing matching
pub fn unit_prf1_matched(matching: &UnitMatching, tp: f64, tr: f64) -> PrfScores {
    if matching.is_degenerate() {
        return PrfScores::zero();
    }

    let precision = matched_share(matching.pred_pairs(), matching.pred_units.len(), tp, tr);
    let recall = matched_share(matching.true_pairs(), matching.true_units.len(), tp, tr);
    PrfScores::from_ratios(precision, recall)
}

fn matched_share<'u>(
    pairs: impl Iterator<Item = (&'u Unit, &'u Unit)>,
    total: usize,
    tp: f64,
    tr: f64,
) -> f64 {
    let matched = pairs
        .filter(|(truth, pred)| is_matched(truth, pred, tp, tr))
        .count();
    ratio(matched, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        let truth = [0, 1, 1, 1, 0, 2, 2, 0];
        let pred = [0, 1, 1, 0, 0, 2, 2, 2];
        let truth = Labels::classes(&truth);
        let pred = Labels::classes(&pred);

        let scores = unit_prf1(&truth, &pred, 0.3, 0.3).unwrap();
        assert_eq!(scores.precision, 1.0);
        assert_eq!(scores.recall, 1.0);

        // The class 2 prediction spills one frame past its annotation.
        let scores = unit_prf1(&truth, &pred, 0.7, 0.0).unwrap();
        assert_eq!(scores.precision, 0.5);
        assert_eq!(scores.recall, 0.5);
    }

    #[test]
    fn test_empty_prediction() {
        let truth = [0, 1, 1, 0];
        let pred = [0, 0, 0, 0];
        let scores = unit_prf1(&Labels::classes(&truth), &Labels::classes(&pred), 0.0, 0.0).unwrap();
        assert_eq!(scores, PrfScores::zero());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let truth = [0, 1];
        assert!(unit_prf1(&Labels::classes(&truth), &Labels::classes(&truth), 1.5, 0.0).is_err());
        assert!(unit_prf1(&Labels::classes(&truth), &Labels::classes(&truth), 0.0, f64::NAN).is_err());
    }
}

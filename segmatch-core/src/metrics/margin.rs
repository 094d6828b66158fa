//! Margin-based unit precision and recall

use super::{ratio, PrfScores};
use crate::error::{ensure_in_range, Result};
use crate::labels::{canonical_pair, Labels};
use crate::matching::{compatibility_matrix, MarginPolicy};
use crate::units::Unit;
use ndarray::Axis;

/// Unit precision, recall and F1 under a tolerance margin.
///
/// Precision is the share of predicted units compatible with at least one
/// annotated unit, recall the share of annotated units compatible with at
/// least one predicted unit. Either side empty gives zero scores.
pub fn margin_prf1(
    truth: &Labels<'_>,
    pred: &Labels<'_>,
    margin: f64,
    policy: MarginPolicy,
) -> Result<PrfScores> {
    ensure_in_range("margin", margin, 0.0, f64::MAX)?;
    let (truth, pred) = canonical_pair(truth, pred)?;
    Ok(margin_prf1_units(&truth.units(), &pred.units(), margin, policy))
}

/// [`margin_prf1`] over pre-extracted units
pub fn margin_prf1_units(
    true_units: &[Unit],
    pred_units: &[Unit],
    margin: f64,
    policy: MarginPolicy,
) -> PrfScores {
    if true_units.is_empty() || pred_units.is_empty() {
        tracing::trace!(
            true_units = true_units.len(),
            pred_units = pred_units.len(),
            "no units to compare, margin scores are zero"
        );
        return PrfScores::zero();
    }

    let compatible = compatibility_matrix(true_units, pred_units, margin, policy);

    let covered_preds = compatible
        .axis_iter(Axis(1))
        .filter(|column| column.iter().any(|&c| c))
        .count();
    let covered_truths = compatible
        .axis_iter(Axis(0))
        .filter(|row| row.iter().any(|&c| c))
        .count();

    PrfScores::from_ratios(
        ratio(covered_preds, pred_units.len()),
        ratio(covered_truths, true_units.len()),
    )
}

//! Threshold sweep over matching tolerances
//!
//! `prf_star` re-scores every unit against its best match while one of the
//! two `is_matched` thresholds walks the grid `0, step, 2 * step, ..., 1` and
//! the other stays at 0. The resulting F1 curves are summarized by their
//! trapezoidal integrals.

use crate::error::{ensure_same_len, Result, ScoreError};
use crate::labels::Labels;
use crate::matching::{is_matched, UnitMatching};

/// Slack applied when deciding whether `step` divides 1 evenly
const GRID_EPSILON: f64 = 1e-9;

/// Smallest accepted sweep step; caps the grid at a million intervals
pub const MIN_STEP: f64 = 1e-6;

/// Number of intervals in the tolerance grid for `step`
fn grid_intervals(step: f64) -> Result<usize> {
    if !step.is_finite() || step <= 0.0 || step > 1.0 {
        return Err(ScoreError::parameter(
            "step",
            format!("{step} must lie in (0, 1]"),
        ));
    }
    if step < MIN_STEP {
        return Err(ScoreError::parameter(
            "step",
            format!("{step} is below the minimum step {MIN_STEP}"),
        ));
    }
    Ok(((1.0 / step) - GRID_EPSILON).ceil().max(1.0) as usize)
}

/// Tolerance values `0, step, 2 * step, ...` ending exactly at 1.
///
/// Holds `ceil(1 / step) + 1` points.
pub fn tolerance_grid(step: f64) -> Result<Vec<f64>> {
    let intervals = grid_intervals(step)?;
    Ok((0..=intervals)
        .map(|i| {
            if i == intervals {
                1.0
            } else {
                (i as f64 * step).min(1.0)
            }
        })
        .collect())
}

/// Harmonic mean of precision and recall, 0 when either is 0
pub fn harmonic_f1(precision: f64, recall: f64) -> f64 {
    if precision <= 0.0 || recall <= 0.0 {
        return 0.0;
    }
    2.0 / (1.0 / precision + 1.0 / recall)
}

/// Precision, recall and F1 curves over the tolerance grid.
///
/// `*_tp` curves vary the precision threshold with `tr = 0`; `*_tr` curves
/// vary the recall threshold with `tp = 0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepCurves {
    /// Grid spacing
    pub step: f64,
    /// Tolerance value of each point
    pub tolerances: Vec<f64>,
    /// P*(tp, 0)
    pub precision_tp: Vec<f64>,
    /// P*(0, tr)
    pub precision_tr: Vec<f64>,
    /// R*(tp, 0)
    pub recall_tp: Vec<f64>,
    /// R*(0, tr)
    pub recall_tr: Vec<f64>,
    /// F1*(tp, 0)
    pub f1_tp: Vec<f64>,
    /// F1*(0, tr)
    pub f1_tr: Vec<f64>,
}

impl SweepCurves {
    fn zeros(step: f64, tolerances: Vec<f64>) -> Self {
        let n = tolerances.len();
        Self {
            step,
            tolerances,
            precision_tp: vec![0.0; n],
            precision_tr: vec![0.0; n],
            recall_tp: vec![0.0; n],
            recall_tr: vec![0.0; n],
            f1_tp: vec![0.0; n],
            f1_tr: vec![0.0; n],
        }
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.tolerances.len()
    }

    /// Whether the grid is empty (never true for a valid step)
    pub fn is_empty(&self) -> bool {
        self.tolerances.is_empty()
    }

    /// Trapezoidal integrals of both F1 curves
    pub fn integrals(&self) -> IntegralSummary {
        let intervals = self.len().saturating_sub(1);
        IntegralSummary::new(
            trapezoid(&self.f1_tp, self.step, intervals),
            trapezoid(&self.f1_tr, self.step, intervals),
        )
    }
}

/// Sweep both thresholds for an annotation/prediction pair.
///
/// With no units on either side every curve is all zeros.
pub fn prf_star(truth: &Labels<'_>, pred: &Labels<'_>, step: f64) -> Result<SweepCurves> {
    let tolerances = tolerance_grid(step)?;
    let matching = UnitMatching::from_labels(truth, pred)?;
    Ok(sweep(&matching, step, tolerances))
}

/// [`prf_star`] over an existing matching
pub fn prf_star_matched(matching: &UnitMatching, step: f64) -> Result<SweepCurves> {
    let tolerances = tolerance_grid(step)?;
    Ok(sweep(matching, step, tolerances))
}

fn sweep(matching: &UnitMatching, step: f64, tolerances: Vec<f64>) -> SweepCurves {
    let mut curves = SweepCurves::zeros(step, tolerances);
    if matching.is_degenerate() {
        tracing::debug!(
            true_units = matching.true_units.len(),
            pred_units = matching.pred_units.len(),
            "no units on one side, sweep curves are zero"
        );
        return curves;
    }

    // The point at tolerance 1 is copied from its neighbour below.
    let last = curves.len() - 1;
    let grid = &curves.tolerances[..last];

    for (truth, pred) in matching.pred_pairs() {
        for (k, &t) in grid.iter().enumerate() {
            if is_matched(truth, pred, t, 0.0) {
                curves.precision_tp[k] += 1.0;
            }
            if is_matched(truth, pred, 0.0, t) {
                curves.precision_tr[k] += 1.0;
            }
        }
    }
    for (truth, pred) in matching.true_pairs() {
        for (k, &t) in grid.iter().enumerate() {
            if is_matched(truth, pred, t, 0.0) {
                curves.recall_tp[k] += 1.0;
            }
            if is_matched(truth, pred, 0.0, t) {
                curves.recall_tr[k] += 1.0;
            }
        }
    }

    let pred_count = matching.pred_units.len() as f64;
    let true_count = matching.true_units.len() as f64;
    for (curve, count) in [
        (&mut curves.precision_tp, pred_count),
        (&mut curves.precision_tr, pred_count),
        (&mut curves.recall_tp, true_count),
        (&mut curves.recall_tr, true_count),
    ] {
        for value in curve[..last].iter_mut() {
            *value /= count;
        }
        curve[last] = curve[last - 1];
    }

    for k in 0..curves.len() {
        curves.f1_tp[k] = harmonic_f1(curves.precision_tp[k], curves.recall_tp[k]);
        curves.f1_tr[k] = harmonic_f1(curves.precision_tr[k], curves.recall_tr[k]);
    }

    curves
}

/// Integrals of the two F1 curves over tolerance in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegralSummary {
    /// Integral of F1*(tp, 0)
    pub ip: f64,
    /// Integral of F1*(0, tr)
    pub ir: f64,
    /// Mean of `ip` and `ir`
    pub average: f64,
}

impl IntegralSummary {
    fn new(ip: f64, ir: f64) -> Self {
        Self {
            ip,
            ir,
            average: 0.5 * (ip + ir),
        }
    }
}

/// Trapezoidal integrals of two curves sampled on the grid for `step`.
///
/// Both curves must have exactly one value per grid point.
pub fn integral_values(f_tp: &[f64], f_tr: &[f64], step: f64) -> Result<IntegralSummary> {
    let intervals = grid_intervals(step)?;
    ensure_same_len(intervals + 1, f_tp.len())?;
    ensure_same_len(intervals + 1, f_tr.len())?;

    Ok(IntegralSummary::new(
        trapezoid(f_tp, step, intervals),
        trapezoid(f_tr, step, intervals),
    ))
}

/// Trapezoidal rule on the clamped grid; the last interval is shorter when
/// `step` does not divide 1.
fn trapezoid(values: &[f64], step: f64, intervals: usize) -> f64 {
    if intervals == 0 || values.len() < intervals + 1 {
        return 0.0;
    }

    let full = if (intervals as f64 * step - 1.0).abs() < GRID_EPSILON {
        intervals
    } else {
        intervals - 1
    };

    let midpoint = |i: usize| 0.5 * (values[i] + values[i + 1]);
    let sum: f64 = (0..full).map(midpoint).sum();
    let mut integral = sum * step;

    if full < intervals {
        integral += midpoint(full) * (1.0 - full as f64 * step);
    }
    integral
}

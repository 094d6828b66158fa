//! Window / offset precision and recall on unit starts
//!
//! The older scoring scheme: only the frames where units begin matter. A
//! predicted start is correct when an annotated start lies within a fixed
//! half-window of it. Class labels are not compared.

use super::{MatchCounts, PrfScores};
use crate::error::Result;
use crate::labels::{canonical_pair, Labels};
use crate::units::unit_starts;

/// Window-based precision, recall and F1 of unit starts.
///
/// Predicted starts are taken in order; each claims the closest annotated
/// start not yet claimed whose distance is at most `threshold` frames,
/// preferring the earlier one on ties. Unclaimed predicted starts are false
/// positives, unclaimed annotated starts false negatives.
pub fn window_prf1(truth: &Labels<'_>, pred: &Labels<'_>, threshold: usize) -> Result<PrfScores> {
    let (truth, pred) = canonical_pair(truth, pred)?;
    let counts = match_starts(&unit_starts(truth.as_slice()), &unit_starts(pred.as_slice()), threshold);
    Ok(PrfScores::from_counts(counts))
}

/// One-to-one matching of sorted start positions within `threshold`.
pub fn match_starts(true_starts: &[usize], pred_starts: &[usize], threshold: usize) -> MatchCounts {
    let mut claimed = vec![false; true_starts.len()];
    let mut matched = 0;

    for &pred in pred_starts {
        let lo = pred.saturating_sub(threshold);
        let hi = pred.saturating_add(threshold);
        let first = true_starts.partition_point(|&start| start < lo);

        let mut best: Option<(usize, usize)> = None;
        for (idx, &start) in true_starts.iter().enumerate().skip(first) {
            if start > hi {
                break;
            }
            if claimed[idx] {
                continue;
            }
            let distance = start.abs_diff(pred);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((idx, distance));
            }
        }

        if let Some((idx, _)) = best {
            claimed[idx] = true;
            matched += 1;
        }
    }

    MatchCounts {
        true_positives: matched,
        false_positives: pred_starts.len() - matched,
        false_negatives: true_starts.len() - matched,
    }
}

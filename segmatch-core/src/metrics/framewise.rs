//! Framewise metrics
//!
//! These compare the canonical label of each time step and ignore interval
//! structure entirely.

use super::{ratio, MatchCounts, PrfScores};
use crate::error::{ensure_same_len, Result, ScoreError};
use crate::labels::{canonical_pair, Labels, BACKGROUND};
use std::collections::BTreeMap;

/// Fraction of time steps where annotation and prediction agree.
///
/// `idx_not_separation` keeps only frames marked `true`, dropping separator
/// frames inserted between concatenated sequences. No kept frames gives 0.
pub fn framewise_accuracy(
    truth: &Labels<'_>,
    pred: &Labels<'_>,
    idx_not_separation: Option<&[bool]>,
) -> Result<f64> {
    let (truth, pred) = canonical_pair(truth, pred)?;
    let frames = kept_frames(truth.as_slice(), pred.as_slice(), idx_not_separation)?;

    let mut kept = 0;
    let mut correct = 0;
    for (t, p) in frames {
        kept += 1;
        if t == p {
            correct += 1;
        }
    }

    Ok(ratio(correct, kept))
}

/// Accuracy of one non-background class over its true frames
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassAccuracy {
    /// Class label
    pub class_label: usize,
    /// Number of annotated frames of this class
    pub frames: usize,
    /// Number of those frames predicted as this class
    pub correct: usize,
    /// `correct / frames`
    pub accuracy: f64,
}

/// Per-class accuracy over non-background classes present in the annotation.
///
/// A class never annotated has no frames to be accurate on and is left out.
pub fn per_class_accuracy(
    truth: &Labels<'_>,
    pred: &Labels<'_>,
    idx_not_separation: Option<&[bool]>,
) -> Result<Vec<ClassAccuracy>> {
    let (truth, pred) = canonical_pair(truth, pred)?;
    let frames = kept_frames(truth.as_slice(), pred.as_slice(), idx_not_separation)?;

    let mut counts: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for (t, p) in frames {
        if t == BACKGROUND {
            continue;
        }
        let entry = counts.entry(t).or_default();
        entry.0 += 1;
        if t == p {
            entry.1 += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|(class_label, (frames, correct))| ClassAccuracy {
            class_label,
            frames,
            correct,
            accuracy: ratio(correct, frames),
        })
        .collect())
}

/// Class-weighted accuracy over non-background classes.
///
/// Each class contributes its accuracy weighted by its annotated frame
/// count. Classes with no annotated frames are excluded from both sides of
/// the average.
pub fn weighted_accuracy(
    truth: &Labels<'_>,
    pred: &Labels<'_>,
    idx_not_separation: Option<&[bool]>,
) -> Result<f64> {
    let classes = per_class_accuracy(truth, pred, idx_not_separation)?;
    Ok(weighted_from_classes(&classes))
}

/// Class-weighted accuracy from an existing per-class breakdown
pub fn weighted_from_classes(classes: &[ClassAccuracy]) -> f64 {
    let frames: usize = classes.iter().map(|c| c.frames).sum();
    let weighted: f64 = classes
        .iter()
        .map(|c| c.frames as f64 * c.accuracy)
        .sum();

    if frames == 0 {
        tracing::debug!("no annotated foreground frames, weighted accuracy is 0");
        return 0.0;
    }
    weighted / frames as f64
}

/// Confusion counts for binary framewise labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryConfusion {
    /// Annotated 1, predicted 1
    pub true_positives: usize,
    /// Annotated 0, predicted 1
    pub false_positives: usize,
    /// Annotated 0, predicted 0
    pub true_negatives: usize,
    /// Annotated 1, predicted 0
    pub false_negatives: usize,
}

impl BinaryConfusion {
    /// Precision, recall and F1 of the positive class
    pub fn scores(&self) -> PrfScores {
        PrfScores::from_counts(MatchCounts {
            true_positives: self.true_positives,
            false_positives: self.false_positives,
            false_negatives: self.false_negatives,
        })
    }
}

/// Count binary confusion cells, rejecting anything that is not binary.
///
/// Categorical inputs may have at most two columns and every canonical label
/// must be 0 or 1.
pub fn binary_confusion(truth: &Labels<'_>, pred: &Labels<'_>) -> Result<BinaryConfusion> {
    let (truth_seq, pred_seq) = canonical_pair(truth, pred)?;

    for (side, columns) in [
        ("annotation", truth.num_columns()),
        ("prediction", pred.num_columns()),
    ] {
        if let Some(columns) = columns {
            if columns > 2 {
                return Err(ScoreError::representation(format!(
                    "binary data required (2 classes), {side} has {columns} columns"
                )));
            }
        }
    }
    for (side, seq) in [("annotation", &truth_seq), ("prediction", &pred_seq)] {
        if let Some(max) = seq.max_label() {
            if max > 1 {
                return Err(ScoreError::representation(format!(
                    "binary data required, {side} contains label {max}"
                )));
            }
        }
    }

    let mut confusion = BinaryConfusion::default();
    for (&t, &p) in truth_seq.as_slice().iter().zip(pred_seq.as_slice()) {
        match (t, p) {
            (1, 1) => confusion.true_positives += 1,
            (0, 1) => confusion.false_positives += 1,
            (0, 0) => confusion.true_negatives += 1,
            _ => confusion.false_negatives += 1,
        }
    }
    Ok(confusion)
}

/// Framewise precision, recall and F1 for binary labels
pub fn framewise_prf1(truth: &Labels<'_>, pred: &Labels<'_>) -> Result<PrfScores> {
    Ok(binary_confusion(truth, pred)?.scores())
}

/// Framewise precision, recall and F1 for multi-class labels.
///
/// Precision is the share of predicted-foreground frames carrying the
/// annotated label; recall is the share of annotated-foreground frames
/// predicted with their label.
pub fn framewise_prf1_multiclass(truth: &Labels<'_>, pred: &Labels<'_>) -> Result<PrfScores> {
    let (truth, pred) = canonical_pair(truth, pred)?;

    let mut predicted = 0;
    let mut annotated = 0;
    let mut hits = 0;
    for (&t, &p) in truth.as_slice().iter().zip(pred.as_slice()) {
        if p != BACKGROUND {
            predicted += 1;
        }
        if t != BACKGROUND {
            annotated += 1;
            if t == p {
                hits += 1;
            }
        }
    }

    Ok(PrfScores::from_counts(MatchCounts {
        true_positives: hits,
        false_positives: predicted - hits,
        false_negatives: annotated - hits,
    }))
}

fn kept_frames<'s>(
    truth: &'s [usize],
    pred: &'s [usize],
    mask: Option<&'s [bool]>,
) -> Result<impl Iterator<Item = (usize, usize)> + 's> {
    if let Some(mask) = mask {
        ensure_same_len(truth.len(), mask.len())?;
    }

    Ok(truth
        .iter()
        .zip(pred)
        .enumerate()
        .filter(move |(idx, _)| mask.map_or(true, |mask| mask[*idx]))
        .map(|(_, (&t, &p))| (t, p)))
}

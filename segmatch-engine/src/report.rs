//! Per-sequence and batch reports

use crate::{error::Result, executor::ExecutionMode};
use segmatch_core::{ClassAccuracy, IntegralSummary, PrfScores, SweepCurves};
use serde::Serialize;

/// Every score computed for one annotation/prediction pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceReport {
    /// Sequence name
    pub name: String,
    /// Number of time steps
    pub frames: usize,
    /// Number of annotated units
    pub true_units: usize,
    /// Number of predicted units
    pub pred_units: usize,
    /// Framewise accuracy over unmasked frames
    pub accuracy: f64,
    /// Class-weighted accuracy over unmasked frames
    pub weighted_accuracy: f64,
    /// Accuracy of each annotated non-background class
    pub per_class: Vec<ClassAccuracy>,
    /// Binary framewise P/R/F1, when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framewise_binary: Option<PrfScores>,
    /// Framewise P/R/F1 over foreground frames
    pub framewise: PrfScores,
    /// Thresholded unit P/R/F1
    pub unit: PrfScores,
    /// Boundary-margin unit P/R/F1
    pub boundary_margin: PrfScores,
    /// Midpoint-margin unit P/R/F1
    pub midpoint_margin: PrfScores,
    /// Start-offset window P/R/F1
    pub window: PrfScores,
    /// Integrals of the sweep curves
    pub sweep: IntegralSummary,
    /// The sweep curves themselves
    pub curves: SweepCurves,
}

/// Macro-average of every scalar across a batch
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BatchSummary {
    /// Number of sequences averaged
    pub sequences: usize,
    /// Mean framewise accuracy
    pub accuracy: f64,
    /// Mean class-weighted accuracy
    pub weighted_accuracy: f64,
    /// Mean binary framewise scores, when every sequence has them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framewise_binary: Option<PrfScores>,
    /// Mean framewise scores
    pub framewise: PrfScores,
    /// Mean thresholded unit scores
    pub unit: PrfScores,
    /// Mean boundary-margin scores
    pub boundary_margin: PrfScores,
    /// Mean midpoint-margin scores
    pub midpoint_margin: PrfScores,
    /// Mean window scores
    pub window: PrfScores,
    /// Mean sweep integrals
    pub sweep: IntegralSummary,
}

impl BatchSummary {
    /// Average the scalars of `reports`. An empty batch gives all zeros.
    pub fn from_reports(reports: &[SequenceReport]) -> Self {
        if reports.is_empty() {
            return Self::default();
        }

        let framewise_binary = if reports.iter().all(|r| r.framewise_binary.is_some()) {
            Some(mean_scores(reports, |r| r.framewise_binary.unwrap_or_default()))
        } else {
            None
        };

        Self {
            sequences: reports.len(),
            accuracy: mean(reports, |r| r.accuracy),
            weighted_accuracy: mean(reports, |r| r.weighted_accuracy),
            framewise_binary,
            framewise: mean_scores(reports, |r| r.framewise),
            unit: mean_scores(reports, |r| r.unit),
            boundary_margin: mean_scores(reports, |r| r.boundary_margin),
            midpoint_margin: mean_scores(reports, |r| r.midpoint_margin),
            window: mean_scores(reports, |r| r.window),
            sweep: IntegralSummary {
                ip: mean(reports, |r| r.sweep.ip),
                ir: mean(reports, |r| r.sweep.ir),
                average: mean(reports, |r| r.sweep.average),
            },
        }
    }
}

fn mean(reports: &[SequenceReport], value: impl Fn(&SequenceReport) -> f64) -> f64 {
    reports.iter().map(value).sum::<f64>() / reports.len() as f64
}

// Fieldwise means; the mean F1 is not recomputed from the mean P and R.
fn mean_scores(reports: &[SequenceReport], scores: impl Fn(&SequenceReport) -> PrfScores) -> PrfScores {
    PrfScores {
        precision: mean(reports, |r| scores(r).precision),
        recall: mean(reports, |r| scores(r).recall),
        f1: mean(reports, |r| scores(r).f1),
    }
}

/// Reports for a whole batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Execution mode the batch actually ran with
    pub mode_used: ExecutionMode,
    /// Per-sequence reports in input order
    pub sequences: Vec<SequenceReport>,
    /// Macro-average over `sequences`
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Assemble a report and its summary
    pub fn new(mode_used: ExecutionMode, sequences: Vec<SequenceReport>) -> Self {
        let summary = BatchSummary::from_reports(&sequences);
        Self {
            mode_used,
            sequences,
            summary,
        }
    }

    /// Look up a sequence report by name
    pub fn get(&self, name: &str) -> Option<&SequenceReport> {
        self.sequences.iter().find(|r| r.name == name)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

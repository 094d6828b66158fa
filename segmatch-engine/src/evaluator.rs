//! Sequence and batch evaluation

use crate::{
    config::EvalConfig,
    error::{EngineError, Result},
    executor::{auto_select, ExecutionMode, Executor, SequentialExecutor},
    report::{BatchReport, SequenceReport},
};
use segmatch_core::{
    canonical_pair, framewise_accuracy, framewise_prf1, framewise_prf1_multiclass,
    margin_prf1_units, per_class_accuracy, prf_star_matched, unit_prf1_matched,
    weighted_from_classes, window_prf1, Labels, MarginPolicy, UnitMatching,
};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use crate::executor::ParallelExecutor;

/// One named annotation/prediction pair
#[derive(Debug, Clone)]
pub struct SequencePair<'a> {
    /// Name used in reports and errors
    pub name: String,
    /// Ground-truth labels
    pub truth: Labels<'a>,
    /// Predicted labels
    pub pred: Labels<'a>,
    /// Frames to keep in framewise accuracy (`false` = separator)
    pub mask: Option<&'a [bool]>,
}

impl<'a> SequencePair<'a> {
    /// Create an unmasked pair
    pub fn new(name: impl Into<String>, truth: Labels<'a>, pred: Labels<'a>) -> Self {
        Self {
            name: name.into(),
            truth,
            pred,
            mask: None,
        }
    }

    /// Attach a separator mask
    pub fn with_mask(mut self, mask: &'a [bool]) -> Self {
        self.mask = Some(mask);
        self
    }
}

/// Scores sequence pairs under one [`EvalConfig`]
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Create an evaluator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with a validated configuration
    pub fn with_config(config: EvalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run every metric on one pair.
    ///
    /// Scoring errors come back as [`EngineError::Sequence`] carrying the
    /// pair's name.
    pub fn evaluate(&self, pair: &SequencePair<'_>) -> Result<SequenceReport> {
        self.score(pair)
            .map_err(|err| EngineError::in_sequence(pair.name.clone(), err))
    }

    fn score(&self, pair: &SequencePair<'_>) -> segmatch_core::Result<SequenceReport> {
        let config = &self.config;
        let (truth, pred) = canonical_pair(&pair.truth, &pair.pred)?;
        let truth_view = Labels::classes(truth.as_slice());
        let pred_view = Labels::classes(pred.as_slice());

        let framewise_binary = if config.binary {
            Some(framewise_prf1(&pair.truth, &pair.pred)?)
        } else {
            None
        };

        let per_class = per_class_accuracy(&truth_view, &pred_view, pair.mask)?;
        let matching = UnitMatching::new(&truth, &pred);
        let curves = prf_star_matched(&matching, config.step)?;
        let sweep = curves.integrals();

        let report = SequenceReport {
            name: pair.name.clone(),
            frames: truth.len(),
            true_units: matching.true_units.len(),
            pred_units: matching.pred_units.len(),
            accuracy: framewise_accuracy(&truth_view, &pred_view, pair.mask)?,
            weighted_accuracy: weighted_from_classes(&per_class),
            per_class,
            framewise_binary,
            framewise: framewise_prf1_multiclass(&truth_view, &pred_view)?,
            unit: unit_prf1_matched(&matching, config.tp, config.tr),
            boundary_margin: margin_prf1_units(
                &matching.true_units,
                &matching.pred_units,
                config.boundary_margin,
                MarginPolicy::Boundary,
            ),
            midpoint_margin: margin_prf1_units(
                &matching.true_units,
                &matching.pred_units,
                config.midpoint_margin,
                MarginPolicy::Midpoint,
            ),
            window: window_prf1(&truth_view, &pred_view, config.window_threshold)?,
            sweep,
            curves,
        };

        debug!(
            sequence = %pair.name,
            frames = report.frames,
            true_units = report.true_units,
            pred_units = report.pred_units,
            average_integral = report.sweep.average,
            "sequence scored"
        );
        Ok(report)
    }

    /// Mode a batch of `sequence_count` pairs will run with
    pub fn select_mode(&self, sequence_count: usize) -> ExecutionMode {
        match self.config.execution_mode {
            ExecutionMode::Adaptive => auto_select(sequence_count, self.config.parallel_threshold),
            #[cfg(not(feature = "parallel"))]
            ExecutionMode::Parallel => ExecutionMode::Sequential,
            mode => mode,
        }
    }

    /// Score a batch with the configured execution mode
    pub fn evaluate_batch(&self, pairs: &[SequencePair<'_>]) -> Result<BatchReport> {
        let mode = self.select_mode(pairs.len());
        self.evaluate_batch_with_mode(pairs, mode)
    }

    /// Score a batch with an explicit execution mode
    pub fn evaluate_batch_with_mode(
        &self,
        pairs: &[SequencePair<'_>],
        mode: ExecutionMode,
    ) -> Result<BatchReport> {
        let mode = match mode {
            ExecutionMode::Adaptive => auto_select(pairs.len(), self.config.parallel_threshold),
            mode => mode,
        };

        info!(sequences = pairs.len(), ?mode, "evaluating batch");

        let result = match mode {
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => {
                self.run(&ParallelExecutor::new(self.config.threads), pairs)
            }
            _ => self.run(&SequentialExecutor, pairs),
        };

        let report = result.inspect_err(|err| warn!(error = %err, "batch evaluation aborted"))?;
        info!(
            sequences = report.sequences.len(),
            mode = ?report.mode_used,
            average_integral = report.summary.sweep.average,
            "batch evaluated"
        );
        Ok(report)
    }

    fn run<E: Executor>(&self, executor: &E, pairs: &[SequencePair<'_>]) -> Result<BatchReport> {
        let reports = executor.execute(self, pairs)?;
        Ok(BatchReport::new(executor.mode(), reports))
    }
}

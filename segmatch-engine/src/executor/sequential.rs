//! Sequential execution strategy

use crate::{
    error::Result,
    evaluator::{Evaluator, SequencePair},
    executor::{ExecutionMode, Executor},
    report::SequenceReport,
};

/// Sequential single-threaded executor
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn execute(
        &self,
        evaluator: &Evaluator,
        pairs: &[SequencePair<'_>],
    ) -> Result<Vec<SequenceReport>> {
        pairs.iter().map(|pair| evaluator.evaluate(pair)).collect()
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}

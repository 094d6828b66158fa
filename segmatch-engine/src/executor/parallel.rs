//! Parallel execution strategy

use crate::{
    error::{EngineError, Result},
    evaluator::{Evaluator, SequencePair},
    executor::{ExecutionMode, Executor},
    report::SequenceReport,
};
use rayon::prelude::*;

/// Parallel multi-threaded executor, one task per sequence
#[derive(Debug, Clone, Default)]
pub struct ParallelExecutor {
    threads: Option<usize>,
}

impl ParallelExecutor {
    /// Create a new parallel executor (None = one thread per core)
    pub fn new(threads: Option<usize>) -> Self {
        Self { threads }
    }

    /// Worker count the pool is built with
    pub fn num_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

impl Executor for ParallelExecutor {
    fn execute(
        &self,
        evaluator: &Evaluator,
        pairs: &[SequencePair<'_>],
    ) -> Result<Vec<SequenceReport>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads())
            .build()
            .map_err(|e| EngineError::ParallelError(e.to_string()))?;

        // Indexed collect keeps input order
        pool.install(|| {
            pairs
                .par_iter()
                .map(|pair| evaluator.evaluate(pair))
                .collect::<Result<Vec<_>>>()
        })
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
    }
}

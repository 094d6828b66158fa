//! Execution strategies for batch evaluation

use crate::{error::Result, evaluator::Evaluator, evaluator::SequencePair, report::SequenceReport};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequential;

// Re-export executors
#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Score sequences one after another on the calling thread
    Sequential,
    /// Score sequences concurrently on a rayon pool
    Parallel,
    /// Pick one of the above from the batch size
    Adaptive,
}

/// Trait for execution strategies
pub trait Executor: Send + Sync {
    /// Score every pair, returning reports in input order.
    ///
    /// A failing sequence aborts the batch with its error.
    fn execute(
        &self,
        evaluator: &Evaluator,
        pairs: &[SequencePair<'_>],
    ) -> Result<Vec<SequenceReport>>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Automatically select execution mode based on batch size
pub fn auto_select(sequence_count: usize, threshold: usize) -> ExecutionMode {
    if sequence_count < 2 || sequence_count < threshold {
        // A single sequence has nothing to run alongside
        ExecutionMode::Sequential
    } else {
        #[cfg(feature = "parallel")]
        return ExecutionMode::Parallel;

        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Sequential
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_select() {
        assert_eq!(auto_select(0, 0), ExecutionMode::Sequential);
        assert_eq!(auto_select(1, 0), ExecutionMode::Sequential);
        assert_eq!(auto_select(7, 8), ExecutionMode::Sequential);

        #[cfg(feature = "parallel")]
        assert_eq!(auto_select(8, 8), ExecutionMode::Parallel);
        #[cfg(not(feature = "parallel"))]
        assert_eq!(auto_select(8, 8), ExecutionMode::Sequential);
    }
}

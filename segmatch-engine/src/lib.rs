//! Batch orchestration for segmentation scoring
//!
//! This crate runs every `segmatch-core` metric over named sequence pairs
//! under one configuration, sequentially or on a rayon pool, and collects
//! the results into serializable reports.
//!
//! ```rust
//! use segmatch_engine::{Evaluator, Labels, SequencePair};
//!
//! let truth = [0, 1, 1, 1, 0, 2, 2, 0];
//! let pred = [0, 1, 1, 0, 0, 2, 2, 2];
//! let pairs = [SequencePair::new("clip_01", Labels::classes(&truth), Labels::classes(&pred))];
//!
//! let report = Evaluator::new().evaluate_batch(&pairs).unwrap();
//! assert_eq!(report.summary.unit.f1, 1.0);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod report;

// Re-export key types
pub use config::{EvalConfig, EvalConfigBuilder};
pub use error::{EngineError, Result};
pub use evaluator::{Evaluator, SequencePair};
pub use executor::{ExecutionMode, Executor};
pub use report::{BatchReport, BatchSummary, SequenceReport};

// Re-export from core for convenience
pub use segmatch_core::{Labels, MarginPolicy, PrfScores, ScoreError};

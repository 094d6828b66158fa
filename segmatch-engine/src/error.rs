//! Engine error types
//!
//! Scoring errors from `segmatch-core` are wrapped rather than flattened, so a
//! caller can still match on the concrete [`ScoreError`] variant.

use segmatch_core::ScoreError;
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scoring error outside any named sequence
    #[error("scoring error: {0}")]
    Score(#[from] ScoreError),

    /// Scoring error for one sequence of a batch
    #[error("sequence '{name}' failed: {source}")]
    Sequence {
        /// Name of the sequence that failed
        name: String,
        /// The underlying scoring error
        #[source]
        source: ScoreError,
    },

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Parallel execution error
    #[cfg(feature = "parallel")]
    #[error("parallel execution failed: {0}")]
    ParallelError(String),

    /// Report serialization error
    #[error("serialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

impl EngineError {
    /// Tag a scoring error with the sequence it came from
    pub fn in_sequence(name: impl Into<String>, source: ScoreError) -> Self {
        EngineError::Sequence {
            name: name.into(),
            source,
        }
    }

    /// The scoring error behind this error, if any
    pub fn score_error(&self) -> Option<&ScoreError> {
        match self {
            EngineError::Score(err) | EngineError::Sequence { source: err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

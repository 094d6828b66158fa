//! Evaluation configuration

use crate::{
    error::{EngineError, Result},
    executor::ExecutionMode,
};
use segmatch_core::MIN_STEP;
use serde::{Deserialize, Serialize};

/// Scoring parameters and execution settings for an [`Evaluator`](crate::Evaluator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Tolerance sweep step
    pub step: f64,
    /// Precision threshold for thresholded unit P/R/F1
    pub tp: f64,
    /// Recall threshold for thresholded unit P/R/F1
    pub tr: f64,
    /// Margin in frames for boundary-margin P/R/F1
    pub boundary_margin: f64,
    /// Margin in frames for midpoint-margin P/R/F1
    pub midpoint_margin: f64,
    /// Half-window in frames for start-offset P/R/F1
    pub window_threshold: usize,
    /// Also compute binary framewise P/R/F1
    pub binary: bool,
    /// Execution mode selector
    pub execution_mode: ExecutionMode,
    /// Number of threads for parallel execution (None = auto)
    pub threads: Option<usize>,
    /// Minimum batch size for adaptive mode to go parallel
    pub parallel_threshold: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            step: 0.01,
            tp: 0.5,
            tr: 0.5,
            boundary_margin: 0.0,
            midpoint_margin: 5.0,
            window_threshold: 5,
            binary: false,
            execution_mode: ExecutionMode::Adaptive,
            threads: None,
            parallel_threshold: 8,
        }
    }
}

impl EvalConfig {
    /// Tight thresholds and margins
    pub fn strict() -> Self {
        Self {
            tp: 0.7,
            tr: 0.7,
            midpoint_margin: 2.0,
            window_threshold: 2,
            ..Default::default()
        }
    }

    /// Loose thresholds and wide margins
    pub fn lenient() -> Self {
        Self {
            tp: 0.3,
            tr: 0.3,
            boundary_margin: 5.0,
            midpoint_margin: 10.0,
            window_threshold: 10,
            ..Default::default()
        }
    }

    /// Create a builder starting from the defaults
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::new()
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use segmatch_engine::{EvalConfig, ExecutionMode};
    ///
    /// let config = EvalConfig::from_toml_str(r#"
    ///     step = 0.05
    ///     execution_mode = "sequential"
    /// "#).unwrap();
    /// assert_eq!(config.step, 0.05);
    /// assert_eq!(config.execution_mode, ExecutionMode::Sequential);
    /// assert_eq!(config.tp, 0.5);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step >= MIN_STEP && self.step <= 1.0) {
            return Err(EngineError::ConfigError(format!(
                "step must be in [{MIN_STEP}, 1], got {}",
                self.step
            )));
        }

        for (name, value) in [("tp", self.tp), ("tr", self.tr)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::ConfigError(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        for (name, value) in [
            ("boundary_margin", self.boundary_margin),
            ("midpoint_margin", self.midpoint_margin),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::ConfigError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.threads == Some(0) {
            return Err(EngineError::ConfigError(
                "thread count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`EvalConfig`]
#[derive(Debug, Clone, Default)]
pub struct EvalConfigBuilder {
    config: EvalConfig,
}

impl EvalConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep step
    pub fn step(mut self, step: f64) -> Self {
        self.config.step = step;
        self
    }

    /// Set both unit thresholds
    pub fn thresholds(mut self, tp: f64, tr: f64) -> Self {
        self.config.tp = tp;
        self.config.tr = tr;
        self
    }

    /// Set the boundary margin
    pub fn boundary_margin(mut self, margin: f64) -> Self {
        self.config.boundary_margin = margin;
        self
    }

    /// Set the midpoint margin
    pub fn midpoint_margin(mut self, margin: f64) -> Self {
        self.config.midpoint_margin = margin;
        self
    }

    /// Set the start-offset half-window
    pub fn window_threshold(mut self, threshold: usize) -> Self {
        self.config.window_threshold = threshold;
        self
    }

    /// Enable binary framewise P/R/F1
    pub fn binary(mut self, binary: bool) -> Self {
        self.config.binary = binary;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Set the thread count
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.config.threads = threads;
        self
    }

    /// Set the adaptive parallel threshold
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_threshold = threshold;
        self
    }

    /// Builds the configuration, validating parameters
    pub fn build(self) -> Result<EvalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Builds the configuration without validation (for testing)
    pub fn build_unchecked(self) -> EvalConfig {
        self.config
    }
}

//! Error types for the colony engine.
//!
//! Configuration and problem-shape errors are raised before any round
//! runs. An [`AcoError::InvariantViolation`] aborts the run that hit it.

use thiserror::Error;

/// Unified error type for configuration, problem loading and execution.
#[derive(Debug, Error)]
pub enum AcoError {
    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the rejected parameter.
        message: String,
    },

    /// Pheromone update policy name not in the supported set.
    #[error("unsupported update policy '{0}' (expected density, quantity, cycle or constant)")]
    UnknownPolicy(String),

    /// City positions or distance matrix rejected at load time.
    #[error("invalid problem: {message}")]
    InvalidProblem {
        /// What is wrong with the supplied data.
        message: String,
    },

    /// A run was requested before any problem was loaded.
    #[error("no problem loaded; call load_problem first")]
    ProblemNotLoaded,

    // ===== Execution Errors =====
    /// Pheromone or distance state is corrupted (e.g. every candidate has
    /// zero desirability).
    #[error("invariant violation: {message}")]
    InvariantViolation {
        /// Where the violation was detected.
        message: String,
    },

    /// The per-round worker pool could not be started.
    #[cfg(feature = "parallel")]
    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    // ===== I/O Errors =====
    /// Malformed line in a city file.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AcoError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid-problem error with a message.
    #[must_use]
    pub fn invalid_problem(message: impl Into<String>) -> Self {
        Self::InvalidProblem {
            message: message.into(),
        }
    }

    /// Create an invariant-violation error with a message.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Returns true for errors raised at setup, before any round executes.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::UnknownPolicy(_) | Self::InvalidProblem { .. }
        )
    }
}

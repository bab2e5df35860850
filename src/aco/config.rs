//! ACO configuration.
//!
//! [`AcoConfig`] holds every parameter that controls the colony loop.

use crate::error::AcoError;

/// Configuration for the Ant Colony Optimization engine.
///
/// # Defaults
///
/// ```
/// use aco_tsp::aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.ant_count, 100);
/// assert_eq!(config.max_iterations, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use aco_tsp::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ant_count(50)
///     .with_alpha(1.0)
///     .with_beta(5.0)
///     .with_rho(0.5)
///     .with_q(50.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of ants constructing a tour in every round.
    pub ant_count: usize,

    /// Pheromone weighting exponent.
    pub alpha: f64,

    /// Heuristic (reciprocal distance) weighting exponent.
    pub beta: f64,

    /// Evaporation rate in `[0, 1)`: fraction of pheromone lost each round.
    pub rho: f64,

    /// Reinforcement scale. Must be positive.
    pub q: f64,

    /// Number of rounds to run.
    pub max_iterations: usize,

    /// Worker threads for the parallel strategy. Ignored by the serial one.
    pub worker_count: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ant_count: 100,
            alpha: 1.0,
            beta: 2.0,
            rho: 0.1,
            q: 1.0,
            max_iterations: 200,
            worker_count: 10,
            seed: None,
        }
    }
}

impl AcoConfig {
    /// Sets the number of ants per round.
    pub fn with_ant_count(mut self, n: usize) -> Self {
        self.ant_count = n;
        self
    }

    /// Sets the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the heuristic exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Sets the reinforcement scale.
    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Sets the number of rounds.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the worker count used by the parallel strategy.
    pub fn with_worker_count(mut self, n: usize) -> Self {
        self.worker_count = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AcoError> {
        if self.ant_count == 0 {
            return Err(AcoError::config("ant_count must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(AcoError::config("max_iterations must be positive"));
        }
        if self.worker_count == 0 {
            return Err(AcoError::config("worker_count must be positive"));
        }
        if !self.alpha.is_finite() || !self.beta.is_finite() {
            return Err(AcoError::config(format!(
                "alpha and beta must be finite, got alpha={} beta={}",
                self.alpha, self.beta
            )));
        }
        if !(0.0..1.0).contains(&self.rho) {
            return Err(AcoError::config(format!(
                "rho must be in [0, 1), got {}",
                self.rho
            )));
        }
        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(AcoError::config(format!(
                "q must be positive, got {}",
                self.q
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AcoConfig::default();
        assert_eq!(config.ant_count, 100);
        assert!((config.alpha - 1.0).abs() < 1e-10);
        assert!((config.beta - 2.0).abs() < 1e-10);
        assert!((config.rho - 0.1).abs() < 1e-10);
        assert!((config.q - 1.0).abs() < 1e-10);
        assert_eq!(config.worker_count, 10);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(AcoConfig::default().validate().is_ok());
        assert!(AcoConfig::default().with_rho(0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_ants() {
        let config = AcoConfig::default().with_ant_count(0);
        assert!(matches!(config.validate(), Err(AcoError::Config { .. })));
    }

    #[test]
    fn test_validate_zero_iterations() {
        let config = AcoConfig::default().with_max_iterations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_workers() {
        let config = AcoConfig::default().with_worker_count(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rho_bounds() {
        assert!(AcoConfig::default().with_rho(1.0).validate().is_err());
        assert!(AcoConfig::default().with_rho(-0.1).validate().is_err());
        assert!(AcoConfig::default().with_rho(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_q_positive() {
        assert!(AcoConfig::default().with_q(0.0).validate().is_err());
        assert!(AcoConfig::default().with_q(-5.0).validate().is_err());
        assert!(AcoConfig::default().with_q(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_validate_exponents_finite() {
        assert!(AcoConfig::default().with_alpha(f64::NAN).validate().is_err());
        assert!(AcoConfig::default()
            .with_beta(f64::INFINITY)
            .validate()
            .is_err());
    }
}

//! Pheromone update policies.
//!
//! After every round, each ant deposits pheromone on every directed edge
//! it traversed, including the closing edge back to its start. The amount
//! per traversal depends on the policy:
//!
//! | Policy     | Increment                |
//! |------------|--------------------------|
//! | density    | `Q`                      |
//! | quantity   | `Q / d(u,v)`             |
//! | cycle      | `Q / L(k)`               |
//! | constant   | `d(u,v) * Q / L(k)`      |
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents" (ant-density, ant-quantity, ant-cycle)

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use crate::error::AcoError;

/// Reinforcement rule applied after every round.
///
/// # Examples
///
/// ```
/// use aco_tsp::aco::UpdatePolicy;
///
/// let policy: UpdatePolicy = "cycle".parse().unwrap();
/// assert_eq!(policy, UpdatePolicy::Cycle);
/// assert!("greedy".parse::<UpdatePolicy>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UpdatePolicy {
    /// Ant-density: constant `Q` per traversal.
    Density,

    /// Ant-quantity: `Q / d(u,v)` per traversal, favouring short edges.
    Quantity,

    /// Ant-cycle: `Q / L` per traversal, favouring short tours.
    Cycle,

    /// `d(u,v) * Q / L` per traversal: each ant deposits `Q` in total,
    /// split across its edges in proportion to their length.
    Constant,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        UpdatePolicy::Cycle
    }
}

impl UpdatePolicy {
    /// All supported policies.
    pub const ALL: [UpdatePolicy; 4] = [
        UpdatePolicy::Density,
        UpdatePolicy::Quantity,
        UpdatePolicy::Cycle,
        UpdatePolicy::Constant,
    ];

    /// Lowercase policy name.
    pub const fn name(self) -> &'static str {
        match self {
            UpdatePolicy::Density => "density",
            UpdatePolicy::Quantity => "quantity",
            UpdatePolicy::Cycle => "cycle",
            UpdatePolicy::Constant => "constant",
        }
    }

    /// Pheromone deposited for one traversal of an edge of length
    /// `edge_length` by an ant whose closed tour has length `tour_length`.
    #[inline]
    pub fn increment(self, q: f64, edge_length: f64, tour_length: f64) -> f64 {
        match self {
            UpdatePolicy::Density => q,
            UpdatePolicy::Quantity => q / edge_length,
            UpdatePolicy::Cycle => q / tour_length,
            UpdatePolicy::Constant => edge_length * q / tour_length,
        }
    }

    /// Builds the reinforcement matrix for one round.
    ///
    /// `tours` is the round's flat tour arena: `lengths.len()` consecutive
    /// tours of `n` cities each. Deposits are directed (`u -> v` only).
    pub fn reinforcement(
        self,
        distances: &Array2<f64>,
        tours: &[usize],
        lengths: &[f64],
        q: f64,
    ) -> Array2<f64> {
        let n = distances.nrows();
        let mut delta = Array2::zeros((n, n));
        if n == 0 {
            return delta;
        }

        for (tour, &length) in tours.chunks_exact(n).zip(lengths) {
            for (k, &from) in tour.iter().enumerate() {
                let to = tour[(k + 1) % n];
                let edge = distances[[from, to]];
                delta[[from, to]] += self.increment(q, edge, length);
            }
        }
        delta
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpdatePolicy {
    type Err = AcoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "density" => Ok(UpdatePolicy::Density),
            "quantity" => Ok(UpdatePolicy::Quantity),
            "cycle" => Ok(UpdatePolicy::Cycle),
            "constant" => Ok(UpdatePolicy::Constant),
            other => Err(AcoError::UnknownPolicy(other.to_string())),
        }
    }
}

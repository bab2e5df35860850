//! Colony state: the pheromone matrix and the best-so-far series.

use ndarray::Array2;

/// Lowest value any pheromone entry may take.
///
/// Unreinforced edges decay as `(1 - rho)^k` and would otherwise underflow
/// to `0.0` within a few hundred rounds when `rho` is close to 1.
pub(crate) const PHEROMONE_FLOOR: f64 = f64::MIN_POSITIVE;

/// Mutable `n x n` pheromone state, one evaporation/reinforcement step
/// per round.
///
/// Starts at all-ones. Entries never drop below [`PHEROMONE_FLOOR`], so
/// they stay strictly positive for any number of rounds.
#[derive(Debug, Clone)]
pub(crate) struct PheromoneMatrix {
    values: Array2<f64>,
}

impl PheromoneMatrix {
    /// All-ones matrix for `n` cities.
    pub(crate) fn new(n: usize) -> Self {
        Self {
            values: Array2::ones((n, n)),
        }
    }

    /// Read-only view shared with every ant of a round.
    pub(crate) fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// `P <- max((1 - rho) * P + delta, PHEROMONE_FLOOR)`, elementwise.
    pub(crate) fn evaporate_and_reinforce(&mut self, rho: f64, delta: &Array2<f64>) {
        let keep = 1.0 - rho;
        self.values.zip_mut_with(delta, |p, &reinforcement| {
            *p = (keep * *p + reinforcement).max(PHEROMONE_FLOOR)
        });
    }

    /// Smallest entry, used to check positivity.
    #[cfg(test)]
    pub(crate) fn min_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

/// Best tour and length seen up to and including each round.
///
/// One entry per round, append-only. Lengths are monotonically
/// non-increasing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestSeries {
    lengths: Vec<f64>,
    tours: Vec<Vec<usize>>,
}

impl BestSeries {
    pub(crate) fn with_capacity(rounds: usize) -> Self {
        Self {
            lengths: Vec::with_capacity(rounds),
            tours: Vec::with_capacity(rounds),
        }
    }

    /// Folds one round's best tour into the series.
    ///
    /// The previous best is carried forward only when the round is strictly
    /// worse. Equal lengths adopt the newer tour.
    pub(crate) fn record(&mut self, round_length: f64, round_tour: &[usize]) {
        match self.lengths.last().copied() {
            Some(previous) if round_length > previous => {
                let carried = self.tours[self.tours.len() - 1].clone();
                self.lengths.push(previous);
                self.tours.push(carried);
            }
            _ => {
                self.lengths.push(round_length);
                self.tours.push(round_tour.to_vec());
            }
        }
    }

    /// Best length per round.
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Best tour per round.
    pub fn tours(&self) -> &[Vec<usize>] {
        &self.tours
    }

    /// Number of recorded rounds.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Final entry: the best tour and length of the whole run.
    pub fn last(&self) -> Option<(&[usize], f64)> {
        self.tours
            .last()
            .zip(self.lengths.last())
            .map(|(tour, &length)| (tour.as_slice(), length))
    }
}

/// Length of `tour` closed into a cycle.
///
/// ```
/// use aco_tsp::aco::tour_length;
/// use ndarray::array;
///
/// let d = array![[0.0, 1.0, 2.0], [1.0, 0.0, 1.5], [2.0, 1.5, 0.0]];
/// assert!((tour_length(&d, &[0, 1, 2]) - 4.5).abs() < 1e-12);
/// ```
pub fn tour_length(distances: &Array2<f64>, tour: &[usize]) -> f64 {
    let n = tour.len();
    (0..n)
        .map(|k| distances[[tour[k], tour[(k + 1) % n]]])
        .sum()
}

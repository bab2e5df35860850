//! Colony execution loop.
//!
//! [`AntColony`] drives the rounds: start-city assignment, tour
//! construction for every ant (serially or on a worker pool), best-so-far
//! bookkeeping, then the pheromone update.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use super::config::AcoConfig;
use super::construct::{assign_start_cities, TourConstructor};
use super::policy::UpdatePolicy;
use super::types::{BestSeries, PheromoneMatrix};
use crate::error::AcoError;

/// How the ants of a round are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Execution {
    /// One thread builds every tour in ant order.
    Serial,

    /// A pool of `worker_count` threads builds the tours of a round.
    ///
    /// The pool is rebuilt every round; the controller waits for every ant
    /// before bookkeeping starts.
    Parallel,
}

/// Lifecycle of an [`AntColony`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColonyState {
    /// Configured, no problem loaded yet.
    Configured,
    /// Problem loaded, ready to run.
    Initialized,
    /// Executing the given zero-based round.
    RunningRound(usize),
    /// Last run finished all rounds.
    Completed,
}

/// Result of a colony run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// Best tour and length up to and including each round.
    pub best: BestSeries,

    /// Each round's own minimum tour length.
    pub round_minimums: Vec<f64>,

    /// Number of rounds executed.
    pub rounds: usize,

    /// Update policy used.
    pub policy: UpdatePolicy,

    /// Execution strategy used.
    pub execution: Execution,
}

impl AcoResult {
    /// Best tour of the run.
    pub fn best_tour(&self) -> &[usize] {
        self.best.last().map(|(tour, _)| tour).unwrap_or(&[])
    }

    /// Best tour length of the run.
    pub fn best_length(&self) -> f64 {
        self.best.last().map_or(f64::INFINITY, |(_, length)| length)
    }
}

/// Immutable problem data plus the pheromone state that evolves on it.
#[derive(Debug, Clone)]
struct Problem {
    positions: Vec<[f64; 2]>,
    distances: Array2<f64>,
    reciprocal: Array2<f64>,
    pheromone: PheromoneMatrix,
}

/// Ant Colony Optimization engine for the symmetric or asymmetric TSP.
///
/// # Usage
///
/// ```
/// use aco_tsp::aco::{AcoConfig, AntColony, UpdatePolicy};
/// use aco_tsp::tsp::CityData;
///
/// let cities = CityData::parse("a,0,0\nb,1,0\nc,1,1\nd,0,1\n").unwrap();
/// let config = AcoConfig::default()
///     .with_ant_count(8)
///     .with_max_iterations(20)
///     .with_seed(42);
///
/// let mut colony = AntColony::new(config).unwrap();
/// colony
///     .load_problem(cities.positions().to_vec(), cities.distance_matrix())
///     .unwrap();
/// let result = colony.run_serial(UpdatePolicy::Cycle).unwrap();
/// assert_eq!(result.best.len(), 20);
/// assert!((result.best_length() - 4.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct AntColony {
    config: AcoConfig,
    problem: Option<Problem>,
    state: ColonyState,
}

impl AntColony {
    /// Creates an engine after validating `config`.
    pub fn new(config: AcoConfig) -> Result<Self, AcoError> {
        config.validate()?;
        Ok(Self {
            config,
            problem: None,
            state: ColonyState::Configured,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ColonyState {
        self.state
    }

    /// Number of cities in the loaded problem.
    pub fn city_count(&self) -> Option<usize> {
        self.problem.as_ref().map(|p| p.distances.nrows())
    }

    /// City positions of the loaded problem.
    pub fn positions(&self) -> Option<&[[f64; 2]]> {
        self.problem.as_ref().map(|p| p.positions.as_slice())
    }

    /// Loads city positions and their distance matrix.
    ///
    /// Requires at least two cities, a square `n x n` matrix with positive
    /// finite off-diagonal entries, and a diagonal sentinel larger than any
    /// off-diagonal distance. Resets the pheromone matrix to all-ones.
    pub fn load_problem(
        &mut self,
        positions: Vec<[f64; 2]>,
        distances: Array2<f64>,
    ) -> Result<(), AcoError> {
        validate_problem(&positions, &distances)?;

        let n = distances.nrows();
        let reciprocal = distances.mapv(|d| 1.0 / d);
        self.problem = Some(Problem {
            positions,
            distances,
            reciprocal,
            pheromone: PheromoneMatrix::new(n),
        });
        self.state = ColonyState::Initialized;
        Ok(())
    }

    /// Runs every round with the serial strategy.
    pub fn run_serial(&mut self, policy: UpdatePolicy) -> Result<AcoResult, AcoError> {
        self.run(policy, Execution::Serial)
    }

    /// Runs every round with the parallel strategy.
    pub fn run_parallel(&mut self, policy: UpdatePolicy) -> Result<AcoResult, AcoError> {
        self.run(policy, Execution::Parallel)
    }

    /// Runs with a policy given by name.
    ///
    /// Unknown names fail before any round executes.
    pub fn run_named(
        &mut self,
        policy: &str,
        execution: Execution,
    ) -> Result<AcoResult, AcoError> {
        let policy: UpdatePolicy = policy.parse()?;
        self.run(policy, execution)
    }

    /// Runs `max_iterations` rounds and returns the best-so-far series.
    ///
    /// The pheromone matrix carries over between runs on the same problem.
    /// A failing round aborts the whole run with no partial result; the
    /// engine then returns to [`ColonyState::Initialized`].
    pub fn run(
        &mut self,
        policy: UpdatePolicy,
        execution: Execution,
    ) -> Result<AcoResult, AcoError> {
        let result = self.run_rounds(policy, execution);
        if result.is_err() && matches!(self.state, ColonyState::RunningRound(_)) {
            self.state = ColonyState::Initialized;
        }
        result
    }

    fn run_rounds(
        &mut self,
        policy: UpdatePolicy,
        execution: Execution,
    ) -> Result<AcoResult, AcoError> {
        let Self {
            config,
            problem,
            state,
        } = self;
        let problem = problem.as_mut().ok_or(AcoError::ProblemNotLoaded)?;

        #[cfg(not(feature = "parallel"))]
        {
            if execution == Execution::Parallel {
                return Err(AcoError::config(
                    "parallel execution requires the `parallel` feature",
                ));
            }
        }

        let n = problem.distances.nrows();
        let ants = config.ant_count;
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        info!(
            %policy,
            ?execution,
            cities = n,
            ants,
            rounds = config.max_iterations,
            "starting ant colony run"
        );

        // Per-round arenas, addressed by ant index.
        let mut tours = vec![0usize; ants * n];
        let mut lengths = vec![0.0f64; ants];

        let mut best = BestSeries::with_capacity(config.max_iterations);
        let mut round_minimums = Vec::with_capacity(config.max_iterations);

        for round in 0..config.max_iterations {
            *state = ColonyState::RunningRound(round);

            let starts = assign_start_cities(ants, n, &mut rng);
            let constructor = TourConstructor::new(
                problem.pheromone.values(),
                &problem.reciprocal,
                &problem.distances,
                config.alpha,
                config.beta,
            );

            match execution {
                Execution::Serial => {
                    construct_serial(&constructor, &starts, &mut tours, &mut lengths, &mut rng)?
                }
                #[cfg(feature = "parallel")]
                Execution::Parallel => {
                    let seeds: Vec<u64> = (0..ants).map(|_| rng.random()).collect();
                    construct_parallel(
                        &constructor,
                        &starts,
                        &seeds,
                        config.worker_count,
                        &mut tours,
                        &mut lengths,
                    )?
                }
                #[cfg(not(feature = "parallel"))]
                Execution::Parallel => unreachable!("rejected before the first round"),
            }

            let (ant, round_min) = round_best(&lengths);
            best.record(round_min, &tours[ant * n..(ant + 1) * n]);
            round_minimums.push(round_min);

            let delta = policy.reinforcement(&problem.distances, &tours, &lengths, config.q);
            problem.pheromone.evaporate_and_reinforce(config.rho, &delta);

            debug!(
                round,
                round_min,
                best = best.lengths()[round],
                "round complete"
            );
        }

        *state = ColonyState::Completed;

        let result = AcoResult {
            best,
            round_minimums,
            rounds: config.max_iterations,
            policy,
            execution,
        };
        info!(best_length = result.best_length(), "ant colony run complete");
        Ok(result)
    }

    #[cfg(test)]
    pub(crate) fn pheromone(&self) -> Option<&Array2<f64>> {
        self.problem.as_ref().map(|p| p.pheromone.values())
    }
}

/// Creates the run's master RNG.
fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn validate_problem(positions: &[[f64; 2]], distances: &Array2<f64>) -> Result<(), AcoError> {
    let (rows, cols) = distances.dim();
    if rows != cols {
        return Err(AcoError::invalid_problem(format!(
            "distance matrix must be square, got {rows}x{cols}"
        )));
    }
    if rows < 2 {
        return Err(AcoError::invalid_problem(format!(
            "at least 2 cities required, got {rows}"
        )));
    }
    if positions.len() != rows {
        return Err(AcoError::invalid_problem(format!(
            "{} city positions for a {rows}x{rows} distance matrix",
            positions.len()
        )));
    }

    let mut longest = 0.0f64;
    for ((i, j), &d) in distances.indexed_iter() {
        if i != j {
            if !(d.is_finite() && d > 0.0) {
                return Err(AcoError::invalid_problem(format!(
                    "distance [{i}][{j}] must be positive and finite, got {d}"
                )));
            }
            longest = longest.max(d);
        }
    }
    for i in 0..rows {
        let sentinel = distances[[i, i]];
        // NaN fails this comparison too
        if !(sentinel > longest) {
            return Err(AcoError::invalid_problem(format!(
                "diagonal [{i}][{i}] = {sentinel} must exceed every inter-city distance ({longest})"
            )));
        }
    }
    Ok(())
}

/// Index and length of the round's shortest tour; the first ant wins ties.
fn round_best(lengths: &[f64]) -> (usize, f64) {
    lengths
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::INFINITY), |(best_ant, best_len), (ant, len)| {
            if len < best_len {
                (ant, len)
            } else {
                (best_ant, best_len)
            }
        })
}

fn construct_serial<R: Rng>(
    constructor: &TourConstructor<'_>,
    starts: &[usize],
    tours: &mut [usize],
    lengths: &mut [f64],
    rng: &mut R,
) -> Result<(), AcoError> {
    let n = constructor.city_count();
    for ((tour, length), &start) in tours.chunks_mut(n).zip(lengths.iter_mut()).zip(starts) {
        *length = constructor.build_into(start, tour, rng)?;
    }
    Ok(())
}

/// Fans the ants of one round out over a fresh pool of `workers` threads.
///
/// Each ant writes only its own tour row and length slot. The first
/// failing ant aborts the round.
#[cfg(feature = "parallel")]
fn construct_parallel(
    constructor: &TourConstructor<'_>,
    starts: &[usize],
    seeds: &[u64],
    workers: usize,
    tours: &mut [usize],
    lengths: &mut [f64],
) -> Result<(), AcoError> {
    let n = constructor.city_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    pool.install(|| {
        tours
            .par_chunks_mut(n)
            .zip(lengths.par_iter_mut())
            .enumerate()
            .try_for_each(|(ant, (tour, length))| {
                let mut rng = create_rng(seeds[ant]);
                *length = constructor.build_into(starts[ant], tour, &mut rng)?;
                Ok(())
            })
    })
}

// ============================================================================
// Tests
// ============================================================================

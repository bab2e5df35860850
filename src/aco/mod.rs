//! Ant Colony Optimization (ACO) for the Traveling Salesman Problem.
//!
//! A colony of ants repeatedly builds tours over the city set. Each step is
//! a roulette-wheel draw weighted by pheromone and inverse distance. After
//! every round the pheromone evaporates and is reinforced along the tours
//! the ants actually walked.
//!
//! # Key Types
//!
//! - [`AcoConfig`]: Colony parameters (ants, `alpha`, `beta`, `rho`, `Q`, rounds)
//! - [`UpdatePolicy`]: The four reinforcement rules
//! - [`AntColony`]: Loads a problem and runs the rounds, serially or in parallel
//! - [`AcoResult`]: Best-so-far series and per-round minimums
//! - [`TourConstructor`]: Single-ant tour construction
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod construct;
mod policy;
mod runner;
mod types;

pub use config::AcoConfig;
pub use construct::{assign_start_cities, TourConstructor};
pub use policy::UpdatePolicy;
pub use runner::{AcoResult, AntColony, ColonyState, Execution};
pub use types::{tour_length, BestSeries};

//! Ant Colony Optimization for the Traveling Salesman Problem.
//!
//! - **Colony engine** ([`aco`]): stochastic tour construction, four
//!   pheromone update policies, best-so-far tracking, and serial or
//!   worker-pool execution of the ants in each round.
//! - **City data** ([`tsp`]): named city sets loaded from `name,x,y` text or
//!   generated at random, and the Euclidean distance model the colony
//!   consumes.
//!
//! # Example
//!
//! ```
//! use aco_tsp::aco::{AcoConfig, AntColony, UpdatePolicy};
//! use aco_tsp::tsp::CityData;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let cities = CityData::random_float(12, 100.0, 100.0, 2, &mut rng);
//!
//! let config = AcoConfig::default()
//!     .with_ant_count(12)
//!     .with_max_iterations(25)
//!     .with_seed(42);
//! let mut colony = AntColony::new(config)?;
//! colony.load_problem(cities.positions().to_vec(), cities.distance_matrix())?;
//!
//! let result = colony.run_serial(UpdatePolicy::Cycle)?;
//! let route = cities.named_tour(result.best_tour());
//! assert_eq!(route.len(), 13);
//! # Ok::<(), aco_tsp::AcoError>(())
//! ```
//!
//! # Features
//!
//! - `parallel` (default): worker-pool execution via `rayon`.
//! - `serde`: `Serialize`/`Deserialize` for configuration and results.

pub mod aco;
pub mod error;
pub mod tsp;

pub use error::AcoError;

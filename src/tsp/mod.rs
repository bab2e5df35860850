//! City sets and the Euclidean distance model.
//!
//! Produces the inputs the colony consumes: city positions and a square
//! distance matrix whose diagonal holds [`DIAGONAL_SENTINEL`].
//!
//! # Key Types
//!
//! - [`CityData`]: named cities, loaded from `name,x,y` text or generated
//!   at random
//! - [`euclidean_distance_matrix`]: pairwise distances with the sentinel
//!   diagonal

mod cities;
mod distance;

pub use cities::CityData;
pub use distance::{euclidean_distance_matrix, DIAGONAL_SENTINEL};

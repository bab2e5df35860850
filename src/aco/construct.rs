//! Tour construction: start-city assignment and roulette-wheel walks.

use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::AcoError;

/// Builds one complete tour for one ant from a read-only snapshot of the
/// colony state.
///
/// At each step the probability of moving from `i` to an unvisited `j` is
/// proportional to `P[i][j]^alpha * R[i][j]^beta`, where `R = 1 / D`.
/// Self-transitions are never candidates.
///
/// # Examples
///
/// ```
/// use aco_tsp::aco::TourConstructor;
/// use ndarray::{array, Array2};
/// use rand::SeedableRng;
///
/// let d = array![[1e7, 1.0, 2.0], [1.0, 1e7, 1.5], [2.0, 1.5, 1e7]];
/// let r = d.mapv(|x| 1.0 / x);
/// let p = Array2::ones((3, 3));
/// let ctor = TourConstructor::new(&p, &r, &d, 1.0, 2.0);
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let (tour, length) = ctor.build(0, &mut rng).unwrap();
/// assert_eq!(tour.len(), 3);
/// assert!((length - 4.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TourConstructor<'a> {
    pheromone: &'a Array2<f64>,
    reciprocal: &'a Array2<f64>,
    distances: &'a Array2<f64>,
    alpha: f64,
    beta: f64,
}

impl<'a> TourConstructor<'a> {
    /// Creates a constructor over shared, read-only matrices.
    pub fn new(
        pheromone: &'a Array2<f64>,
        reciprocal: &'a Array2<f64>,
        distances: &'a Array2<f64>,
        alpha: f64,
        beta: f64,
    ) -> Self {
        Self {
            pheromone,
            reciprocal,
            distances,
            alpha,
            beta,
        }
    }

    /// Number of cities.
    pub fn city_count(&self) -> usize {
        self.distances.nrows()
    }

    /// Builds a tour starting at `start` and returns it with its closed length.
    pub fn build<R: Rng>(&self, start: usize, rng: &mut R) -> Result<(Vec<usize>, f64), AcoError> {
        let mut tour = vec![0; self.city_count()];
        let length = self.build_into(start, &mut tour, rng)?;
        Ok((tour, length))
    }

    /// Builds a tour into a caller-owned slot of exactly `city_count()`
    /// entries and returns its closed length.
    pub fn build_into<R: Rng>(
        &self,
        start: usize,
        tour: &mut [usize],
        rng: &mut R,
    ) -> Result<f64, AcoError> {
        let n = self.city_count();
        if tour.len() != n || start >= n {
            return Err(AcoError::invariant(format!(
                "tour slot of {} entries or start city {start} does not fit {n} cities",
                tour.len()
            )));
        }

        // Removal keeps ascending order, so the wheel is always laid out by index.
        let mut unvisited: Vec<usize> = (0..n).filter(|&city| city != start).collect();
        let mut weights: Vec<f64> = Vec::with_capacity(n);

        tour[0] = start;
        let mut current = start;
        let mut length = 0.0;

        for slot in tour.iter_mut().skip(1) {
            weights.clear();
            weights.extend(
                unvisited
                    .iter()
                    .map(|&city| self.desirability(current, city)),
            );

            let total: f64 = weights.iter().sum();
            if !(total > 0.0 && total.is_finite()) {
                return Err(AcoError::invariant(format!(
                    "desirability total {total} from city {current} over {} unvisited cities",
                    unvisited.len()
                )));
            }

            let pick = roulette_index(&weights, total, rng.random::<f64>());
            let next = unvisited.remove(pick);

            *slot = next;
            length += self.distances[[current, next]];
            current = next;
        }

        length += self.distances[[current, start]];
        Ok(length)
    }

    #[inline]
    fn desirability(&self, from: usize, to: usize) -> f64 {
        self.pheromone[[from, to]].powf(self.alpha) * self.reciprocal[[from, to]].powf(self.beta)
    }
}

/// Fitness-proportionate pick: the first index whose cumulative
/// probability exceeds `draw` (in `[0, 1)`).
///
/// Rounding can leave the final cumulative sum just under `draw`; the last
/// index with positive weight is returned then.
fn roulette_index(weights: &[f64], total: f64, draw: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w / total;
        if cumulative > draw {
            return i;
        }
    }
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Assigns a starting city to each of `ant_count` ants.
///
/// Ants are taken in blocks of `n`: every full block gets a fresh random
/// permutation of all cities, so each city starts exactly one ant in the
/// block. A trailing partial block of `m` ants takes the first `m` entries
/// of another fresh permutation.
pub fn assign_start_cities<R: Rng>(ant_count: usize, n: usize, rng: &mut R) -> Vec<usize> {
    let mut starts = Vec::with_capacity(ant_count);
    if n == 0 {
        return starts;
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    while starts.len() < ant_count {
        permutation.shuffle(rng);
        let take = (ant_count - starts.len()).min(n);
        starts.extend_from_slice(&permutation[..take]);
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsp::DIAGONAL_SENTINEL;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square4() -> Array2<f64> {
        let s = DIAGONAL_SENTINEL;
        let diag = 2f64.sqrt();
        array![
            [s, 1.0, diag, 1.0],
            [1.0, s, 1.0, diag],
            [diag, 1.0, s, 1.0],
            [1.0, diag, 1.0, s],
        ]
    }

    fn is_permutation(tour: &[usize], n: usize) -> bool {
        let mut seen = vec![false; n];
        tour.len() == n
            && tour.iter().all(|&c| c < n && !std::mem::replace(&mut seen[c], true))
    }

    #[test]
    fn test_roulette_first_exceeding() {
        let w = [1.0, 1.0, 2.0];
        assert_eq!(roulette_index(&w, 4.0, 0.0), 0);
        assert_eq!(roulette_index(&w, 4.0, 0.24), 0);
        assert_eq!(roulette_index(&w, 4.0, 0.25), 1);
        assert_eq!(roulette_index(&w, 4.0, 0.6), 2);
        assert_eq!(roulette_index(&w, 4.0, 0.999), 2);
    }

    #[test]
    fn test_roulette_skips_zero_weight() {
        let w = [0.0, 3.0, 0.0];
        assert_eq!(roulette_index(&w, 3.0, 0.0), 1);
        assert_eq!(roulette_index(&w, 3.0, 0.99), 1);
    }

    #[test]
    fn test_roulette_rounding_falls_back_to_last_positive() {
        // total slightly larger than the true sum: cumulative tops out below 1
        let w = [1.0, 1.0, 0.0];
        assert_eq!(roulette_index(&w, 2.0 + 1e-9, 0.999_999_999_9), 1);
    }

    #[test]
    fn test_build_never_uses_self_edge() {
        let d = square4();
        let r = d.mapv(|x| 1.0 / x);
        let p = Array2::ones((4, 4));
        let ctor = TourConstructor::new(&p, &r, &d, 1.0, 2.0);
        let mut rng = StdRng::seed_from_u64(42);

        for i in 0..1000 {
            let (tour, length) = ctor.build(i % 4, &mut rng).unwrap();
            assert!(is_permutation(&tour, 4), "not a permutation: {tour:?}");
            for k in 0..4 {
                assert_ne!(tour[k], tour[(k + 1) % 4]);
            }
            assert!(length < DIAGONAL_SENTINEL);
        }
    }

    #[test]
    fn test_build_length_matches_tour() {
        let d = square4();
        let r = d.mapv(|x| 1.0 / x);
        let p = Array2::ones((4, 4));
        let ctor = TourConstructor::new(&p, &r, &d, 1.0, 2.0);
        let mut rng = StdRng::seed_from_u64(7);

        for start in 0..4 {
            let (tour, length) = ctor.build(start, &mut rng).unwrap();
            assert_eq!(tour[0], start);
            let recomputed = crate::aco::tour_length(&d, &tour);
            assert!((length - recomputed).abs() < 1e-9);
        }
    }

    #[test]
    fn test_strong_pheromone_dominates() {
        let d = square4();
        let r = d.mapv(|x| 1.0 / x);
        let mut p = Array2::from_elem((4, 4), 1e-6);
        // reinforce 0 -> 2 -> 1 -> 3 -> 0
        for (a, b) in [(0, 2), (2, 1), (1, 3), (3, 0)] {
            p[[a, b]] = 1e6;
        }
        let ctor = TourConstructor::new(&p, &r, &d, 1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        let (tour, _) = ctor.build(0, &mut rng).unwrap();
        assert_eq!(tour, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_all_zero_desirability_is_invariant_violation() {
        let d = square4();
        let r = d.mapv(|x| 1.0 / x);
        let p = Array2::zeros((4, 4));
        let ctor = TourConstructor::new(&p, &r, &d, 1.0, 2.0);
        let mut rng = StdRng::seed_from_u64(42);

        let err = ctor.build(0, &mut rng).unwrap_err();
        assert!(matches!(err, AcoError::InvariantViolation { .. }));
    }

    #[test]
    fn test_build_into_rejects_wrong_slot() {
        let d = square4();
        let r = d.mapv(|x| 1.0 / x);
        let p = Array2::ones((4, 4));
        let ctor = TourConstructor::new(&p, &r, &d, 1.0, 2.0);
        let mut rng = StdRng::seed_from_u64(42);

        let mut short = [0usize; 3];
        assert!(ctor.build_into(0, &mut short, &mut rng).is_err());
        let mut slot = [0usize; 4];
        assert!(ctor.build_into(4, &mut slot, &mut rng).is_err());
    }

    #[test]
    fn test_starts_fewer_ants_than_cities_are_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        let starts = assign_start_cities(5, 8, &mut rng);
        assert_eq!(starts.len(), 5);
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
        assert!(starts.iter().all(|&c| c < 8));
    }

    #[test]
    fn test_starts_blocks_cover_every_city() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 4;
        let starts = assign_start_cities(11, n, &mut rng);
        assert_eq!(starts.len(), 11);

        for block in starts.chunks(n).take(2) {
            assert!(is_permutation(block, n), "full block {block:?}");
        }
        let tail = &starts[8..];
        assert_eq!(tail.len(), 3);
        let mut sorted = tail.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn test_starts_exact_multiple() {
        let mut rng = StdRng::seed_from_u64(1);
        let starts = assign_start_cities(6, 3, &mut rng);
        for block in starts.chunks(3) {
            assert!(is_permutation(block, 3));
        }
    }
}

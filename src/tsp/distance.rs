//! Euclidean distance matrix.

use ndarray::Array2;

/// Diagonal value that forbids self-transitions.
///
/// Used as is while every inter-city distance stays below it; its
/// reciprocal is close to zero.
pub const DIAGONAL_SENTINEL: f64 = 9_999_999.0;

/// Pairwise Euclidean distances with a sentinel diagonal.
///
/// The diagonal is [`DIAGONAL_SENTINEL`], or ten times the longest
/// inter-city distance when a coordinate range is wide enough to reach the
/// constant. Either way it exceeds every off-diagonal entry.
///
/// ```
/// use aco_tsp::tsp::{euclidean_distance_matrix, DIAGONAL_SENTINEL};
///
/// let d = euclidean_distance_matrix(&[[0.0, 0.0], [3.0, 4.0]]);
/// assert_eq!(d[[0, 1]], 5.0);
/// assert_eq!(d[[1, 1]], DIAGONAL_SENTINEL);
///
/// let wide = euclidean_distance_matrix(&[[0.0, 0.0], [2e7, 0.0]]);
/// assert!(wide[[0, 0]] > wide[[0, 1]]);
/// ```
pub fn euclidean_distance_matrix(positions: &[[f64; 2]]) -> Array2<f64> {
    let n = positions.len();
    let mut distances = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            0.0
        } else {
            let dx = positions[i][0] - positions[j][0];
            let dy = positions[i][1] - positions[j][1];
            (dx * dx + dy * dy).sqrt()
        }
    });

    let longest = distances.iter().copied().fold(0.0, f64::max);
    let sentinel = if longest < DIAGONAL_SENTINEL {
        DIAGONAL_SENTINEL
    } else {
        longest * 10.0
    };
    distances.diag_mut().fill(sentinel);
    distances
}

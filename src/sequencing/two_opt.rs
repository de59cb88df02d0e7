//! Nearest-neighbor construction and open-path 2-opt improvement.
//!
//! The polynomial fallback for clusters too large for the exact DP.
//!
//! # Algorithm
//!
//! Start at the anchor and repeatedly move to the nearest unvisited node.
//! Then, for each pair of positions `1 <= i < j < n`, compute the change in
//! length from reversing the segment `[i..=j]`:
//!
//! ```text
//! delta = d(r[i-1], r[j]) + d(r[i], r[j+1]) - d(r[i-1], r[i]) - d(r[j], r[j+1])
//! ```
//!
//! where the `r[j+1]` terms vanish when `j` is the last position (the path is
//! open). The first node never moves. Accept any `delta < 0` and repeat until
//! a full pass finds no improvement (first-improvement strategy).
//!
//! # Complexity
//!
//! O(n²) for construction, O(n²) per 2-opt pass.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;

/// Greedy path from `start` that always moves to the nearest unvisited node.
pub fn nearest_neighbor_path(distances: &DistanceMatrix, start: usize) -> Vec<usize> {
    let n = distances.size();
    if n == 0 {
        return Vec::new();
    }
    let mut remaining: Vec<usize> = (0..n).filter(|&i| i != start).collect();
    let mut path = Vec::with_capacity(n);
    path.push(start);
    let mut current = start;
    while let Some(next) = distances.nearest_neighbor(current, &remaining) {
        remaining.retain(|&c| c != next);
        path.push(next);
        current = next;
    }
    path
}

/// Applies open-path 2-opt to `path`, keeping its first node fixed.
///
/// Returns the improved order and its length.
///
/// # Examples
///
/// ```
/// use waste_routing::distance::DistanceMatrix;
/// use waste_routing::sequencing::two_opt_improve;
///
/// // Points on a line at x = 0, 1, 2, 3.
/// let mut dm = DistanceMatrix::new(4);
/// for i in 0..4 {
///     for j in 0..4 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
/// let (improved, dist) = two_opt_improve(&[0, 2, 1, 3], &dm);
/// assert_eq!(improved, vec![0, 1, 2, 3]);
/// assert!((dist - 3.0).abs() < 1e-10);
/// ```
pub fn two_opt_improve(path: &[usize], distances: &DistanceMatrix) -> (Vec<usize>, f64) {
    let mut current = path.to_vec();
    let n = current.len();
    if n < 3 {
        let dist = distances.path_length(&current);
        return (current, dist);
    }

    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..n - 1 {
            for j in i + 1..n {
                if two_opt_delta(&current, distances, i, j) < -1e-10 {
                    current[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    let dist = distances.path_length(&current);
    (current, dist)
}

/// Length change from reversing `path[i..=j]` in an open path (`i >= 1`).
fn two_opt_delta(path: &[usize], distances: &DistanceMatrix, i: usize, j: usize) -> f64 {
    let prev_i = path[i - 1];
    let mut old_cost = distances.get(prev_i, path[i]);
    let mut new_cost = distances.get(prev_i, path[j]);
    if let Some(&next_j) = path.get(j + 1) {
        old_cost += distances.get(path[j], next_j);
        new_cost += distances.get(path[i], next_j);
    }
    new_cost - old_cost
}

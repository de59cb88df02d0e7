//! Exact shortest Hamiltonian path via bitmask dynamic programming.
//!
//! # Algorithm
//!
//! `dp[mask][i]` is the shortest path that starts at `start`, visits exactly
//! the nodes in `mask`, and ends at `i`:
//!
//! ```text
//! dp[{start}][start] = 0
//! dp[mask | {j}][j]  = min over i in mask of dp[mask][i] + d(i, j)
//! answer             = min over i of dp[all][i]
//! ```
//!
//! The path is rebuilt from parent pointers. Masks are processed in
//! increasing order, which is a valid topological order since every
//! transition adds a bit.
//!
//! # Complexity
//!
//! O(m² · 2^m) time, O(m · 2^m) memory.
//!
//! # Reference
//!
//! Held, M. & Karp, R.M. (1962). "A dynamic programming approach to
//! sequencing problems", *J. SIAM* 10(1), 196-210.

use crate::config::MAX_EXACT_LIMIT;
use crate::distance::DistanceMatrix;

const NO_PARENT: u8 = u8::MAX;

/// Shortest open path from `start` through every node of `distances`.
///
/// Returns the node order (starting with `start`) and its length. Among
/// equal-length answers, the one ending at the lowest index wins, and each
/// DP cell keeps the first parent that reached its minimum.
///
/// # Panics
///
/// Panics if the matrix has more than [`MAX_EXACT_LIMIT`] nodes, or if
/// `start` is out of range for a non-empty matrix. Use
/// [`crate::sequencing::sequence_cluster_with`] for clusters of any size.
pub fn shortest_path_from(distances: &DistanceMatrix, start: usize) -> (Vec<usize>, f64) {
    let m = distances.size();
    assert!(
        m <= MAX_EXACT_LIMIT,
        "{m} nodes exceed the exact limit of {MAX_EXACT_LIMIT}"
    );
    if m == 0 {
        return (Vec::new(), 0.0);
    }
    assert!(start < m, "start {start} out of range for {m} nodes");
    if m == 1 {
        return (vec![start], 0.0);
    }

    let states = 1usize << m;
    let full = states - 1;
    let mut dp = vec![f64::INFINITY; states * m];
    let mut parent = vec![NO_PARENT; states * m];
    dp[(1 << start) * m + start] = 0.0;

    for mask in 1..=full {
        if mask & (1 << start) == 0 {
            continue;
        }
        for i in 0..m {
            if mask & (1 << i) == 0 {
                continue;
            }
            let current = dp[mask * m + i];
            if !current.is_finite() {
                continue;
            }
            for j in 0..m {
                if mask & (1 << j) != 0 {
                    continue;
                }
                let next = (mask | (1 << j)) * m + j;
                let candidate = current + distances.get(i, j);
                if candidate < dp[next] {
                    dp[next] = candidate;
                    parent[next] = i as u8;
                }
            }
        }
    }

    let mut end = 0;
    for i in 1..m {
        if dp[full * m + i] < dp[full * m + end] {
            end = i;
        }
    }
    let best = dp[full * m + end];

    let mut path = Vec::with_capacity(m);
    let mut mask = full;
    let mut node = end;
    loop {
        path.push(node);
        let p = parent[mask * m + node];
        if p == NO_PARENT {
            break;
        }
        mask &= !(1 << node);
        node = p as usize;
    }
    path.reverse();

    (path, best)
}

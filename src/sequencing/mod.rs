//! Intra-cluster visiting order.
//!
//! - [`shortest_path_from`] — exact bitmask DP, used up to the exact limit
//! - [`nearest_neighbor_path`] + [`two_opt_improve`] — heuristic fallback
//!
//! [`sequence_cluster`] picks between them and flags which one produced the
//! order.

mod bitmask_dp;
mod two_opt;

pub use bitmask_dp::shortest_path_from;
pub use two_opt::{nearest_neighbor_path, two_opt_improve};

use std::collections::HashSet;

use crate::cluster::Cluster;
use crate::config::{DEFAULT_EXACT_LIMIT, MAX_EXACT_LIMIT};
use crate::distance::Graph;
use crate::error::PlanError;
use crate::models::BinId;

/// A cluster with its visiting order.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedCluster {
    /// Bin IDs in visiting order, starting at the cluster anchor.
    pub order: Vec<BinId>,
    /// Length of the open path through `order`.
    pub distance: f64,
    /// `true` if the order is provably shortest (exact DP),
    /// `false` if it came from the heuristic.
    pub optimal: bool,
}

impl SequencedCluster {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no bins.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Sequences a cluster with the default exact limit.
///
/// # Examples
///
/// ```
/// use waste_routing::models::Bin;
/// use waste_routing::distance::build_graph;
/// use waste_routing::cluster::Cluster;
/// use waste_routing::sequencing::sequence_cluster;
///
/// let bins = vec![
///     Bin::at(1, 51.500, -0.10, 90, 100.0).unwrap(),
///     Bin::at(2, 51.502, -0.10, 60, 100.0).unwrap(),
///     Bin::at(3, 51.501, -0.10, 40, 100.0).unwrap(),
/// ];
/// let graph = build_graph(&bins).unwrap();
/// let seq = sequence_cluster(&Cluster::new(vec![1, 2, 3]), &graph).unwrap();
/// assert_eq!(seq.order, vec![1, 3, 2]);
/// assert!(seq.optimal);
/// ```
pub fn sequence_cluster(cluster: &Cluster, graph: &Graph) -> Result<SequencedCluster, PlanError> {
    sequence_cluster_with(cluster, graph, DEFAULT_EXACT_LIMIT)
}

/// Sequences a cluster, solving exactly when it has at most `exact_limit`
/// bins (capped at [`MAX_EXACT_LIMIT`]) and heuristically otherwise.
///
/// Fails if a member is not in `graph` or appears twice.
pub fn sequence_cluster_with(
    cluster: &Cluster,
    graph: &Graph,
    exact_limit: usize,
) -> Result<SequencedCluster, PlanError> {
    let ids = cluster.bin_ids();
    let mut seen = HashSet::with_capacity(ids.len());
    let mut positions = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.insert(id) {
            return Err(PlanError::DuplicateBinId(id));
        }
        positions.push(graph.position(id).ok_or(PlanError::UnknownBin(id))?);
    }

    let m = positions.len();
    if m <= 1 {
        return Ok(SequencedCluster {
            order: ids.to_vec(),
            distance: 0.0,
            optimal: true,
        });
    }

    let local = graph.matrix().submatrix(&positions);

    let limit = exact_limit.min(MAX_EXACT_LIMIT);
    let (path, distance, optimal) = if m <= limit {
        let (path, distance) = shortest_path_from(&local, 0);
        (path, distance, true)
    } else {
        tracing::warn!(
            bins = m,
            exact_limit = limit,
            anchor = ids[0],
            "cluster exceeds exact limit, using nearest-neighbor + 2-opt"
        );
        let initial = nearest_neighbor_path(&local, 0);
        let (path, distance) = two_opt_improve(&initial, &local);
        (path, distance, false)
    };

    Ok(SequencedCluster {
        order: path.into_iter().map(|i| ids[i]).collect(),
        distance,
        optimal,
    })
}

//! Priority-weighted cluster extraction over the MST.
//!
//! # Algorithm
//!
//! Each bin gets a scalar weight:
//!
//! ```text
//! w(b) = priority(fill(b)) - penalty * mean(incident MST edge weights of b)
//! ```
//!
//! Clusters grow like a maximum-subarray scan laid over a depth-first walk of
//! the MST. The walk starts at the heaviest unvisited bin (lowest id on ties)
//! and visits unvisited neighbours nearest first. A neighbour joins while the
//! running sum stays non-negative and the cluster has room; otherwise it is
//! left for a later cluster. The scan restarts until every bin is placed.
//!
//! Different start rules yield different, equally valid partitions. The rule
//! above is fixed so repeated runs agree.
//!
//! # Complexity
//!
//! O(n²) worst case for start selection, O(n log n) for the walks.

use std::collections::HashMap;

use super::Cluster;
use crate::config::ClusterConfig;
use crate::distance::Edge;
use crate::models::{Bin, BinId};

/// Partitions `bins` into clusters using the default [`ClusterConfig`].
///
/// # Examples
///
/// ```
/// use waste_routing::models::Bin;
/// use waste_routing::distance::build_graph;
/// use waste_routing::mst::compute_mst;
/// use waste_routing::cluster::extract_clusters;
///
/// let bins = vec![
///     Bin::at(1, 51.505, -0.090, 85, 100.0).unwrap(),
///     Bin::at(2, 51.506, -0.091, 90, 100.0).unwrap(),
///     Bin::at(3, 51.507, -0.090, 70, 100.0).unwrap(),
/// ];
/// let graph = build_graph(&bins).unwrap();
/// let clusters = extract_clusters(&bins, &compute_mst(&graph));
/// let total: usize = clusters.iter().map(|c| c.len()).sum();
/// assert_eq!(total, 3);
/// ```
pub fn extract_clusters(bins: &[Bin], mst: &[Edge]) -> Vec<Cluster> {
    extract_clusters_with(bins, mst, &ClusterConfig::default())
}

/// Partitions `bins` into clusters under an explicit policy.
///
/// Every bin lands in exactly one cluster. MST edges naming unknown bins are
/// ignored. Bin IDs are expected to be unique.
pub fn extract_clusters_with(bins: &[Bin], mst: &[Edge], config: &ClusterConfig) -> Vec<Cluster> {
    let n = bins.len();
    if n == 0 {
        return Vec::new();
    }

    let positions: HashMap<BinId, usize> =
        bins.iter().enumerate().map(|(i, b)| (b.id(), i)).collect();
    let adjacency = build_adjacency(bins, mst, &positions);
    let weights: Vec<f64> = bins
        .iter()
        .zip(&adjacency)
        .map(|(bin, adj)| bin_weight(bin, adj, config))
        .collect();

    let max_size = config.max_cluster_size.max(1);
    let mut visited = vec![false; n];
    let mut remaining = n;
    let mut clusters = Vec::new();
    let mut stack = Vec::new();

    while remaining > 0 {
        let Some(start) = select_start(bins, &weights, &visited) else {
            break;
        };
        visited[start] = true;
        remaining -= 1;

        let mut members = vec![start];
        let mut running = weights[start];
        stack.clear();
        push_frontier(&mut stack, &adjacency[start], &visited);

        while let Some(v) = stack.pop() {
            if visited[v] || members.len() >= max_size {
                continue;
            }
            let extended = running + weights[v];
            if extended < 0.0 {
                continue;
            }
            visited[v] = true;
            remaining -= 1;
            members.push(v);
            running = extended;
            push_frontier(&mut stack, &adjacency[v], &visited);
        }

        clusters.push(Cluster::with_score(
            members.iter().map(|&i| bins[i].id()).collect(),
            running,
        ));
    }

    tracing::debug!(bins = n, clusters = clusters.len(), "extracted clusters");
    clusters
}

/// Neighbour lists sorted nearest first, then by bin id.
fn build_adjacency(
    bins: &[Bin],
    mst: &[Edge],
    positions: &HashMap<BinId, usize>,
) -> Vec<Vec<(usize, f64)>> {
    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); bins.len()];
    for edge in mst {
        if let (Some(&u), Some(&v)) = (positions.get(&edge.source), positions.get(&edge.target)) {
            adjacency[u].push((v, edge.weight));
            adjacency[v].push((u, edge.weight));
        }
    }
    for list in &mut adjacency {
        list.sort_by(|a, b| {
            a.1.total_cmp(&b.1)
                .then_with(|| bins[a.0].id().cmp(&bins[b.0].id()))
        });
    }
    adjacency
}

fn bin_weight(bin: &Bin, adjacency: &[(usize, f64)], config: &ClusterConfig) -> f64 {
    let spread = if adjacency.is_empty() {
        0.0
    } else {
        adjacency.iter().map(|&(_, w)| w).sum::<f64>() / adjacency.len() as f64
    };
    config.priority.weight(bin.priority()) - config.distance_penalty * spread
}

/// Heaviest unvisited bin; lowest id on ties.
fn select_start(bins: &[Bin], weights: &[f64], visited: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for i in (0..bins.len()).filter(|&i| !visited[i]) {
        best = match best {
            None => Some(i),
            Some(b) => {
                let ord = weights[i]
                    .total_cmp(&weights[b])
                    .then_with(|| bins[b].id().cmp(&bins[i].id()));
                if ord.is_gt() {
                    Some(i)
                } else {
                    Some(b)
                }
            }
        };
    }
    best
}

/// Pushes unvisited neighbours so the nearest is popped first.
fn push_frontier(stack: &mut Vec<usize>, adjacency: &[(usize, f64)], visited: &[bool]) {
    for &(v, _) in adjacency.iter().rev() {
        if !visited[v] {
            stack.push(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriorityWeights;
    use crate::distance::{build_graph_with, DistanceMetric};
    use crate::mst::compute_mst;
    use std::collections::HashSet;

    fn bins_with_fills(fills: &[u8]) -> Vec<Bin> {
        fills
            .iter()
            .enumerate()
            .map(|(i, &f)| Bin::at(i as BinId + 1, 0.0, i as f64, f, 100.0).expect("valid"))
            .collect()
    }

    fn clusters_for(bins: &[Bin], config: &ClusterConfig) -> Vec<Cluster> {
        let g = build_graph_with(bins, DistanceMetric::Euclidean).expect("valid");
        extract_clusters_with(bins, &compute_mst(&g), config)
    }

    fn assert_partition(bins: &[Bin], clusters: &[Cluster]) {
        let mut seen = HashSet::new();
        for c in clusters {
            assert!(!c.is_empty());
            for &id in c.bin_ids() {
                assert!(seen.insert(id), "bin {id} in two clusters");
            }
        }
        let all: HashSet<BinId> = bins.iter().map(Bin::id).collect();
        assert_eq!(seen, all);
    }

    #[test]
    fn test_empty() {
        assert!(extract_clusters(&[], &[]).is_empty());
    }

    #[test]
    fn test_single_bin() {
        let bins = bins_with_fills(&[10]);
        let clusters = clusters_for(&bins, &ClusterConfig::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].bin_ids(), &[1]);
    }

    #[test]
    fn test_partition_covers_all_bins() {
        let bins = bins_with_fills(&[85, 30, 90, 40, 75, 95, 20, 60, 82, 45]);
        let clusters = clusters_for(&bins, &ClusterConfig::default());
        assert_partition(&bins, &clusters);
    }

    #[test]
    fn test_start_is_heaviest_bin() {
        // Equal spacing, so the anchor is the bin with the largest priority.
        let bins = bins_with_fills(&[10, 20, 95, 30]);
        let config = ClusterConfig::default().with_distance_penalty(0.0);
        let clusters = clusters_for(&bins, &config);
        assert_eq!(clusters[0].anchor(), Some(3));
    }

    #[test]
    fn test_start_tie_breaks_on_lowest_id() {
        let bins = bins_with_fills(&[90, 90, 90]);
        let config = ClusterConfig::default()
            .with_distance_penalty(0.0)
            .with_max_cluster_size(1);
        let clusters = clusters_for(&bins, &config);
        let anchors: Vec<_> = clusters.iter().filter_map(Cluster::anchor).collect();
        assert_eq!(anchors, vec![1, 2, 3]);
    }

    #[test]
    fn test_negative_neighbours_split_off() {
        let bins = bins_with_fills(&[90, 10, 10, 10]);
        let config = ClusterConfig::default()
            .with_priority(PriorityWeights {
                high: 3.0,
                medium: 1.0,
                low: -2.0,
            })
            .with_distance_penalty(0.0);
        let clusters = clusters_for(&bins, &config);
        // 3 - 2 = 1 admits one low bin; the next would drop the sum below zero.
        assert_eq!(clusters[0].bin_ids(), &[1, 2]);
        assert_partition(&bins, &clusters);
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn test_max_cluster_size_respected() {
        let bins = bins_with_fills(&[90; 7]);
        let config = ClusterConfig::default().with_max_cluster_size(3);
        let clusters = clusters_for(&bins, &config);
        assert!(clusters.iter().all(|c| c.len() <= 3));
        assert_partition(&bins, &clusters);
    }

    #[test]
    fn test_clusters_follow_mst_edges() {
        let bins = bins_with_fills(&[85, 30, 90, 40, 75, 95, 20, 60, 82, 45]);
        let g = build_graph_with(&bins, DistanceMetric::Euclidean).expect("valid");
        let mst = compute_mst(&g);
        let config = ClusterConfig::default().with_max_cluster_size(4);
        for c in extract_clusters_with(&bins, &mst, &config) {
            // A cluster of k bins is a subtree: it spans k - 1 MST edges.
            let inside = mst
                .iter()
                .filter(|e| c.contains(e.source) && c.contains(e.target))
                .count();
            assert_eq!(inside, c.len() - 1, "cluster {:?}", c.bin_ids());
        }
    }

    #[test]
    fn test_deterministic() {
        let bins = bins_with_fills(&[85, 30, 90, 40, 75, 95, 20, 60, 82, 45]);
        let a = clusters_for(&bins, &ClusterConfig::default());
        let b = clusters_for(&bins, &ClusterConfig::default());
        assert_eq!(a, b);
    }
}

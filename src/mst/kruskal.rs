//! Kruskal's minimum spanning tree.
//!
//! # Algorithm
//!
//! Sort all edges ascending by weight with a stable sort, so equal weights
//! keep their enumeration order. Walk the sorted list and keep an edge when
//! its endpoints lie in different union-find sets. Stop after `n - 1` edges.
//!
//! The input graph is complete, so the result always spans every bin.
//!
//! # Complexity
//!
//! O(E log E) with E = n(n-1)/2.
//!
//! # Reference
//!
//! Kruskal, J.B. (1956). "On the shortest spanning subtree of a graph and the
//! traveling salesman problem", *Proc. AMS* 7(1), 48-50.

use super::UnionFind;
use crate::distance::{Edge, Graph};

/// Computes the minimum spanning tree of `graph`.
///
/// Returns exactly `n - 1` edges for `n >= 1` bins, in the order they were
/// accepted. Identical graphs always yield identical edge lists.
///
/// # Examples
///
/// ```
/// use waste_routing::models::Bin;
/// use waste_routing::distance::build_graph;
/// use waste_routing::mst::compute_mst;
///
/// let bins = vec![
///     Bin::at(1, 0.0, 0.0, 10, 100.0).unwrap(),
///     Bin::at(2, 0.0, 0.01, 10, 100.0).unwrap(),
///     Bin::at(3, 0.0, 0.03, 10, 100.0).unwrap(),
/// ];
/// let graph = build_graph(&bins).unwrap();
/// let mst = compute_mst(&graph);
/// assert_eq!(mst.len(), 2);
/// ```
pub fn compute_mst(graph: &Graph) -> Vec<Edge> {
    kruskal(graph).0
}

/// Kruskal's algorithm, also returning the final union-find forest.
///
/// The forest is indexed by the bins' input positions in the graph; after a
/// successful run over a non-empty graph it holds a single set.
pub fn kruskal(graph: &Graph) -> (Vec<Edge>, UnionFind) {
    let n = graph.len();
    let mut forest = UnionFind::new(n);
    if n < 2 {
        return (Vec::new(), forest);
    }

    let mut sorted: Vec<&Edge> = graph.edges().iter().collect();
    sorted.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    let mut tree = Vec::with_capacity(n - 1);
    for edge in sorted {
        let (Some(u), Some(v)) = (graph.position(edge.source), graph.position(edge.target)) else {
            continue;
        };
        if forest.union(u, v) {
            tree.push(*edge);
            if tree.len() == n - 1 {
                break;
            }
        }
    }

    tracing::debug!(
        edges = tree.len(),
        weight = tree.iter().map(|e| e.weight).sum::<f64>(),
        "computed minimum spanning tree"
    );

    (tree, forest)
}

/// Total weight of a set of edges.
pub fn total_weight(edges: &[Edge]) -> f64 {
    edges.iter().map(|e| e.weight).sum()
}

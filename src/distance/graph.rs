//! Complete weighted graph over a bin set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{DistanceMatrix, DistanceMetric};
use crate::error::PlanError;
use crate::models::{Bin, BinId};

/// An undirected weighted edge between two bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// First endpoint.
    pub source: BinId,
    /// Second endpoint.
    pub target: BinId,
    /// Distance between the endpoints.
    pub weight: f64,
}

/// The complete graph over a set of bins.
///
/// Holds the bins, a dense distance matrix indexed by input position, and
/// one edge per unordered pair enumerated as `(i, j)` with `i < j`.
///
/// # Examples
///
/// ```
/// use waste_routing::models::Bin;
/// use waste_routing::distance::build_graph;
///
/// let bins = vec![
///     Bin::at(1, 51.505, -0.09, 85, 100.0).unwrap(),
///     Bin::at(2, 51.510, -0.10, 30, 100.0).unwrap(),
///     Bin::at(3, 51.515, -0.09, 90, 100.0).unwrap(),
/// ];
/// let graph = build_graph(&bins).unwrap();
/// assert_eq!(graph.len(), 3);
/// assert_eq!(graph.edges().len(), 3);
/// assert!(graph.distance(1, 2).unwrap() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    bins: Vec<Bin>,
    positions: HashMap<BinId, usize>,
    matrix: DistanceMatrix,
    edges: Vec<Edge>,
    metric: DistanceMetric,
}

impl Graph {
    /// Number of bins (nodes).
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// The bins in input order.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Looks up a bin by ID.
    pub fn bin(&self, id: BinId) -> Option<&Bin> {
        self.positions.get(&id).map(|&i| &self.bins[i])
    }

    /// Input position of a bin ID.
    pub fn position(&self, id: BinId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Returns `true` if the bin ID is a node of this graph.
    pub fn contains(&self, id: BinId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Distance between two bins, or `None` if either ID is unknown.
    pub fn distance(&self, a: BinId, b: BinId) -> Option<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Some(self.matrix.get(i, j))
    }

    /// All `n(n-1)/2` edges in enumeration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The underlying distance matrix (indexed by input position).
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// The metric used for every weight in this graph.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Sum of consecutive leg distances along a sequence of bin IDs.
    pub fn path_distance(&self, sequence: &[BinId]) -> Result<f64, PlanError> {
        let mut total = 0.0;
        for w in sequence.windows(2) {
            total += self
                .distance(w[0], w[1])
                .ok_or_else(|| self.first_unknown(w))?;
        }
        if let [only] = sequence {
            if !self.contains(*only) {
                return Err(PlanError::UnknownBin(*only));
            }
        }
        Ok(total)
    }

    fn first_unknown(&self, ids: &[BinId]) -> PlanError {
        let id = ids
            .iter()
            .copied()
            .find(|id| !self.contains(*id))
            .unwrap_or_default();
        PlanError::UnknownBin(id)
    }
}

/// Builds the complete haversine graph over `bins`.
///
/// Fails with [`PlanError::DuplicateBinId`] if two bins share an ID.
pub fn build_graph(bins: &[Bin]) -> Result<Graph, PlanError> {
    build_graph_with(bins, DistanceMetric::default())
}

/// Builds the complete graph over `bins` under the given metric.
pub fn build_graph_with(bins: &[Bin], metric: DistanceMetric) -> Result<Graph, PlanError> {
    let mut positions = HashMap::with_capacity(bins.len());
    for (i, bin) in bins.iter().enumerate() {
        if positions.insert(bin.id(), i).is_some() {
            return Err(PlanError::DuplicateBinId(bin.id()));
        }
    }

    let matrix = DistanceMatrix::from_bins(bins, metric);
    let n = bins.len();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push(Edge {
                source: bins[i].id(),
                target: bins[j].id(),
                weight: matrix.get(i, j),
            });
        }
    }

    tracing::debug!(bins = n, edges = edges.len(), ?metric, "built distance graph");

    Ok(Graph {
        bins: bins.to_vec(),
        positions,
        matrix,
        edges,
        metric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Bin> {
        vec![
            Bin::at(10, 0.0, 0.0, 50, 100.0).expect("valid"),
            Bin::at(20, 0.0, 1.0, 50, 100.0).expect("valid"),
            Bin::at(30, 1.0, 1.0, 50, 100.0).expect("valid"),
            Bin::at(40, 1.0, 0.0, 50, 100.0).expect("valid"),
        ]
    }

    #[test]
    fn test_empty_and_single() {
        let g = build_graph(&[]).expect("empty is fine");
        assert!(g.is_empty());
        assert!(g.edges().is_empty());

        let one = vec![Bin::at(1, 0.0, 0.0, 0, 10.0).expect("valid")];
        let g = build_graph(&one).expect("single is fine");
        assert_eq!(g.len(), 1);
        assert!(g.edges().is_empty());
    }

    #[test]
    fn test_complete_edge_count() {
        let g = build_graph(&square()).expect("valid");
        assert_eq!(g.edges().len(), 6);
    }

    #[test]
    fn test_edge_enumeration_order() {
        let g = build_graph(&square()).expect("valid");
        let pairs: Vec<(BinId, BinId)> = g.edges().iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(
            pairs,
            vec![(10, 20), (10, 30), (10, 40), (20, 30), (20, 40), (30, 40)]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut bins = square();
        bins.push(Bin::at(20, 5.0, 5.0, 10, 100.0).expect("valid"));
        assert_eq!(build_graph(&bins).unwrap_err(), PlanError::DuplicateBinId(20));
    }

    #[test]
    fn test_distance_lookup_by_id() {
        let g = build_graph_with(&square(), DistanceMetric::Euclidean).expect("valid");
        assert_eq!(g.metric(), DistanceMetric::Euclidean);
        assert!((g.distance(10, 30).expect("known") - 2f64.sqrt()).abs() < 1e-10);
        assert_eq!(g.distance(10, 99), None);
        assert_eq!(g.bin(40).map(Bin::id), Some(40));
    }

    #[test]
    fn test_path_distance() {
        let g = build_graph_with(&square(), DistanceMetric::Euclidean).expect("valid");
        let d = g.path_distance(&[10, 20, 30, 40]).expect("known ids");
        assert!((d - 3.0).abs() < 1e-10);
        assert_eq!(g.path_distance(&[]).expect("empty"), 0.0);
        assert_eq!(g.path_distance(&[20]).expect("single"), 0.0);
        assert_eq!(g.path_distance(&[10, 99]), Err(PlanError::UnknownBin(99)));
        assert_eq!(g.path_distance(&[77]), Err(PlanError::UnknownBin(77)));
    }
}

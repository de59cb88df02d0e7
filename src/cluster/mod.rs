//! Density- and priority-aware bin clustering over the MST backbone.

mod extractor;

pub use extractor::{extract_clusters, extract_clusters_with};

use crate::models::BinId;

/// A group of bins intended to be collected together.
///
/// The first bin is the anchor: the member the cluster grew from, and the
/// starting point for sequencing.
///
/// # Examples
///
/// ```
/// use waste_routing::cluster::Cluster;
///
/// let c = Cluster::new(vec![4, 2, 9]);
/// assert_eq!(c.anchor(), Some(4));
/// assert!(c.contains(9));
/// assert_eq!(c.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    bins: Vec<BinId>,
    score: f64,
}

impl Cluster {
    /// Creates a cluster from bin IDs, anchored at the first one.
    pub fn new(bins: Vec<BinId>) -> Self {
        Self::with_score(bins, 0.0)
    }

    pub(crate) fn with_score(bins: Vec<BinId>, score: f64) -> Self {
        Self { bins, score }
    }

    /// Member bin IDs in discovery order.
    pub fn bin_ids(&self) -> &[BinId] {
        &self.bins
    }

    /// The bin sequencing starts from.
    pub fn anchor(&self) -> Option<BinId> {
        self.bins.first().copied()
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Returns `true` if the cluster has no bins.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Returns `true` if the bin is a member.
    pub fn contains(&self, id: BinId) -> bool {
        self.bins.contains(&id)
    }

    /// Running weight sum at the time the cluster closed.
    pub fn score(&self) -> f64 {
        self.score
    }
}

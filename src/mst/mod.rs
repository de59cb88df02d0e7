//! Minimum spanning tree backbone.
//!
//! - [`UnionFind`] — disjoint sets with path compression and union by rank
//! - [`compute_mst`] — Kruskal's algorithm over the complete bin graph

mod kruskal;
mod union_find;

pub use kruskal::{compute_mst, kruskal, total_weight};
pub use union_find::UnionFind;

//! Distance matrix and the complete bin graph.
//!
//! [`build_graph`] produces one weighted edge per unordered bin pair; the
//! weights come from a single [`DistanceMetric`] shared by every later stage.

mod graph;
mod matrix;

pub use graph::{build_graph, build_graph_with, Edge, Graph};
pub use matrix::{DistanceMatrix, DistanceMetric};

//! Ordered bin lookup.
//!
//! [`BinIndex`] is a [`BPlusTree`] keyed by bin ID, rebuilt whenever the bin
//! set changes and used alongside the planning pipeline for O(log n) lookup
//! and ordered traversal.

mod bplus_tree;

pub use bplus_tree::{BPlusTree, BinIndex, Iter, DEFAULT_ORDER, MIN_ORDER};

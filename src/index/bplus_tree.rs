//! Arena-backed B+Tree.
//!
//! # Algorithm
//!
//! Values live only in leaves; leaves are chained left to right through a
//! `next` index for ordered scans. Internal node key `keys[i]` is the
//! smallest key reachable through `children[i + 1]`.
//!
//! Insertion descends to the target leaf and inserts in sorted position
//! (overwriting an existing key). A leaf reaching `order` entries splits at
//! `len / 2` and promotes the first key of the right half. An internal node
//! reaching `order` keys splits around its middle key, which moves up. A
//! split of the root grows the tree by one level.
//!
//! # Complexity
//!
//! - `insert`, `search`: O(k log_k n)
//! - `get_all`, `iter`: O(n)
//! - `range`: O(k log_k n + m) for m returned entries
//!
//! # Reference
//!
//! Comer, D. (1979). "The Ubiquitous B-Tree", *ACM Computing Surveys*
//! 11(2), 121-137.

use std::ops::{Bound, RangeBounds};

use crate::error::PlanError;
use crate::models::{Bin, BinId};

/// Smallest supported order.
pub const MIN_ORDER: usize = 3;

/// Order used by [`BinIndex::from_bins`] and `Default`.
pub const DEFAULT_ORDER: usize = 5;

#[derive(Debug, Clone)]
enum Node<K, V> {
    Leaf {
        keys: Vec<K>,
        values: Vec<V>,
        next: Option<usize>,
    },
    Internal {
        keys: Vec<K>,
        children: Vec<usize>,
    },
}

impl<K, V> Node<K, V> {
    fn empty_leaf() -> Self {
        Node::Leaf {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
        }
    }
}

/// An ordered key-value index with linked leaves.
///
/// # Examples
///
/// ```
/// use waste_routing::index::BPlusTree;
///
/// let mut tree = BPlusTree::new(4).unwrap();
/// for k in [5, 1, 9, 3, 7] {
///     tree.insert(k, k * 10);
/// }
/// assert_eq!(tree.search(&9), Some(&90));
/// assert_eq!(tree.search(&2), None);
/// assert_eq!(tree.get_all(), vec![&10, &30, &50, &70, &90]);
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree<K, V> {
    order: usize,
    nodes: Vec<Node<K, V>>,
    root: usize,
    len: usize,
}

/// Bin records keyed by bin ID.
pub type BinIndex = BPlusTree<BinId, Bin>;

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Creates an empty tree of the given order.
    ///
    /// Fails with [`PlanError::InvalidOrder`] if `order < 3`.
    pub fn new(order: usize) -> Result<Self, PlanError> {
        if order < MIN_ORDER {
            return Err(PlanError::InvalidOrder(order));
        }
        Ok(Self::with_valid_order(order))
    }

    fn with_valid_order(order: usize) -> Self {
        Self {
            order,
            nodes: vec![Node::empty_leaf()],
            root: 0,
            len: 0,
        }
    }

    /// Maximum children per internal node.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, 1 for a lone root leaf.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut idx = self.root;
        while let Node::Internal { children, .. } = &self.nodes[idx] {
            idx = children[0];
            depth += 1;
        }
        depth
    }

    /// Number of leaves in the sibling chain.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut leaf = Some(self.leftmost_leaf());
        while let Some(idx) = leaf {
            count += 1;
            leaf = match &self.nodes[idx] {
                Node::Leaf { next, .. } => *next,
                Node::Internal { .. } => None,
            };
        }
        count
    }

    /// Inserts `value` under `key`, returning the previous value if the key
    /// was present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (old, split) = self.insert_into(self.root, key, value);
        if let Some((separator, right)) = split {
            let new_root = self.nodes.len();
            self.nodes.push(Node::Internal {
                keys: vec![separator],
                children: vec![self.root, right],
            });
            self.root = new_root;
        }
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    fn insert_into(&mut self, idx: usize, key: K, value: V) -> (Option<V>, Option<(K, usize)>) {
        let order = self.order;
        let child = match &mut self.nodes[idx] {
            Node::Leaf { keys, values, .. } => match keys.binary_search(&key) {
                Ok(pos) => return (Some(std::mem::replace(&mut values[pos], value)), None),
                Err(pos) => {
                    keys.insert(pos, key);
                    values.insert(pos, value);
                    if keys.len() < order {
                        return (None, None);
                    }
                    return (None, Some(self.split_leaf(idx)));
                }
            },
            Node::Internal { keys, children } => children[keys.partition_point(|k| *k <= key)],
        };

        let (old, split) = self.insert_into(child, key, value);
        let Some((separator, right)) = split else {
            return (old, None);
        };

        let overflow = match &mut self.nodes[idx] {
            Node::Internal { keys, children } => {
                let pos = keys.partition_point(|k| *k <= separator);
                keys.insert(pos, separator);
                children.insert(pos + 1, right);
                keys.len() >= order
            }
            Node::Leaf { .. } => false,
        };
        if overflow {
            (old, Some(self.split_internal(idx)))
        } else {
            (old, None)
        }
    }

    /// Moves the upper half of a full leaf into a new right sibling.
    fn split_leaf(&mut self, idx: usize) -> (K, usize) {
        let right_idx = self.nodes.len();
        let (separator, right) = match &mut self.nodes[idx] {
            Node::Leaf { keys, values, next } => {
                let mid = keys.len() / 2;
                let right_keys = keys.split_off(mid);
                let separator = right_keys[0].clone();
                let right = Node::Leaf {
                    keys: right_keys,
                    values: values.split_off(mid),
                    next: next.replace(right_idx),
                };
                (separator, right)
            }
            Node::Internal { .. } => unreachable!("split_leaf called on internal node"),
        };
        self.nodes.push(right);
        (separator, right_idx)
    }

    /// Splits a full internal node around its middle key, which is returned
    /// for promotion.
    fn split_internal(&mut self, idx: usize) -> (K, usize) {
        let right_idx = self.nodes.len();
        let (separator, right) = match &mut self.nodes[idx] {
            Node::Internal { keys, children } => {
                let mid = keys.len() / 2;
                let mut right_keys = keys.split_off(mid);
                let separator = right_keys.remove(0);
                let right = Node::Internal {
                    keys: right_keys,
                    children: children.split_off(mid + 1),
                };
                (separator, right)
            }
            Node::Leaf { .. } => unreachable!("split_internal called on leaf"),
        };
        self.nodes.push(right);
        (separator, right_idx)
    }

    /// Looks up `key`.
    pub fn search(&self, key: &K) -> Option<&V> {
        let leaf = self.leaf_for(key);
        match &self.nodes[leaf] {
            Node::Leaf { keys, values, .. } => keys.binary_search(key).ok().map(|pos| &values[pos]),
            Node::Internal { .. } => None,
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// All values in ascending key order.
    pub fn get_all(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Iterates `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            leaf: Some(self.leftmost_leaf()),
            pos: 0,
        }
    }

    /// Iterates entries whose keys fall within `range`, ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use waste_routing::index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// for k in 1..=10 {
    ///     tree.insert(k, ());
    /// }
    /// let keys: Vec<i32> = tree.range(4..=7).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![4, 5, 6, 7]);
    /// ```
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> impl Iterator<Item = (&K, &V)> + '_ {
        let start = match range.start_bound() {
            Bound::Included(lo) => {
                let leaf = self.leaf_for(lo);
                (leaf, self.leaf_keys(leaf).partition_point(|k| k < lo))
            }
            Bound::Excluded(lo) => {
                let leaf = self.leaf_for(lo);
                (leaf, self.leaf_keys(leaf).partition_point(|k| k <= lo))
            }
            Bound::Unbounded => (self.leftmost_leaf(), 0),
        };
        let end = range.end_bound().cloned();
        Iter {
            tree: self,
            leaf: Some(start.0),
            pos: start.1,
        }
        .take_while(move |(k, _)| match &end {
            Bound::Included(hi) => *k <= hi,
            Bound::Excluded(hi) => *k < hi,
            Bound::Unbounded => true,
        })
    }

    /// Removes every entry, leaving a single empty root leaf.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::empty_leaf());
        self.root = 0;
        self.len = 0;
    }

    fn leaf_for(&self, key: &K) -> usize {
        let mut idx = self.root;
        while let Node::Internal { keys, children } = &self.nodes[idx] {
            idx = children[keys.partition_point(|k| k <= key)];
        }
        idx
    }

    fn leftmost_leaf(&self) -> usize {
        let mut idx = self.root;
        while let Node::Internal { children, .. } = &self.nodes[idx] {
            idx = children[0];
        }
        idx
    }

    fn leaf_keys(&self, idx: usize) -> &[K] {
        match &self.nodes[idx] {
            Node::Leaf { keys, .. } => keys,
            Node::Internal { .. } => &[],
        }
    }
}

impl<K: Ord + Clone, V> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self::with_valid_order(DEFAULT_ORDER)
    }
}

impl BinIndex {
    /// Rebuilds an index of order [`DEFAULT_ORDER`] from a bin set.
    ///
    /// A later bin with the same ID replaces an earlier one.
    pub fn from_bins(bins: &[Bin]) -> Self {
        let mut index = Self::default();
        for bin in bins {
            index.insert(bin.id(), bin.clone());
        }
        tracing::debug!(bins = index.len(), depth = index.depth(), "bin index rebuilt");
        index
    }
}

/// Ascending iterator over a [`BPlusTree`], following leaf links.
pub struct Iter<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    leaf: Option<usize>,
    pos: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let idx = self.leaf?;
            let Node::Leaf { keys, values, next } = &self.tree.nodes[idx] else {
                self.leaf = None;
                return None;
            };
            if self.pos < keys.len() {
                let item = (&keys[self.pos], &values[self.pos]);
                self.pos += 1;
                return Some(item);
            }
            self.leaf = *next;
            self.pos = 0;
        }
    }
}

//! Priority queue contract used by the path search, plus a binary-heap
//! implementation with lazy decrease-key.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// A min-priority queue with decrease-key, addressed by key.
///
/// A key may be inserted once. After it is extracted it is finalized and every
/// later `insert` or `decrease_key` for it fails.
pub trait Frontier<K> {
    /// Adds `key` with `cost`.
    ///
    /// # Errors
    /// [`QueueError::DuplicateEntry`] if the key is queued,
    /// [`QueueError::AlreadyExtracted`] if it was extracted,
    /// [`QueueError::InvalidCost`] for a NaN cost.
    fn insert(&mut self, key: K, cost: f64) -> Result<(), QueueError>;

    /// The entry with the minimum cost, without removing it.
    fn peek_min(&self) -> Option<(K, f64)>;

    /// Removes and returns the entry with the minimum cost.
    fn extract_min(&mut self) -> Option<(K, f64)>;

    /// Lowers the cost of a queued key.
    ///
    /// # Errors
    /// [`QueueError::UnknownEntry`], [`QueueError::AlreadyExtracted`],
    /// [`QueueError::KeyNotDecreased`] when `cost` is not smaller, or
    /// [`QueueError::InvalidCost`] for NaN.
    fn decrease_key(&mut self, key: K, cost: f64) -> Result<(), QueueError>;

    /// Returns `true` if `key` is queued (inserted and not yet extracted).
    fn contains(&self, key: &K) -> bool;

    /// Returns `true` if `key` has been extracted.
    fn is_extracted(&self, key: &K) -> bool;

    /// Number of queued entries.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which [`Frontier`] implementation a search uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// [`crate::FibonacciHeap`].
    #[default]
    Fibonacci,
    /// [`BinaryFrontier`].
    Binary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry<K> {
    cost: OrderedFloat<f64>,
    seq: u64,
    key: K,
}

impl<K: Eq> Ord for Entry<K> {
    // Reversed so that `BinaryHeap` pops the smallest cost, oldest first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<K: Eq> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Queued { seq: u64, cost: f64 },
    Extracted,
}

/// Binary-heap frontier.
///
/// `decrease_key` pushes a fresh entry and leaves the old one behind; stale
/// entries are dropped when they reach the top. Equal costs come out in the
/// order they were inserted or decreased.
#[derive(Clone, Debug)]
pub struct BinaryFrontier<K> {
    heap: BinaryHeap<Entry<K>>,
    states: HashMap<K, State>,
    next_seq: u64,
    len: usize,
}

impl<K: Copy + Eq + Hash> BinaryFrontier<K> {
    /// Creates an empty frontier.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty frontier with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            states: HashMap::with_capacity(capacity),
            next_seq: 0,
            len: 0,
        }
    }

    fn push(&mut self, key: K, cost: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { cost: OrderedFloat(cost), seq, key });
        let _ = self.states.insert(key, State::Queued { seq, cost });
    }

    fn is_live(&self, entry: &Entry<K>) -> bool {
        matches!(self.states.get(&entry.key), Some(State::Queued { seq, .. }) if *seq == entry.seq)
    }

    fn discard_stale(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.is_live(top) {
                break;
            }
            let _ = self.heap.pop();
        }
    }
}

impl<K: Copy + Eq + Hash> Frontier<K> for BinaryFrontier<K> {
    fn insert(&mut self, key: K, cost: f64) -> Result<(), QueueError> {
        if cost.is_nan() {
            return Err(QueueError::InvalidCost);
        }
        match self.states.get(&key) {
            Some(State::Queued { .. }) => Err(QueueError::DuplicateEntry),
            Some(State::Extracted) => Err(QueueError::AlreadyExtracted),
            None => {
                self.push(key, cost);
                self.len += 1;
                Ok(())
            }
        }
    }

    fn peek_min(&self) -> Option<(K, f64)> {
        self.heap.peek().map(|e| (e.key, e.cost.0))
    }

    fn extract_min(&mut self) -> Option<(K, f64)> {
        self.discard_stale();
        let top = self.heap.pop()?;
        let _ = self.states.insert(top.key, State::Extracted);
        self.len -= 1;
        self.discard_stale();
        Some((top.key, top.cost.0))
    }

    fn decrease_key(&mut self, key: K, cost: f64) -> Result<(), QueueError> {
        let current = match self.states.get(&key) {
            Some(State::Queued { cost, .. }) => *cost,
            Some(State::Extracted) => return Err(QueueError::AlreadyExtracted),
            None => return Err(QueueError::UnknownEntry),
        };
        if cost.is_nan() {
            return Err(QueueError::InvalidCost);
        }
        if cost >= current {
            return Err(QueueError::KeyNotDecreased { current, requested: cost });
        }
        self.push(key, cost);
        Ok(())
    }

    fn contains(&self, key: &K) -> bool {
        matches!(self.states.get(key), Some(State::Queued { .. }))
    }

    fn is_extracted(&self, key: &K) -> bool {
        matches!(self.states.get(key), Some(State::Extracted))
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<K: Copy + Eq + Hash> Default for BinaryFrontier<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_frontier_order() {
        let mut q = BinaryFrontier::new();
        q.insert(1, 3.0).unwrap();
        q.insert(2, 1.0).unwrap();
        q.insert(3, 2.0).unwrap();
        assert_eq!(q.peek_min(), Some((2, 1.0)));
        assert_eq!(q.extract_min(), Some((2, 1.0)));
        assert_eq!(q.extract_min(), Some((3, 2.0)));
        assert_eq!(q.extract_min(), Some((1, 3.0)));
        assert_eq!(q.extract_min(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_binary_frontier_decrease_key_skips_stale() {
        let mut q = BinaryFrontier::new();
        q.insert('a', 10.0).unwrap();
        q.insert('b', 5.0).unwrap();
        q.decrease_key('a', 1.0).unwrap();
        assert_eq!(q.len(), 2);

        assert_eq!(q.extract_min(), Some(('a', 1.0)));
        assert_eq!(q.extract_min(), Some(('b', 5.0)));
        // The stale ('a', 10.0) entry never surfaces.
        assert_eq!(q.peek_min(), None);
        assert_eq!(q.extract_min(), None);
    }

    #[test]
    fn test_binary_frontier_ties_are_fifo() {
        let mut q = BinaryFrontier::new();
        for k in [4, 2, 9, 1] {
            q.insert(k, 1.0).unwrap();
        }
        let keys: Vec<_> = std::iter::from_fn(|| q.extract_min()).map(|(k, _)| k).collect();
        assert_eq!(keys, vec![4, 2, 9, 1]);
    }

    #[test]
    fn test_binary_frontier_errors() {
        let mut q = BinaryFrontier::new();
        q.insert(1, 2.0).unwrap();
        assert_eq!(q.insert(1, 1.0), Err(QueueError::DuplicateEntry));
        assert_eq!(
            q.decrease_key(1, 3.0),
            Err(QueueError::KeyNotDecreased { current: 2.0, requested: 3.0 })
        );
        assert_eq!(q.decrease_key(7, 1.0), Err(QueueError::UnknownEntry));
        let _ = q.extract_min();
        assert_eq!(q.decrease_key(1, 0.0), Err(QueueError::AlreadyExtracted));
        assert_eq!(q.insert(1, 0.0), Err(QueueError::AlreadyExtracted));
        assert!(q.is_extracted(&1));
    }

    #[test]
    fn test_queue_kind_serde() {
        assert_eq!(serde_json::to_string(&QueueKind::Binary).unwrap(), "\"binary\"");
        let kind: QueueKind = serde_json::from_str("\"fibonacci\"").unwrap();
        assert_eq!(kind, QueueKind::Fibonacci);
    }
}

//! Fibonacci heap with decrease-key, addressed by key.
//!
//! Nodes live in a single arena and link to each other by index. The root list
//! and every child list are circular doubly linked lists. Consolidation happens
//! lazily in [`FibonacciHeap::extract_min`]; [`FibonacciHeap::decrease_key`]
//! uses cut and cascading cut.
//!
//! Amortized costs: `insert` and `decrease_key` O(1), `extract_min` O(log n).

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::QueueError;
use crate::frontier::Frontier;

#[derive(Clone, Debug)]
struct HeapNode<K> {
    key: K,
    cost: f64,
    parent: Option<usize>,
    child: Option<usize>,
    left: usize,
    right: usize,
    degree: usize,
    marked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Queued(usize),
    Extracted,
}

/// Mergeable min-heap keyed by `K` with `f64` costs.
///
/// # Examples
/// ```
/// use roadmatch::{FibonacciHeap, Frontier};
///
/// let mut heap = FibonacciHeap::new();
/// heap.insert("a", 5.0).unwrap();
/// heap.insert("b", 3.0).unwrap();
/// heap.decrease_key("a", 1.0).unwrap();
/// assert_eq!(heap.extract_min(), Some(("a", 1.0)));
/// assert_eq!(heap.extract_min(), Some(("b", 3.0)));
/// assert!(heap.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct FibonacciHeap<K> {
    nodes: Vec<HeapNode<K>>,
    vacant: Vec<usize>,
    slots: HashMap<K, Slot>,
    min: Option<usize>,
    len: usize,
}

impl<K: Copy + Eq + Hash> FibonacciHeap<K> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            slots: HashMap::with_capacity(capacity),
            min: None,
            len: 0,
        }
    }

    /// Current cost of a queued key.
    pub fn cost_of(&self, key: &K) -> Option<f64> {
        match self.slots.get(key) {
            Some(Slot::Queued(i)) => Some(self.nodes[*i].cost),
            _ => None,
        }
    }

    /// Number of trees in the root list.
    pub fn root_count(&self) -> usize {
        self.min.map_or(0, |m| self.siblings(m).len())
    }

    fn allocate(&mut self, key: K, cost: f64) -> usize {
        let node = HeapNode {
            key,
            cost,
            parent: None,
            child: None,
            left: 0,
            right: 0,
            degree: 0,
            marked: false,
        };
        let i = match self.vacant.pop() {
            Some(i) => {
                self.nodes[i] = node;
                i
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.isolate(i);
        i
    }

    #[inline]
    fn isolate(&mut self, i: usize) {
        self.nodes[i].left = i;
        self.nodes[i].right = i;
    }

    /// Removes `i` from whatever circular list it is in.
    fn unlink(&mut self, i: usize) {
        let (l, r) = (self.nodes[i].left, self.nodes[i].right);
        self.nodes[l].right = r;
        self.nodes[r].left = l;
        self.isolate(i);
    }

    /// Inserts the isolated node `i` just before `anchor`, i.e. at the tail.
    fn splice_before(&mut self, anchor: usize, i: usize) {
        let l = self.nodes[anchor].left;
        self.nodes[i].left = l;
        self.nodes[i].right = anchor;
        self.nodes[l].right = i;
        self.nodes[anchor].left = i;
    }

    /// Adds the isolated node `i` to the root list without touching `min`.
    fn add_root(&mut self, i: usize) {
        self.nodes[i].parent = None;
        self.nodes[i].marked = false;
        match self.min {
            Some(m) => self.splice_before(m, i),
            None => self.min = Some(i),
        }
    }

    /// All members of the circular list containing `start`, starting there.
    fn siblings(&self, start: usize) -> Vec<usize> {
        let mut out = vec![start];
        let mut i = self.nodes[start].right;
        while i != start {
            out.push(i);
            i = self.nodes[i].right;
        }
        out
    }

    /// Makes root `child` a child of root `parent`. Both must be isolated.
    fn link(&mut self, child: usize, parent: usize) {
        self.nodes[child].parent = Some(parent);
        self.nodes[child].marked = false;
        match self.nodes[parent].child {
            Some(c) => self.splice_before(c, child),
            None => self.nodes[parent].child = Some(child),
        }
        self.nodes[parent].degree += 1;
    }

    /// Merges roots of equal degree until all degrees are distinct.
    fn consolidate(&mut self) {
        let Some(start) = self.min else {
            return;
        };
        let roots = self.siblings(start);
        for &r in &roots {
            self.isolate(r);
        }

        let mut by_degree: Vec<Option<usize>> = Vec::new();
        for r in roots {
            let mut x = r;
            let mut d = self.nodes[x].degree;
            loop {
                if d >= by_degree.len() {
                    by_degree.resize(d + 1, None);
                }
                let Some(mut y) = by_degree[d].take() else {
                    break;
                };
                if self.nodes[y].cost < self.nodes[x].cost {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                d += 1;
            }
            by_degree[d] = Some(x);
        }

        self.min = None;
        for i in by_degree.into_iter().flatten() {
            match self.min {
                None => self.min = Some(i),
                Some(m) => {
                    self.splice_before(m, i);
                    if self.nodes[i].cost < self.nodes[m].cost {
                        self.min = Some(i);
                    }
                }
            }
        }
    }

    /// Moves `x` from the child list of `parent` to the root list.
    fn cut(&mut self, x: usize, parent: usize) {
        if self.nodes[parent].child == Some(x) {
            let next = self.nodes[x].right;
            self.nodes[parent].child = if next == x { None } else { Some(next) };
        }
        self.unlink(x);
        self.nodes[parent].degree -= 1;
        self.add_root(x);
    }

    fn cascading_cut(&mut self, mut y: usize) {
        while let Some(z) = self.nodes[y].parent {
            if !self.nodes[y].marked {
                self.nodes[y].marked = true;
                return;
            }
            self.cut(y, z);
            y = z;
        }
    }
}

impl<K: Copy + Eq + Hash> Frontier<K> for FibonacciHeap<K> {
    fn insert(&mut self, key: K, cost: f64) -> Result<(), QueueError> {
        if cost.is_nan() {
            return Err(QueueError::InvalidCost);
        }
        match self.slots.get(&key) {
            Some(Slot::Queued(_)) => return Err(QueueError::DuplicateEntry),
            Some(Slot::Extracted) => return Err(QueueError::AlreadyExtracted),
            None => {}
        }

        let i = self.allocate(key, cost);
        self.add_root(i);
        if self.min.is_some_and(|m| cost < self.nodes[m].cost) {
            self.min = Some(i);
        }
        let _ = self.slots.insert(key, Slot::Queued(i));
        self.len += 1;
        Ok(())
    }

    fn peek_min(&self) -> Option<(K, f64)> {
        self.min.map(|m| (self.nodes[m].key, self.nodes[m].cost))
    }

    fn extract_min(&mut self) -> Option<(K, f64)> {
        let z = self.min?;

        if let Some(first) = self.nodes[z].child.take() {
            for c in self.siblings(first) {
                self.isolate(c);
                self.add_root(c);
            }
            self.nodes[z].degree = 0;
        }

        if self.nodes[z].right == z {
            self.min = None;
        } else {
            let next = self.nodes[z].right;
            self.unlink(z);
            self.min = Some(next);
            self.consolidate();
        }

        let (key, cost) = (self.nodes[z].key, self.nodes[z].cost);
        let _ = self.slots.insert(key, Slot::Extracted);
        self.vacant.push(z);
        self.len -= 1;
        Some((key, cost))
    }

    fn decrease_key(&mut self, key: K, cost: f64) -> Result<(), QueueError> {
        let x = match self.slots.get(&key) {
            Some(Slot::Queued(i)) => *i,
            Some(Slot::Extracted) => return Err(QueueError::AlreadyExtracted),
            None => return Err(QueueError::UnknownEntry),
        };
        if cost.is_nan() {
            return Err(QueueError::InvalidCost);
        }
        let current = self.nodes[x].cost;
        if cost >= current {
            return Err(QueueError::KeyNotDecreased { current, requested: cost });
        }

        self.nodes[x].cost = cost;
        if let Some(p) = self.nodes[x].parent {
            if cost < self.nodes[p].cost {
                self.cut(x, p);
                self.cascading_cut(p);
            }
        }
        if self.min.is_some_and(|m| cost < self.nodes[m].cost) {
            self.min = Some(x);
        }
        Ok(())
    }

    fn contains(&self, key: &K) -> bool {
        matches!(self.slots.get(key), Some(Slot::Queued(_)))
    }

    fn is_extracted(&self, key: &K) -> bool {
        matches!(self.slots.get(key), Some(Slot::Extracted))
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<K: Copy + Eq + Hash> Default for FibonacciHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

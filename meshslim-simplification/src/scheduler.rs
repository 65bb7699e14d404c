//! Cost-ordered queue of candidate pairs with lazy invalidation
//!
//! Entries are never removed or reordered when the mesh changes. Instead the
//! scheduler remembers, per pair of vertex slots, the tick of the freshest
//! candidate created for it; an older candidate for the same pair is simply
//! skipped when it reaches the front of the queue.

use crate::element::Vertex;
use meshslim_core::Point3d;
use priority_queue::PriorityQueue;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Canonical `(low slot, high slot)` key of a vertex pair.
pub type PairKey = (usize, usize);

/// Order two vertex slots as a [`PairKey`].
#[inline]
pub fn pair_key(a: usize, b: usize) -> PairKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A costed, not yet applied contraction of `v1` into `v0` (`v0 < v1`).
#[derive(Debug, Clone)]
pub struct VertexPair {
    pub v0: usize,
    pub v1: usize,
    pub position: Point3d,
    pub cost: f64,
    pub tick: u64,
}

impl VertexPair {
    #[inline]
    pub fn key(&self) -> PairKey {
        (self.v0, self.v1)
    }
}

impl PartialEq for VertexPair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for VertexPair {}

impl PartialOrd for VertexPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VertexPair {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-queue: the smallest cost, then the smallest slots, is greatest.
        // Among equal pairs the freshest wins.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.v0.cmp(&self.v0))
            .then_with(|| other.v1.cmp(&self.v1))
            .then_with(|| self.tick.cmp(&other.tick))
    }
}

/// Candidate queue plus the per-pair freshness index.
#[derive(Debug, Default)]
pub struct ContractionScheduler {
    queue: PriorityQueue<u64, VertexPair>,
    next_entry: u64,
    last_tick: HashMap<PairKey, u64>,
    discarded: usize,
}

impl ContractionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued entries, stale ones included.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Candidates skipped so far because they were stale or touched a
    /// removed vertex.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Tick of the freshest candidate created for `key`.
    pub fn last_tick(&self, key: PairKey) -> Option<u64> {
        self.last_tick.get(&key).copied()
    }

    /// Whether a candidate for `key` was already created at `tick`.
    #[inline]
    pub fn created_at(&self, key: PairKey, tick: u64) -> bool {
        self.last_tick.get(&key) == Some(&tick)
    }

    /// Queue `pair` and record it as the freshest candidate for its key.
    pub fn push(&mut self, pair: VertexPair) {
        self.last_tick.insert(pair.key(), pair.tick);
        self.queue.push(self.next_entry, pair);
        self.next_entry += 1;
    }

    /// Pop entries until one is still valid against `vertices`.
    ///
    /// Returns `None` once the queue is empty.
    pub fn pop_valid(&mut self, vertices: &[Vertex]) -> Option<VertexPair> {
        while let Some((_, pair)) = self.queue.pop() {
            if self.is_valid(&pair, vertices) {
                return Some(pair);
            }
            log::trace!("discarding candidate ({}, {}) @{}", pair.v0, pair.v1, pair.tick);
            self.discarded += 1;
        }
        None
    }

    fn is_valid(&self, pair: &VertexPair, vertices: &[Vertex]) -> bool {
        if vertices[pair.v0].is_removed() || vertices[pair.v1].is_removed() {
            return false;
        }
        match self.last_tick.get(&pair.key()) {
            Some(&freshest) => freshest <= pair.tick,
            None => true,
        }
    }

    /// Queued entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &VertexPair> {
        self.queue.iter().map(|(_, pair)| pair)
    }
}

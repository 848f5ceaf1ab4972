//! Nearest-match suggestions over a `ChainedHashMap`.
//!
//! Ranking happens in two steps. `score_all` computes the edit distance from
//! the query to every key and keeps the results in a side table keyed by
//! entry handle, so the dictionary's stored values are never overwritten.
//! A `Suggester` then picks at most `limit` entries from those scores
//! according to its `RankingPolicy`.

use crate::chained_hash_map::{ChainedHashMap, Handle};
use crate::distance::edit_distance;
use std::collections::BinaryHeap;
use tracing::trace;

/// Number of suggestions produced when no limit is configured.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// How candidates are chosen from the scores.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RankingPolicy {
    /// The `limit` smallest non-zero distances, ties broken by scan order,
    /// returned closest first.
    #[default]
    Nearest,
    /// Legacy selection. The first `limit` entries scanned fill the candidate
    /// slots unconditionally. Each later entry replaces the first slot, in
    /// slot order, whose distance is strictly greater than its own, provided
    /// its own distance is non-zero. This can evict a closer candidate than
    /// one it keeps, so the result is not a true top-`limit`. Results come
    /// back in slot order.
    FirstExceeding,
}

/// Edit distances for every entry of a table, in the table's scan order.
#[derive(Debug, Default)]
pub struct DistanceScores {
    entries: Vec<(Handle, usize)>,
    // handle -> position in `entries`
    index: hashbrown::HashMap<Handle, usize>,
}

impl DistanceScores {
    /// Distance recorded for `handle`, if it was scored.
    pub fn get(&self, handle: Handle) -> Option<usize> {
        self.index.get(&handle).map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(handle, distance)` pairs in bucket-then-chain order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, usize)> + '_ {
        self.entries.iter().copied()
    }
}

/// Score every entry of `table` against `query`.
pub fn score_all<K, V, S, Q>(table: &ChainedHashMap<K, V, S>, query: &Q) -> DistanceScores
where
    K: AsRef<[u8]>,
    Q: ?Sized + AsRef<[u8]>,
{
    let query = query.as_ref();
    let mut entries = Vec::with_capacity(table.len());
    let mut index = hashbrown::HashMap::with_capacity(table.len());
    for (handle, key, _) in table.iter() {
        index.insert(handle, entries.len());
        entries.push((handle, edit_distance(key, query)));
    }
    DistanceScores { entries, index }
}

/// One ranked candidate, borrowed from the table it was scored against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion<'a, K> {
    pub handle: Handle,
    pub key: &'a K,
    pub distance: usize,
}

/// Suggestion count and selection policy.
///
/// A table holding fewer eligible entries than `limit` yields a shorter
/// list; there are no placeholder slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Suggester {
    pub limit: usize,
    pub policy: RankingPolicy,
}

impl Default for Suggester {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGESTION_LIMIT,
            policy: RankingPolicy::default(),
        }
    }
}

impl Suggester {
    pub fn new(limit: usize, policy: RankingPolicy) -> Self {
        Self { limit, policy }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Score `table` against `query` and pick suggestions.
    pub fn rank<'a, K, V, S, Q>(
        &self,
        table: &'a ChainedHashMap<K, V, S>,
        query: &Q,
    ) -> Vec<Suggestion<'a, K>>
    where
        K: AsRef<[u8]>,
        Q: ?Sized + AsRef<[u8]>,
    {
        let scores = score_all(table, query);
        let picks = self.select(&scores);
        trace!(
            scored = scores.len(),
            kept = picks.len(),
            policy = ?self.policy,
            "ranked suggestions"
        );
        picks
            .into_iter()
            .filter_map(|(handle, distance)| {
                handle.key(table).map(|key| Suggestion {
                    handle,
                    key,
                    distance,
                })
            })
            .collect()
    }

    /// Pick from precomputed scores.
    pub fn select(&self, scores: &DistanceScores) -> Vec<(Handle, usize)> {
        match self.policy {
            RankingPolicy::Nearest => nearest(scores, self.limit),
            RankingPolicy::FirstExceeding => first_exceeding(scores, self.limit),
        }
    }
}

/// Rank with the default limit and policy.
pub fn rank_suggestions<'a, K, V, S, Q>(
    table: &'a ChainedHashMap<K, V, S>,
    query: &Q,
) -> Vec<Suggestion<'a, K>>
where
    K: AsRef<[u8]>,
    Q: ?Sized + AsRef<[u8]>,
{
    Suggester::default().rank(table, query)
}

// Bounded max-heap of (distance, scan position); the worst kept candidate
// sits on top and is evicted by anything strictly closer.
fn nearest(scores: &DistanceScores, limit: usize) -> Vec<(Handle, usize)> {
    let mut heap: BinaryHeap<(usize, usize)> = BinaryHeap::with_capacity(limit + 1);
    for (pos, (_, d)) in scores.iter().enumerate() {
        if d == 0 {
            continue;
        }
        if heap.len() < limit {
            heap.push((d, pos));
        } else if heap.peek().is_some_and(|&worst| (d, pos) < worst) {
            heap.pop();
            heap.push((d, pos));
        }
    }
    heap.into_sorted_vec()
        .into_iter()
        .map(|(d, pos)| (scores.entries[pos].0, d))
        .collect()
}

fn first_exceeding(scores: &DistanceScores, limit: usize) -> Vec<(Handle, usize)> {
    let mut slots: Vec<(Handle, usize)> = Vec::with_capacity(limit);
    for (h, d) in scores.iter() {
        if slots.len() < limit {
            slots.push((h, d));
            continue;
        }
        if d == 0 {
            continue;
        }
        if let Some(slot) = slots.iter_mut().find(|(_, held)| d < *held) {
            *slot = (h, d);
        }
    }
    slots
}

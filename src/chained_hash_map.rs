//! ChainedHashMap: separate chaining over an arena of index-linked entries.
//!
//! Entries live in a generational `SlotMap`; each bucket stores the arena key
//! of its chain head and each entry stores the key of its successor. Splicing
//! a node out of a chain is a matter of re-pointing one `Option<DefaultKey>`,
//! then dropping the slot.

use crate::config::{TableConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};
use crate::error::{Error, Result};
use crate::hash::PolynomialState;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use slotmap::{DefaultKey, SlotMap};
use tracing::debug;

/// Stable reference to one live entry. Removing the entry invalidates it; a
/// stale handle never resolves, even if the arena slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn key<'a, K, V, S>(&self, map: &'a ChainedHashMap<K, V, S>) -> Option<&'a K> {
        map.handle_key(*self)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a ChainedHashMap<K, V, S>) -> Option<&'a V> {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, K, V, S>(
        &self,
        map: &'a mut ChainedHashMap<K, V, S>,
    ) -> Option<&'a mut V> {
        map.handle_value_mut(*self)
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    // Cached at insertion; rehashing never calls back into `K: Hash`.
    hash: u64,
    next: Option<DefaultKey>,
}

type Slots<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

pub struct ChainedHashMap<K, V, S = PolynomialState> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>, // chain heads
    slots: Slots<K, V>,
    max_load_factor: f64,
    reentrancy: DebugReentrancy,
}

/// Point-in-time shape of a table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableStats {
    pub len: usize,
    pub capacity: usize,
    pub empty_buckets: usize,
    pub longest_chain: usize,
    pub load_factor: f64,
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entries: {}, buckets: {}, empty buckets: {}, longest chain: {}, load factor: {:.3}",
            self.len, self.capacity, self.empty_buckets, self.longest_chain, self.load_factor
        )
    }
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// A zero capacity is bumped to one bucket.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, PolynomialState)
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, PolynomialState)
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_INITIAL_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::build(capacity.max(1), DEFAULT_MAX_LOAD_FACTOR, hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            config.initial_capacity,
            config.max_load_factor,
            hasher,
        ))
    }

    fn build(capacity: usize, max_load_factor: f64, hasher: S) -> Self {
        Self {
            hasher,
            buckets: vec![None; capacity],
            slots: SlotMap::with_key(),
            max_load_factor,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("find");
        let hash = self.hasher.hash_one(q);
        let bucket = self.bucket_of(hash);
        self.locate(bucket, hash, |k| k.borrow() == q).map(|(_, k)| Handle(k))
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let h = self.find(q)?;
        self.slots.get(h.0).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let h = self.find(q)?;
        self.slots.get_mut(h.0).map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// Insert or update, adopting `key`. Returns the previous value when the
    /// key was already present; `len()` only grows for new keys.
    ///
    /// When the load factor has reached the threshold the bucket array is
    /// doubled first, so growth happens before the threshold is exceeded.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.grow_for_insert()?;
        let (bucket, hash, found) = {
            let _g = self.reentrancy.enter("put");
            let hash = self.hasher.hash_one(&key);
            let bucket = self.bucket_of(hash);
            let found = self.locate(bucket, hash, |k| *k == key);
            (bucket, hash, found.map(|(_, k)| k))
        };
        Ok(self.link_or_replace(bucket, hash, found, value, || key))
    }

    /// Like `put`, but copies the borrowed key, and only when a new entry is
    /// created. Updating an existing key allocates nothing.
    pub fn put_copy<Q>(&mut self, key: &Q, value: V) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        self.grow_for_insert()?;
        let (bucket, hash, found) = {
            let _g = self.reentrancy.enter("put_copy");
            let hash = self.hasher.hash_one(key);
            let bucket = self.bucket_of(hash);
            let found = self.locate(bucket, hash, |k| k.borrow() == key);
            (bucket, hash, found.map(|(_, k)| k))
        };
        Ok(self.link_or_replace(bucket, hash, found, value, || <Q as ToOwned>::to_owned(key)))
    }

    /// Unlink the entry for `q` and hand back its key and value. Absent keys
    /// leave the table untouched.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (bucket, found) = {
            let _g = self.reentrancy.enter("remove");
            let hash = self.hasher.hash_one(q);
            let bucket = self.bucket_of(hash);
            (bucket, self.locate(bucket, hash, |k| k.borrow() == q))
        };
        let (prev, k) = found?;
        self.unlink(bucket, prev, k)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Average chain length, `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn empty_bucket_count(&self) -> usize {
        self.buckets.iter().filter(|head| head.is_none()).count()
    }

    pub fn stats(&self) -> TableStats {
        let longest_chain = (0..self.capacity())
            .map(|b| self.chain(b).count())
            .max()
            .unwrap_or(0);
        TableStats {
            len: self.len(),
            capacity: self.capacity(),
            empty_buckets: self.empty_bucket_count(),
            longest_chain,
            load_factor: self.load_factor(),
        }
    }

    /// Rebuild the bucket array with `new_capacity` buckets. Entries are
    /// relinked in place from their cached hashes; nothing is copied.
    ///
    /// On error the table is exactly as it was.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let _g = self.reentrancy.enter("resize");
        debug!(
            from = self.buckets.len(),
            to = new_capacity,
            entries = self.slots.len(),
            "rehashing bucket array"
        );
        rehash_into(&mut self.buckets, &mut self.slots, new_capacity)
    }

    /// Remove the entry a handle refers to. Stale handles return `None`.
    pub fn remove_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        let target = handle.0;
        let hash = self.slots.get(target)?.hash;
        let bucket = self.bucket_of(hash);
        let found = {
            let _g = self.reentrancy.enter("remove_handle");
            self.locate_slot(bucket, target)
        };
        let (prev, k) = found?;
        self.unlink(bucket, prev, k)
    }

    /// Entries in bucket order, each chain newest-first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Chain {
                slots: &self.slots,
                cursor: None,
            },
            remaining: self.slots.len(),
        }
    }

    /// Mutable access to every value. Visit order is unspecified.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    /// The chain stored in `bucket`, head first. Out-of-range buckets are empty.
    pub fn chain(&self, bucket: usize) -> Chain<'_, K, V> {
        Chain {
            slots: &self.slots,
            cursor: self.buckets.get(bucket).copied().flatten(),
        }
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&K> {
        self.slots.get(h.0).map(|e| &e.key)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        self.slots.get(h.0).map(|e| &e.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        self.slots.get_mut(h.0).map(|e| &mut e.value)
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        bucket_index(hash, self.buckets.len())
    }

    // Walk one chain; returns (predecessor, match).
    fn locate<F>(
        &self,
        bucket: usize,
        hash: u64,
        mut eq: F,
    ) -> Option<(Option<DefaultKey>, DefaultKey)>
    where
        F: FnMut(&K) -> bool,
    {
        let mut prev = None;
        let mut cur = self.buckets[bucket];
        while let Some(k) = cur {
            let e = &self.slots[k];
            if e.hash == hash && eq(&e.key) {
                return Some((prev, k));
            }
            prev = cur;
            cur = e.next;
        }
        None
    }

    fn locate_slot(
        &self,
        bucket: usize,
        target: DefaultKey,
    ) -> Option<(Option<DefaultKey>, DefaultKey)> {
        let mut prev = None;
        let mut cur = self.buckets[bucket];
        while let Some(k) = cur {
            if k == target {
                return Some((prev, k));
            }
            prev = cur;
            cur = self.slots[k].next;
        }
        None
    }

    fn link_or_replace<F>(
        &mut self,
        bucket: usize,
        hash: u64,
        found: Option<DefaultKey>,
        value: V,
        make_key: F,
    ) -> Option<V>
    where
        F: FnOnce() -> K,
    {
        match found {
            Some(k) => Some(core::mem::replace(&mut self.slots[k].value, value)),
            None => {
                let next = self.buckets[bucket];
                let k = self.slots.insert(Entry {
                    key: make_key(),
                    value,
                    hash,
                    next,
                });
                self.buckets[bucket] = Some(k);
                None
            }
        }
    }

    fn unlink(&mut self, bucket: usize, prev: Option<DefaultKey>, k: DefaultKey) -> Option<(K, V)> {
        let next = self.slots[k].next;
        match prev {
            None => self.buckets[bucket] = next,
            Some(p) => self.slots[p].next = next,
        }
        // Chain is consistent again before any K/V drop glue runs.
        self.slots.remove(k).map(|e| (e.key, e.value))
    }

    // Double until the load factor is under the threshold. One doubling is
    // enough unless the table was manually shrunk.
    fn grow_for_insert(&mut self) -> Result<()> {
        if self.load_factor() < self.max_load_factor {
            return Ok(());
        }
        let current = self.capacity();
        let len = self.len() as f64;
        let mut target = current;
        while len / target as f64 >= self.max_load_factor {
            target = target
                .checked_mul(2)
                .ok_or(Error::CapacityOverflow { current })?;
        }
        self.resize(target)
    }
}

#[inline]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

fn rehash_into<K, V>(
    buckets: &mut Vec<Option<DefaultKey>>,
    slots: &mut Slots<K, V>,
    new_capacity: usize,
) -> Result<()> {
    if new_capacity == 0 {
        return Err(Error::ZeroCapacity);
    }
    let mut fresh: Vec<Option<DefaultKey>> = Vec::new();
    fresh
        .try_reserve_exact(new_capacity)
        .map_err(|_| Error::Allocation {
            requested: new_capacity,
        })?;
    fresh.resize(new_capacity, None);

    for head in buckets.iter() {
        let mut cur = *head;
        while let Some(k) = cur {
            let e = &mut slots[k];
            cur = e.next;
            let idx = bucket_index(e.hash, new_capacity);
            e.next = fresh[idx];
            fresh[idx] = Some(k);
        }
    }
    *buckets = fresh;
    Ok(())
}

/// Iterator over one bucket's chain.
pub struct Chain<'a, K, V> {
    slots: &'a Slots<K, V>,
    cursor: Option<DefaultKey>,
}

impl<'a, K, V> Chain<'a, K, V> {
    fn next_entry(&mut self) -> Option<(DefaultKey, &'a Entry<K, V>)> {
        let k = self.cursor?;
        let slots: &'a Slots<K, V> = self.slots;
        let e = &slots[k];
        self.cursor = e.next;
        Some((k, e))
    }
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().map(|(_, e)| (&e.key, &e.value))
    }
}

/// Iterator over all entries in bucket-then-chain order.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    chain: Chain<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Handle, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((k, e)) = self.chain.next_entry() {
                self.remaining -= 1;
                return Some((Handle(k), &e.key, &e.value));
            }
            self.chain.cursor = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over mutable entries.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (Handle, &'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, e)| (Handle(k), &e.key, &mut e.value))
    }
}

struct ChainDump<'a, K, V>(Chain<'a, K, V>);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChainDump<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain = Chain {
            slots: self.0.slots,
            cursor: self.0.cursor,
        };
        if chain.cursor.is_none() {
            return f.write_str("Empty");
        }
        f.debug_map().entries(chain).finish()
    }
}

struct BucketDump<'a, K, V, S>(&'a ChainedHashMap<K, V, S>);

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for BucketDump<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.0.capacity()).map(|b| ChainDump(self.0.chain(b))))
            .finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashMap")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("buckets", &BucketDump(self))
            .finish()
    }
}

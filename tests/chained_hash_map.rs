// ChainedHashMap public-surface tests.
//
// Each test states the behavior being verified. Core invariants exercised:
// - Uniqueness: put on an existing key replaces the value, never len().
// - Reachability: every entry is visited exactly once by iter().
// - Resize: content and len() survive any bucket count, handles stay valid.
// - Growth: after every put, len / capacity stays below the threshold.
// - Handles: removal invalidates a handle; stale handles never resolve.
use chained_speller::{ChainedHashMap, Error, Handle, TableConfig};
use std::collections::HashSet;

// Test: put/get round trip and update-in-place.
// Verifies: second put returns the old value and len() is unchanged.
#[test]
fn put_get_and_update() {
    let mut m = ChainedHashMap::new();
    assert_eq!(m.put("k1".to_string(), 1).unwrap(), None);
    assert_eq!(m.get("k1"), Some(&1));
    assert_eq!(m.put("k1".to_string(), 2).unwrap(), Some(1));
    assert_eq!(m.get("k1"), Some(&2));
    assert_eq!(m.len(), 1);
}

// Test: copy insertion from a borrowed key.
// Verifies: the table owns its key; the caller's string is untouched.
#[test]
fn put_copy_owns_the_key() {
    let mut m: ChainedHashMap<String, u32> = ChainedHashMap::new();
    let mut buf = String::from("word");
    m.put_copy(buf.as_str(), 7).unwrap();
    buf.push_str("s");
    assert_eq!(m.get("word"), Some(&7));
    assert!(!m.contains_key("words"));
}

// Test: removing absent keys.
// Verifies: nothing changes, including on an empty table.
#[test]
fn remove_absent_is_noop() {
    let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
    assert_eq!(m.remove("nope"), None);
    m.put("a".into(), 1).unwrap();
    assert_eq!(m.remove("b"), None);
    assert_eq!(m.len(), 1);
    assert_eq!(m.remove_entry("a"), Some(("a".to_string(), 1)));
    assert!(m.is_empty());
}

// Test: empty dictionary lookup.
#[test]
fn empty_table_contains_nothing() {
    let m: ChainedHashMap<String, ()> = ChainedHashMap::with_capacity(1000);
    assert!(!m.contains_key("anything"));
    assert_eq!(m.iter().count(), 0);
    assert_eq!(m.empty_bucket_count(), 1000);
}

// Test: load factor bound under a single-bucket start.
// Verifies: after each put, len / capacity exceeds the threshold by at most
// one entry's worth, and the bucket count only ever doubles.
#[test]
fn growth_keeps_load_near_threshold() {
    let cfg = TableConfig::default()
        .with_initial_capacity(1)
        .with_max_load_factor(0.75);
    let mut m = ChainedHashMap::with_config(cfg).unwrap();
    for i in 0..500u32 {
        m.put(format!("w{i}"), i).unwrap();
        let bound = 0.75 + 1.0 / m.capacity() as f64;
        assert!(
            m.load_factor() <= bound,
            "len {} capacity {}",
            m.len(),
            m.capacity()
        );
    }
    assert!(m.capacity().is_power_of_two());
    assert_eq!(m.len(), 500);
}

// Test: manual resize up and down.
// Assumes: handles are arena keys independent of bucket layout.
// Verifies: every key is still found and every handle still resolves.
#[test]
fn resize_preserves_entries_and_handles() {
    let mut m = ChainedHashMap::with_capacity(8);
    let handles: Vec<(Handle, String)> = (0..64)
        .map(|i| {
            let k = format!("key{i}");
            m.put(k.clone(), i).unwrap();
            (m.find(&k).unwrap(), k)
        })
        .collect();

    for cap in [1, 3, 200, 17] {
        m.resize(cap).unwrap();
        assert_eq!(m.capacity(), cap);
        assert_eq!(m.len(), 64);
        for (i, (h, k)) in handles.iter().enumerate() {
            assert_eq!(m.get(k.as_str()), Some(&(i as i32)));
            assert_eq!(h.key(&m), Some(k));
        }
    }
}

// Test: zero-bucket resize is rejected without side effects.
#[test]
fn resize_to_zero_fails_cleanly() {
    let mut m = ChainedHashMap::with_capacity(4);
    m.put("x".to_string(), 1).unwrap();
    match m.resize(0) {
        Err(Error::ZeroCapacity) => {}
        other => panic!("expected ZeroCapacity, got {other:?}"),
    }
    assert_eq!(m.capacity(), 4);
    assert_eq!(m.get("x"), Some(&1));
}

// Test: handle lifecycle.
// Verifies: remove_handle returns the pair once; the handle is stale after,
// even when a new entry reuses the arena slot.
#[test]
fn stale_handles_never_resolve() {
    let mut m = ChainedHashMap::new();
    m.put("a".to_string(), 1).unwrap();
    let h = m.find("a").unwrap();
    assert_eq!(m.remove_handle(h), Some(("a".to_string(), 1)));
    assert_eq!(m.remove_handle(h), None);

    m.put("b".to_string(), 2).unwrap();
    assert_eq!(h.key(&m), None);
    assert_eq!(h.value(&m), None);
    assert_eq!(m.get("b"), Some(&2));
}

// Test: value mutation through a handle and through iter_mut.
#[test]
fn mutate_values_in_place() {
    let mut m = ChainedHashMap::new();
    for w in ["one", "two", "three"] {
        m.put(w.to_string(), 0usize).unwrap();
    }
    let h = m.find("two").unwrap();
    *h.value_mut(&mut m).unwrap() = 2;
    for (_, k, v) in m.iter_mut() {
        *v += k.len();
    }
    assert_eq!(m.get("one"), Some(&3));
    assert_eq!(m.get("two"), Some(&5));
    assert_eq!(m.get("three"), Some(&5));
}

// Test: iteration visits each entry once, in bucket-then-chain order.
// Verifies: concatenating chain(0..capacity) equals iter().
#[test]
fn iter_matches_concatenated_chains() {
    let mut m = ChainedHashMap::with_capacity(7);
    for i in 0..40u32 {
        m.put(i.to_string(), i).unwrap();
    }
    let via_iter: Vec<Handle> = m.iter().map(|(h, _, _)| h).collect();
    let via_iter_keys: Vec<&String> = m.iter().map(|(_, k, _)| k).collect();
    let via_chains: Vec<&String> = (0..m.capacity())
        .flat_map(|b| m.chain(b).map(|(k, _)| k))
        .collect();
    assert_eq!(via_iter_keys, via_chains);
    assert_eq!(m.iter().len(), 40);
    let distinct: HashSet<Handle> = via_iter.into_iter().collect();
    assert_eq!(distinct.len(), 40);
}

// Test: stats reflect the table's shape.
#[test]
fn stats_snapshot() {
    let mut m = ChainedHashMap::with_capacity(4);
    for w in ["a", "b", "c"] {
        m.put(w.to_string(), ()).unwrap();
    }
    let s = m.stats();
    assert_eq!(s.len, 3);
    assert_eq!(s.capacity, m.capacity());
    assert!(s.longest_chain >= 1);
    assert_eq!(s.empty_buckets, m.empty_bucket_count());
    assert!(s.to_string().contains("entries: 3"));
}

// Test: invalid configuration is reported, not clamped.
#[test]
fn invalid_config_rejected() {
    let bad = [
        TableConfig::default().with_initial_capacity(0),
        TableConfig::default().with_max_load_factor(0.0),
        TableConfig::default().with_max_load_factor(f64::NAN),
    ];
    for cfg in bad {
        assert!(ChainedHashMap::<String, ()>::with_config(cfg).is_err(), "{cfg:?}");
    }
}

#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can use the
// chain-level accessors alongside the public API.

use crate::chained_hash_map::{ChainedHashMap, Handle};
use crate::config::TableConfig;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    PutCopy(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Resize(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::PutCopy(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,6}"].prop_map(OpI::Contains),
            1 => (1usize..40).prop_map(OpI::Resize),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Structural checks that must hold between any two operations:
// - every entry reachable by walking the chains is counted exactly once and
//   the count equals `len()`;
// - iteration agrees with the model, key for key and value for value.
fn check_structure<S: BuildHasher>(
    sut: &ChainedHashMap<String, i32, S>,
    model: &HashMap<String, i32>,
) -> Result<(), TestCaseError> {
    let mut reachable = 0usize;
    let mut keys = BTreeSet::new();
    for b in 0..sut.capacity() {
        for (k, v) in sut.chain(b) {
            reachable += 1;
            prop_assert!(keys.insert(k.clone()), "key {:?} stored twice", k);
            prop_assert_eq!(Some(v), model.get(k));
        }
    }
    prop_assert_eq!(reachable, sut.len());
    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.is_empty(), model.is_empty());
    let empty = (0..sut.capacity()).filter(|&b| sut.chain(b).next().is_none()).count();
    prop_assert_eq!(empty, sut.empty_bucket_count());
    Ok(())
}

fn run_scenario<S: BuildHasher>(
    mut sut: ChainedHashMap<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = pool[i].clone();
                let prev = sut.put(k.clone(), v).expect("put");
                prop_assert_eq!(prev, model.insert(k, v));
                // Growth fires before the threshold is exceeded.
                let bound = sut.max_load_factor() + 1.0 / sut.capacity() as f64;
                prop_assert!(sut.load_factor() <= bound, "load {} > {}", sut.load_factor(), bound);
            }
            OpI::PutCopy(i, v) => {
                let k = &pool[i];
                let prev = sut.put_copy(k.as_str(), v).expect("put_copy");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let h = sut.find(k.as_str());
                let removed = sut.remove_entry(k.as_str());
                match model.remove(k) {
                    Some(mv) => {
                        let (kk, vv) = removed.expect("present in model");
                        prop_assert_eq!(&kk, k);
                        prop_assert_eq!(vv, mv);
                        stale.push(h.expect("handle for live key"));
                    }
                    None => prop_assert!(removed.is_none()),
                }
                prop_assert!(sut.get(k.as_str()).is_none());
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
                prop_assert_eq!(sut.find(k.as_str()).is_some(), model.contains_key(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            OpI::Resize(n) => {
                let len = sut.len();
                sut.resize(n).expect("resize");
                prop_assert_eq!(sut.capacity(), n);
                prop_assert_eq!(sut.len(), len);
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(_, k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        check_structure(&sut, &model)?;
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap with
// the default position-weighted hash and a small table that resizes often.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let cfg = TableConfig::default().with_initial_capacity(2).with_max_load_factor(1.5);
        run_scenario(ChainedHashMap::with_config(cfg).unwrap(), pool, ops)?;
    }
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants when every key hashes alike, so the whole table
// is one chain and every lookup and splice goes through key equality.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_capacity_and_hasher(4, ConstBuildHasher);
        run_scenario(sut, pool, ops)?;
    }
}

use chained_speller::{ChainedHashMap, Handle, PolynomialState, TableConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::collections::hash_map::RandomState;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (ChainedHashMap<String, u64>, Vec<String>) {
    let mut m = ChainedHashMap::new();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.put(k.clone(), i as u64).unwrap();
    }
    (m, keys)
}

fn bench_put_fresh_100k(c: &mut Criterion) {
    c.bench_function("chained::put_fresh_100k", |b| {
        b.iter_batched(
            ChainedHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.put(key(x), i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("chained::put_presized_100k", |b| {
        b.iter_batched(
            || {
                let cfg = TableConfig::default().with_initial_capacity(1 << 18);
                ChainedHashMap::<String, u64>::with_config(cfg).unwrap()
            },
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.put(key(x), i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_put_copy_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(2).take(10_000).map(key).collect();
    c.bench_function("chained::put_copy_10k", |b| {
        b.iter_batched(
            ChainedHashMap::<String, u64>::new,
            |mut m| {
                for (i, k) in keys.iter().enumerate() {
                    m.put_copy(k.as_str(), i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("chained::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (m, keys) = filled(5, 110_000);
                // Precompute 10k unique indices via LCG
                let n = keys.len();
                let mut sel = std::collections::HashSet::with_capacity(10_000);
                let mut s = 0x9e3779b97f4a7c15u64;
                while sel.len() < 10_000 {
                    s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                    sel.insert((s as usize) % n);
                }
                let to_remove: Vec<String> = sel.into_iter().map(|i| keys[i].clone()).collect();
                (m, to_remove)
            },
            |(mut m, to_remove)| {
                for k in &to_remove {
                    m.remove(k.as_str());
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("chained::get_hit_10k_on_100k", |b| {
        let (m, keys) = filled(7, 100_000);
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(m.get(k.as_str()));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("chained::get_miss_10k_on_100k", |b| {
        let (m, _) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(m.get(k.as_str()));
            }
        })
    });
}

// The polynomial sum clusters similar keys; compare against SipHash.
fn bench_hasher_choice(c: &mut Criterion) {
    let keys: Vec<String> = lcg(13).take(50_000).map(key).collect();
    c.bench_function("chained::put_50k_polynomial", |b| {
        b.iter(|| {
            let mut m = ChainedHashMap::with_hasher(PolynomialState);
            for k in &keys {
                m.put_copy(k.as_str(), ()).unwrap();
            }
            black_box(m.stats().longest_chain)
        })
    });
    c.bench_function("chained::put_50k_siphash", |b| {
        b.iter(|| {
            let mut m = ChainedHashMap::with_hasher(RandomState::new());
            for k in &keys {
                m.put_copy(k.as_str(), ()).unwrap();
            }
            black_box(m.stats().longest_chain)
        })
    });
}

fn bench_resize_and_iter(c: &mut Criterion) {
    c.bench_function("chained::resize_double_100k", |b| {
        b.iter_batched(
            || filled(17, 100_000).0,
            |mut m| {
                let cap = m.capacity();
                m.resize(cap * 2).unwrap();
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("chained::iter_all_100k", |b| {
        let (m, _) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_h, _k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("chained::handle_access_increment_10k", |b| {
        b.iter_batched(
            || {
                let (m, keys) = filled(123, 100_000);
                let targets: Vec<Handle> = keys
                    .iter()
                    .step_by(10)
                    .filter_map(|k| m.find(k.as_str()))
                    .collect();
                (m, targets)
            },
            |(mut m, targets)| {
                for h in targets {
                    if let Some(v) = h.value_mut(&mut m) {
                        *v = v.wrapping_add(1);
                    }
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_put;
    config = bench_config();
    targets = bench_put_fresh_100k, bench_put_copy_10k, bench_hasher_choice
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_get_hit_10k,
              bench_get_miss_10k,
              bench_resize_and_iter
}
criterion_main!(benches_put, benches_ops);

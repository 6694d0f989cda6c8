use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use dense_dict::Dictionary;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_put_fresh_100k(c: &mut Criterion) {
    let mut g = c.benchmark_group("put_fresh_100k");
    g.bench_function("dense_dict", |b| {
        b.iter_batched(
            Dictionary::<u64, u64>::new,
            |mut d| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    d.put(x, i as u64);
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
    g.bench_function("hashbrown", |b| {
        b.iter_batched(
            hashbrown::HashMap::<u64, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(x, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.finish();
}

fn bench_get_hit_and_miss(c: &mut Criterion) {
    let keys: Vec<u64> = lcg(7).take(100_000).collect();
    let misses: Vec<u64> = lcg(0xdead_beef).take(10_000).collect();
    let mut d = Dictionary::new();
    let mut m = hashbrown::HashMap::new();
    for (i, &k) in keys.iter().enumerate() {
        d.put(k, i as u64);
        m.insert(k, i as u64);
    }

    let mut g = c.benchmark_group("get_10k");
    g.bench_function("dense_dict/hit", |b| {
        b.iter(|| {
            for k in keys.iter().take(10_000) {
                black_box(d.get(k));
            }
        })
    });
    g.bench_function("dense_dict/miss", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(d.get(k));
            }
        })
    });
    g.bench_function("hashbrown/hit", |b| {
        b.iter(|| {
            for k in keys.iter().take(10_000) {
                black_box(m.get(k));
            }
        })
    });
    g.finish();
}

fn bench_delete_churn(c: &mut Criterion) {
    // Insert/delete pairs exercise tombstone accumulation and the rehashes
    // that reclaim them.
    c.bench_function("dense_dict/churn_put_delete_10k", |b| {
        b.iter_batched(
            || {
                let mut d = Dictionary::new();
                for (i, x) in lcg(3).take(1_000).enumerate() {
                    d.put(x, i as u64);
                }
                d
            },
            |mut d| {
                for x in lcg(5).take(10_000) {
                    d.put(x, 0);
                    d.delete(&x);
                }
                black_box(d)
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
    name = benches;
    config = bench_config();
    targets = bench_put_fresh_100k, bench_get_hit_and_miss, bench_delete_churn
}
criterion_main!(benches);

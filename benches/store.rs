//! Benchmarks for the key-depth stores and the search driver.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use ricochet::grid::{Board, DEMO_BOARD};
use ricochet::solver::{self, SolverConfig};
use ricochet::{
    BoardGeometry, DirectIndexedTrie, FxKeyDepthMap, KeyDepthMap, KeyDepthTrie, StoreConfig,
};

const KEY_COUNT: usize = 100_000;

/// Random canonical keys on the demo board, 4 robots.
fn demo_keys() -> (BoardGeometry, Vec<u32>) {
    let board = Board::parse(DEMO_BOARD).unwrap();
    let geometry = board.geometry().unwrap();
    let layout = geometry.layout();
    let free: Vec<u32> = (0..geometry.cell_count())
        .filter(|&c| geometry.is_free(c))
        .collect();
    let mut rng = StdRng::seed_from_u64(0xd3e7);
    let keys = (0..KEY_COUNT)
        .map(|_| {
            let picked: Vec<u32> = free.choose_multiple(&mut rng, 4).copied().collect();
            layout.encode(picked[0], &picked[1..]) as u32
        })
        .collect();
    (geometry, keys)
}

fn insert_all(map: &mut dyn KeyDepthMap<u32>, keys: &[u32]) {
    for (i, &key) in keys.iter().enumerate() {
        black_box(map.put_if_greater(key, (i & 0x1f) as u8).unwrap());
    }
}

/// Benchmark inserting 100k keys into each store variant.
fn bench_put(c: &mut Criterion) {
    let (geometry, keys) = demo_keys();
    let mut group = c.benchmark_group("put_if_greater_100k");
    group.sample_size(10);

    group.bench_function("generic_trie", |b| {
        b.iter_batched(
            || KeyDepthTrie::<u32>::new(&geometry, &StoreConfig::default()).unwrap(),
            |mut trie| insert_all(&mut trie, &keys),
            BatchSize::LargeInput,
        )
    });
    group.bench_function("direct_indexed", |b| {
        b.iter_batched(
            || DirectIndexedTrie::<u32>::new(&geometry, &StoreConfig::fast()).unwrap(),
            |mut trie| insert_all(&mut trie, &keys),
            BatchSize::LargeInput,
        )
    });
    group.bench_function("fx_hash_map", |b| {
        b.iter_batched(
            FxKeyDepthMap::<u32>::new,
            |mut map| insert_all(&mut map, &keys),
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

/// Benchmark lookups in a filled generic trie.
fn bench_get(c: &mut Criterion) {
    let (geometry, keys) = demo_keys();
    let mut trie = KeyDepthTrie::<u32>::new(&geometry, &StoreConfig::default()).unwrap();
    insert_all(&mut trie, &keys);

    c.bench_function("generic_trie_get_100k", |b| {
        b.iter(|| keys.iter().filter_map(|&k| trie.get(black_box(k))).count())
    });
}

/// Benchmark the complete demo solve.
fn bench_solve_demo(c: &mut Criterion) {
    let board = Board::parse(DEMO_BOARD).unwrap();
    let config = SolverConfig::default();

    c.bench_function("solve_demo", |b| {
        b.iter(|| solver::solve(black_box(&board), &config).unwrap())
    });
}

criterion_group!(benches, bench_put, bench_get, bench_solve_demo);
criterion_main!(benches);

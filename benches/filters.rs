use std::collections::HashSet;
use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use layerbloom::filters::Filter;
use layerbloom::filters::bloomfilter::BloomFilter;
use layerbloom::filters::countingbloomfilter::CountingBloomFilter;
use layerbloom::filters::layeredbloomfilter::LayeredBloomFilter;

const EXPECTED_ELEMENTS: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.01;

fn setup_bloomfilter() -> BloomFilter {
    BloomFilter::with_properties(EXPECTED_ELEMENTS, FALSE_POSITIVE_RATE).unwrap()
}

fn setup_countingbloomfilter() -> CountingBloomFilter {
    CountingBloomFilter::with_properties(EXPECTED_ELEMENTS, FALSE_POSITIVE_RATE).unwrap()
}

fn setup_layeredbloomfilter() -> LayeredBloomFilter {
    LayeredBloomFilter::with_properties(EXPECTED_ELEMENTS, FALSE_POSITIVE_RATE).unwrap()
}

fn setup_hashset() -> HashSet<Vec<u8>> {
    HashSet::new()
}

fn keys(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| i.to_string().into_bytes()).collect()
}

fn run_insert_many<F, S>(c: &mut Criterion, name: &str, setup: S)
where
    S: Fn() -> F,
    F: Filter,
{
    let data = keys(1_000);
    c.bench_function(&format!("insert_many/{}", name), |b| {
        b.iter_batched(
            &setup,
            |mut filter| {
                for d in &data {
                    filter.insert(d);
                }
                filter
            },
            BatchSize::LargeInput,
        )
    });
}

fn run_insert_existing<F, S>(c: &mut Criterion, name: &str, setup: S)
where
    S: Fn() -> F,
    F: Filter,
{
    let mut filter = setup();
    filter.insert(b"foo");
    c.bench_function(&format!("insert_existing/{}", name), |b| {
        b.iter(|| filter.insert(black_box(b"foo")))
    });
}

fn run_query<F, S>(c: &mut Criterion, name: &str, setup: S)
where
    S: Fn() -> F,
    F: Filter,
{
    let mut filter = setup();
    for d in keys(EXPECTED_ELEMENTS) {
        filter.insert(&d);
    }
    c.bench_function(&format!("query/{}", name), |b| {
        b.iter(|| filter.query(black_box(b"not in there")))
    });
}

fn benchmarks_insert_many(c: &mut Criterion) {
    run_insert_many(c, "bloomfilter", setup_bloomfilter);
    run_insert_many(c, "countingbloomfilter", setup_countingbloomfilter);
    run_insert_many(c, "layeredbloomfilter", setup_layeredbloomfilter);
    run_insert_many(c, "hashset", setup_hashset);
}

// counting and layered filters grow by one layer per repeated insert, so only plain sets here
fn benchmarks_insert_existing(c: &mut Criterion) {
    run_insert_existing(c, "bloomfilter", setup_bloomfilter);
    run_insert_existing(c, "hashset", setup_hashset);
}

fn benchmarks_query(c: &mut Criterion) {
    run_query(c, "bloomfilter", setup_bloomfilter);
    run_query(c, "countingbloomfilter", setup_countingbloomfilter);
    run_query(c, "layeredbloomfilter", setup_layeredbloomfilter);
    run_query(c, "hashset", setup_hashset);
}

criterion_group!(
    benches,
    benchmarks_insert_many,
    benchmarks_insert_existing,
    benchmarks_query,
);
criterion_main!(benches);

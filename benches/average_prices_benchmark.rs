// ============================================================================
// Fill Analytics Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Parsing - Message tokenizing and field conversion
// 2. Average Prices - End-to-end chain resolution over generated streams
// 3. LRU - Superseded id cache churn
// ============================================================================

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fill_analytics::prelude::*;
use rust_decimal::Decimal;
use std::hint::black_box;

/// Each chain: new, partial fill, modify, fill the rest
fn generate_messages(chains: u64) -> Vec<String> {
    let mut messages = Vec::with_capacity(chains as usize * 4);
    for i in 0..chains {
        let root = i * 2 + 1;
        let next = root + 1;
        let px = 100 + (i % 50);
        messages.push(format!("new {root} SYM{} buy 100 {px}.00", i % 16));
        messages.push(format!("fill {root} 40 {px}.00"));
        messages.push(format!("modify {next} {root} 60 {px}.50"));
        messages.push(format!("fill {next} 60 {px}.25"));
    }
    messages
}

// ============================================================================
// Parsing
// ============================================================================

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for line in ["new 1 AAPL buy 100 10.00", "modify 2 1 60 10.50", "fill 2 60 10.25"] {
        group.bench_with_input(BenchmarkId::from_parameter(line), line, |b, line| {
            b.iter(|| black_box(ExchangeMessage::parse(black_box(line))))
        });
    }

    group.finish();
}

// ============================================================================
// Average Prices
// ============================================================================

fn benchmark_average_prices(c: &mut Criterion) {
    let mut group = c.benchmark_group("average_prices");

    for chains in [10u64, 1_000, 10_000] {
        let messages = generate_messages(chains);
        group.throughput(Throughput::Elements(messages.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chains), &messages, |b, messages| {
            b.iter(|| black_box(average_prices(messages)))
        });
    }

    group.finish();
}

fn benchmark_small_superseded_cache(c: &mut Criterion) {
    // Capacity well below the number of modifies so the cache keeps evicting
    let messages = generate_messages(10_000);
    let config = ProcessorConfig::lenient().with_superseded_capacity(64);

    c.bench_function("average_prices_evicting", |b| {
        b.iter(|| black_box(try_average_prices(&messages, &config)))
    });
}

// ============================================================================
// Analytics and LRU
// ============================================================================

fn benchmark_vwap(c: &mut Criterion) {
    let fills: Vec<(Decimal, u64)> = (0..1_000)
        .map(|i| (Decimal::new(10_000 + i % 97, 2), 1 + (i as u64 % 10)))
        .collect();

    c.bench_function("vwap_1000_fills", |b| {
        b.iter(|| {
            let mut vwap = VwapAccumulator::new();
            for &(price, quantity) in &fills {
                let _ = vwap.add(price, quantity);
            }
            black_box(vwap.vwap())
        })
    });
}

fn benchmark_lru(c: &mut Criterion) {
    c.bench_function("lru_put_get_evict", |b| {
        let mut cache = LruCache::new(1024).expect("positive capacity");
        let mut key = 0u64;
        b.iter(|| {
            key = key.wrapping_add(1);
            black_box(cache.put(key, key));
            black_box(cache.get(&(key / 2)).copied());
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_average_prices,
    benchmark_small_superseded_cache,
    benchmark_vwap,
    benchmark_lru,
);
criterion_main!(benches);

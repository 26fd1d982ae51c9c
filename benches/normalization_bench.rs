//! Normalizer throughput benchmarks.
//!
//! Measures how fast the normalizer turns input values into output mappings.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `flat` | Flat JSON-derived mappings of 10 and 100 camelCase keys |
//! | `nested` | A record graph with nested objects, lists and timestamps |
//! | `callbacks` | The key pipeline with a closure callback and an ignore list |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench normalization_bench
//! open target/criterion/report/index.html
//! ```

use std::hint::black_box;

use chrono::{FixedOffset, TimeZone};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mapnorm::{Normalizer, NormalizerConfig, Object, Value};

fn flat_document(fields: usize) -> Value {
    let mut obj = serde_json::Map::new();
    for i in 0..fields {
        obj.insert(format!("fieldNumber{i}"), serde_json::Value::String(format!("value_{i}")));
    }
    Value::from(serde_json::Value::Object(obj))
}

fn order_graph(lines: usize) -> Value {
    let tz = FixedOffset::east_opt(2 * 3600).expect("valid offset");
    let placed_at = tz
        .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
        .single()
        .expect("unambiguous time");
    let items: Vec<Value> = (0..lines)
        .map(|i| {
            Object::builder("OrderLine")
                .public("productId", i as i64)
                .public("unitPrice", 9.99)
                .protected("internalCost", 4.5)
                .public("discountCode", Value::Null)
                .build()
                .into()
        })
        .collect();
    let customer = Object::builder("Customer")
        .public("firstName", "Ada")
        .public("lastName", "Lovelace")
        .private("apiToken", "tok_123")
        .build();
    Object::builder("Order")
        .public("orderId", 1)
        .public("placedAt", placed_at)
        .public("customer", customer)
        .public("lineItems", Value::List(items))
        .public("createdAt", placed_at)
        .build()
        .into()
}

// ---------------------------------------------------------------------------
// Flat
// ---------------------------------------------------------------------------

fn flat_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat");
    let normalizer = Normalizer::default();

    for fields in [10usize, 100] {
        let doc = flat_document(fields);
        group.throughput(Throughput::Elements(fields as u64));
        group.bench_with_input(BenchmarkId::new("fields", fields), &doc, |b, doc| {
            b.iter(|| black_box(normalizer.normalize(black_box(doc)).expect("normalize")))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Nested
// ---------------------------------------------------------------------------

fn nested_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested");
    let normalizer = Normalizer::default();

    for lines in [1usize, 50] {
        let order = order_graph(lines);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("order_lines", lines), &order, |b, order| {
            b.iter(|| black_box(normalizer.normalize(black_box(order)).expect("normalize")))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

fn callbacks_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("callbacks");
    let config = NormalizerConfig::builder()
        .ignore_sql_behavioural_properties(true)
        .property_callback_fn(|key, _| (!key.starts_with("internal")).then(|| key.to_string()))
        .include_protected_properties(true)
        .build();
    let normalizer = Normalizer::new(config);
    let order = order_graph(50);

    group.bench_function("closure_and_ignore_list", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&order)).expect("normalize")))
    });

    group.finish();
}

criterion_group!(benches, flat_bench, nested_bench, callbacks_bench);
criterion_main!(benches);

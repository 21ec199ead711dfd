//! Benchmarks for wire encoding and parsing.
//!
//! Run with: cargo bench -p storefacet-wire

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use storefacet_core::category::{CategoryId, CategoryTree};
use storefacet_core::state::{FilterState, PriceBounds, PriceSelection, SortOrder};
use storefacet_wire::payload::FilterRequest;
use storefacet_wire::{envelope, query};

fn wide_tree() -> CategoryTree {
    let mut tree = CategoryTree::new();
    for parent in 0..20u32 {
        let base = 100 + parent * 10;
        tree = tree.branch(parent, (base..base + 8).collect::<Vec<_>>());
    }
    tree
}

fn loaded_state(bounds: PriceBounds, categories: u32) -> FilterState {
    let mut state = FilterState::defaults(bounds);
    for raw in 0..categories {
        state.categories.insert(CategoryId::new(raw));
    }
    state.price = PriceSelection { min: 40, max: 760 };
    state.on_sale = true;
    state.orderby = SortOrder::PriceDesc;
    state.page = 3;
    state
}

// ============================================================================
// Payload encoding
// ============================================================================

fn bench_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire/payload");
    let bounds = PriceBounds::new(0, 1000, 10);

    for categories in [0u32, 5, 20] {
        let state = loaded_state(bounds, categories);
        group.bench_with_input(
            BenchmarkId::new("encode", categories),
            &state,
            |b, state| {
                b.iter(|| {
                    let req = FilterRequest::new(black_box(state), bounds, "bench-nonce");
                    black_box(req.body());
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Query codec
// ============================================================================

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire/query");
    let bounds = PriceBounds::new(0, 1000, 10);
    let tree = wide_tree();
    let state = loaded_state(bounds, 12);
    let encoded = query::encode_query(&state, bounds).unwrap_or_default();

    group.bench_function("encode", |b| {
        b.iter(|| black_box(query::encode_query(black_box(&state), bounds)))
    });

    group.bench_function("parse", |b| {
        b.iter(|| black_box(query::parse_query(black_box(&encoded), bounds, &tree)))
    });

    group.finish();
}

// ============================================================================
// Envelope decoding
// ============================================================================

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire/envelope");

    let results = envelope::FilterResults {
        products: "<li class=\"product\">".repeat(48),
        pagination: "<a class=\"page-numbers\">2</a>".repeat(6),
        result_count: "<p>Showing 1-48 of 312 results</p>".into(),
        total: 312,
        total_pages: 7,
        current_page: 1,
        active_filters: Vec::new(),
    };
    let body = envelope::encode(&results).expect("encode sample envelope");

    group.bench_function("decode", |b| {
        b.iter(|| black_box(envelope::decode(black_box(&body))))
    });

    group.finish();
}

criterion_group!(benches, bench_payload, bench_query, bench_envelope);
criterion_main!(benches);

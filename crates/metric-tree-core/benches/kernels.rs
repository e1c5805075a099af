//! Elasticity estimator and retrieval ranker benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use metric_tree_core::elasticity::{estimate, EstimateOptions};
use metric_tree_core::embeddings::HashingEmbedder;
use metric_tree_core::retrieval::{rank_by_cosine, rank_by_tokens, CorpusRecord, MetadataFilter};
use metric_tree_core::OrderedMap;

fn elasticity_benchmarks(c: &mut Criterion) {
    let n = 104;
    let children: OrderedMap<Vec<f64>> = (0..6)
        .map(|j| {
            let series: Vec<f64> = (0..n)
                .map(|i| ((i * (j + 3)) % 17) as f64 + (i as f64 * 0.1).sin())
                .collect();
            (format!("driver_{}", j), series)
        })
        .collect();
    let parent: Vec<f64> = (0..n)
        .map(|i| {
            children
                .values()
                .enumerate()
                .map(|(j, s)| s[i] * (j as f64 + 1.0))
                .sum()
        })
        .collect();

    c.bench_function("elasticity_estimate_104x6", |b| {
        b.iter(|| {
            estimate(
                black_box(&parent),
                black_box(&children),
                EstimateOptions::default(),
            )
        })
    });
}

fn ranker_benchmarks(c: &mut Criterion) {
    let embedder = HashingEmbedder::new();
    let corpus: Vec<CorpusRecord> = (0..1_000)
        .map(|i| {
            let text = format!(
                "Playbook {} covers activation cohort {} and retention experiment {}",
                i,
                i % 13,
                i % 7
            );
            let vector = embedder.embed_sync(&text);
            CorpusRecord::new(i.to_string(), text).with_vector(vector)
        })
        .collect();
    let query = embedder.embed_sync("improve activation with onboarding experiments");
    let filter = MetadataFilter::default();

    c.bench_function("rank_by_cosine_1k_384d", |b| {
        b.iter(|| rank_by_cosine(black_box(&query), black_box(&corpus), &filter, 8))
    });

    c.bench_function("rank_by_tokens_1k", |b| {
        b.iter(|| {
            rank_by_tokens(
                black_box("activation cohort retention experiment"),
                black_box(&corpus),
                &filter,
                8,
            )
        })
    });
}

criterion_group!(benches, elasticity_benchmarks, ranker_benchmarks);
criterion_main!(benches);

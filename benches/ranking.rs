use std::hint::black_box;
use std::sync::Arc;

use agent_ml::{AnalysisConfig, Article, Embedder, MlService, StubEmbedder};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const DIM: usize = 384;

fn articles(embedder: &StubEmbedder, count: usize) -> Vec<Article> {
    (0..count)
        .map(|i| {
            let title = embedder.embed(&format!("заголовок {i}")).unwrap_or_default();
            let abstract_vec = embedder.embed(&format!("аннотация {i}")).unwrap_or_default();
            Article {
                document_id: format!("doc-{i}"),
                title_ru: String::new(),
                abstract_ru: String::new(),
                title_embedding: vector::encode(&title),
                abstract_embedding: vector::encode(&abstract_vec),
            }
        })
        .collect()
}

/// Decode, normalize and score every article, then sort and truncate
fn bench_semantic_search(c: &mut Criterion) {
    let embedder = StubEmbedder::new(DIM, true);
    let service = MlService::new(Arc::new(embedder.clone()), &AnalysisConfig::default());
    let query = embedder.embed("машинное обучение").unwrap_or_default();

    let mut group = c.benchmark_group("semantic_search");
    for &count in &[10usize, 100, 1_000] {
        let batch = articles(&embedder, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &batch, |b, batch| {
            b.iter(|| service.semantic_search(black_box(&query), black_box(batch), Some(10)))
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let values: Vec<f32> = (0..DIM).map(|i| (i as f32 * 0.37).sin()).collect();
    let encoded = vector::encode(&values);

    c.bench_function("encode_384", |b| b.iter(|| vector::encode(black_box(&values))));
    c.bench_function("decode_384", |b| b.iter(|| vector::decode(black_box(&encoded))));
}

criterion_group!(benches, bench_semantic_search, bench_codec);
criterion_main!(benches);

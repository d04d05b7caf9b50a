use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use minnow::{process_queries, DocumentStatus, ExecutionMode, SearchIndex};

const VOCABULARY: usize = 200;

fn make_text(id: i32, words: usize) -> String {
    (0..words)
        .map(|i| format!("term{}", (id as usize + i * 7) % VOCABULARY))
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_index(doc_count: i32) -> SearchIndex {
    let mut index = SearchIndex::from_text("the of a").unwrap();
    for id in 0..doc_count {
        let text = make_text(id, 12 + (id as usize % 8));
        index
            .add_document(id, &text, DocumentStatus::Actual, &[(id % 10) - 5])
            .unwrap();
    }
    index
}

fn bench_find_top_documents(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_top_documents");
    for doc_count in [1_000, 10_000] {
        let index = build_index(doc_count);
        let query = "term1 term17 term42 -term99";

        group.bench_with_input(
            BenchmarkId::new("sequential", doc_count),
            &index,
            |b, index| {
                b.iter(|| index.find_top_documents(black_box(query)).unwrap());
            },
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", doc_count),
            &index,
            |b, index| {
                b.iter(|| {
                    index
                        .find_top_documents_with_mode(black_box(query), ExecutionMode::Parallel)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

fn bench_process_queries(c: &mut Criterion) {
    let index = build_index(5_000);
    let queries: Vec<String> = (0..64)
        .map(|i| format!("term{} term{}", i % VOCABULARY, (i * 13) % VOCABULARY))
        .collect();

    c.bench_function("process_queries/64", |b| {
        b.iter(|| process_queries(black_box(&index), black_box(&queries)));
    });
}

fn bench_add_remove(c: &mut Criterion) {
    c.bench_function("add_remove_document", |b| {
        let mut index = build_index(1_000);
        b.iter(|| {
            index
                .add_document(1_000_000, "transient fluffy document", DocumentStatus::Actual, &[1])
                .unwrap();
            index.remove_document(1_000_000);
        });
    });
}

criterion_group!(
    benches,
    bench_find_top_documents,
    bench_process_queries,
    bench_add_remove
);
criterion_main!(benches);

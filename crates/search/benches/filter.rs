//! Benchmarks for the filter pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ricambi_search::{apply_filters, partial_similarity, Dataset, Query, Record};

const WORDS: &[&str] = &[
    "cuscinetto", "sfera", "perno", "guarnizione", "filtro", "olio", "vite", "dado", "rondella",
    "motore", "cinghia", "puleggia", "molla", "supporto", "zincato",
];

fn create_dataset(count: usize) -> Dataset {
    (0..count)
        .map(|i| {
            let description = format!(
                "{} {} {} {}",
                WORDS[i % WORDS.len()],
                WORDS[(i / 3) % WORDS.len()],
                WORDS[(i / 7) % WORDS.len()],
                600 + i % 50
            );
            let category = ["Motori", "Filtri", "Viteria", "Trasmissione"][i % 4];
            Record::new(
                Some(format!("C{i:05}").as_str()),
                Some(description.as_str()),
                Some(format!("S{}-{}", i % 20, i % 7).as_str()),
                Some(category),
            )
        })
        .collect()
}

fn bench_partial_similarity(c: &mut Criterion) {
    c.bench_function("partial_similarity", |b| {
        b.iter(|| {
            partial_similarity(
                black_box("cusinetto sfera"),
                black_box("cuscinetto a sfera 608 zz schermato"),
            )
        })
    });
}

fn bench_apply_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_filters");

    for size in [1_000, 10_000].iter() {
        let dataset = create_dataset(*size);
        let narrow = Query::builder()
            .description("cuscinetto sfera")
            .build()
            .unwrap();
        let broad = Query::builder()
            .description("sfera")
            .candidate_row_limit(100)
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("narrow", size), size, |b, _| {
            b.iter(|| apply_filters(black_box(&dataset), black_box(&narrow)).len())
        });
        group.bench_with_input(BenchmarkId::new("broad_skip", size), size, |b, _| {
            b.iter(|| apply_filters(black_box(&dataset), black_box(&broad)).len())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partial_similarity, bench_apply_filters);
criterion_main!(benches);

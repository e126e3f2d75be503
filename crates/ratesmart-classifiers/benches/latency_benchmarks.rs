//! Latency benchmarks for review-intake analysis
//!
//! Analysis runs inline with every review write, so it must stay well under
//! a millisecond for typical review lengths.
//!
//! Run with: cargo bench -p ratesmart-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ratesmart_classifiers::ReviewAnalyzer;

fn benchmark_review_analyzer(c: &mut Criterion) {
    let analyzer = ReviewAnalyzer::new().expect("Failed to create review analyzer");

    let long_review = "The staff were friendly and the food was delicious. ".repeat(40);
    let test_cases = vec![
        ("empty", ""),
        ("short_fake", "ok"),
        ("repetitive", "good good good good good good good good"),
        ("contact", "Contact me at test@example.com for a refund"),
        (
            "substantive",
            "This product exceeded my expectations in every way and I would recommend it",
        ),
        ("long", long_review.as_str()),
    ];

    let mut group = c.benchmark_group("Review_Analyzer");
    group.significance_level(0.05);
    group.sample_size(100);

    for (name, text) in test_cases {
        group.bench_with_input(BenchmarkId::new("analyze", name), &text, |b, text| {
            b.iter(|| analyzer.analyze(black_box(text), black_box(5)));
        });
    }

    group.finish();
}

fn benchmark_components(c: &mut Criterion) {
    let analyzer = ReviewAnalyzer::new().expect("Failed to create review analyzer");
    let text = "Not very good, the battery died after two days and support never replied";
    let normalized = analyzer.normalize(text);

    let mut group = c.benchmark_group("Review_Components");

    group.bench_function("normalize", |b| {
        b.iter(|| analyzer.normalize(black_box(text)));
    });

    group.bench_function("sentiment", |b| {
        b.iter(|| analyzer.sentiment_classifier().classify(black_box(&normalized)));
    });

    group.bench_function("fake_review", |b| {
        b.iter(|| {
            analyzer
                .fake_review_detector()
                .is_fake(black_box(&normalized), black_box(1))
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_review_analyzer, benchmark_components);
criterion_main!(benches);

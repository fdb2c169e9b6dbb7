//! Benchmarks for mdslides compile performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks compile synthetic decks of increasing size, mimicking a
//! recompile on every editor keystroke.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mdslides::parser::{parse_deck, parse_inline, split, ParseOptions};
use mdslides::render::{to_html, RenderOptions};
use mdslides::{compile, compile_with_options, CompileOptions, Compiler};

/// Creates a synthetic document with the given number of slides.
fn create_test_document(slide_count: usize) -> String {
    let mut doc = String::new();
    for i in 0..slide_count {
        if i > 0 {
            doc.push_str("\n---\n\n");
        }
        doc.push_str(&format!("# Slide {}\n\n", i + 1));
        doc.push_str("Some *emphasis*, some **strong text**, `inline code` and a ");
        doc.push_str("[link](https://example.com \"Example\").\n\n");
        doc.push_str("- first point\n- second point\n  - nested detail\n  - another\n- third\n\n");
        doc.push_str("| Metric | Value |\n|:-------|------:|\n| speed | 42 |\n| size | 7 |\n\n");
        doc.push_str("```rust\nfn main() {\n    println!(\"---\");\n}\n```\n\n");
        doc.push_str("> A quote with a ![picture](img.png) inside.\n");
    }
    doc
}

/// Benchmark the splitter alone.
fn bench_split(c: &mut Criterion) {
    let doc = create_test_document(100);
    c.bench_function("split_100_slides", |b| {
        b.iter(|| split(black_box(&doc)));
    });
}

/// Benchmark full compilation at various sizes.
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for slide_count in [1, 10, 100].iter() {
        let doc = create_test_document(*slide_count);

        group.bench_function(format!("{}_slides", slide_count), |b| {
            b.iter(|| compile(black_box(&doc), "default"));
        });

        let sequential = CompileOptions::new().sequential();
        group.bench_function(format!("{}_slides_sequential", slide_count), |b| {
            b.iter(|| compile_with_options(black_box(&doc), &sequential));
        });
    }

    group.finish();
}

/// Benchmark parse and render separately.
fn bench_phases(c: &mut Criterion) {
    let doc = create_test_document(50);
    let options = ParseOptions::default();
    let deck = parse_deck(&doc, &options);
    let render_options = RenderOptions::default();

    c.bench_function("parse_50_slides", |b| {
        b.iter(|| parse_deck(black_box(&doc), &options));
    });

    c.bench_function("render_50_slides", |b| {
        b.iter(|| to_html(black_box(&deck), &render_options));
    });
}

/// Benchmark repeated compiles served from the cache.
fn bench_cached_compile(c: &mut Criterion) {
    let doc = create_test_document(50);
    let mut compiler = Compiler::new().with_cache(4);

    c.bench_function("cached_compile_50_slides", |b| {
        b.iter(|| compiler.compile(black_box(&doc), "dark"));
    });
}

/// Benchmark adversarial nesting.
fn bench_deep_nesting(c: &mut Criterion) {
    let quotes = ">".repeat(5_000) + " deep";
    let emphasis = "*a ".repeat(2_000);

    c.bench_function("deep_blockquotes", |b| {
        b.iter(|| compile(black_box(&quotes), "default"));
    });

    c.bench_function("unmatched_emphasis", |b| {
        b.iter(|| compile(black_box(&emphasis), "default"));
    });
}

/// Benchmark inline parsing of long paragraphs, which must scale linearly.
fn bench_long_paragraphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("long_paragraph");

    for count in [1_000, 10_000, 40_000] {
        let emphasis = "*a* ".repeat(count);
        group.bench_function(format!("emphasis_pairs_{}", count), |b| {
            b.iter(|| parse_inline(black_box(&emphasis)));
        });

        let brackets = "[".repeat(count * 2);
        group.bench_function(format!("open_brackets_{}", count * 2), |b| {
            b.iter(|| parse_inline(black_box(&brackets)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_split,
    bench_compile,
    bench_phases,
    bench_cached_compile,
    bench_deep_nesting,
    bench_long_paragraphs,
);
criterion_main!(benches);

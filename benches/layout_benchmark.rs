//! Benchmarks for layout reconstruction.
//!
//! Run with: cargo bench
//!
//! Pages are synthetic: rows of words on a regular grid, with a ruled
//! table on every page.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relayout::layout::{group_words_by_line, Assembler, LayoutOptions};
use relayout::model::PositionedWord;
use relayout::source::{Edge, RawPage};

/// A page of `lines` text rows, eight words each, plus a 3x3 ruled table.
fn synthetic_page(index: usize, lines: usize) -> RawPage {
    let mut words = Vec::with_capacity(lines * 8);
    for line in 0..lines {
        let top = 40.0 + line as f32 * 14.0;
        for col in 0..8 {
            let x0 = 72.0 + col as f32 * 60.0;
            // Jitter the top a little so grouping has work to do.
            let jitter = (col % 3) as f32 * 0.4;
            let text = format!("w{}_{}", line, col);
            words.push(
                PositionedWord::new(text, x0, x0 + 50.0, top + jitter, top + 11.0)
                    .with_font("Helvetica", 11.0),
            );
        }
    }

    let table_top = 40.0 + lines as f32 * 14.0 + 20.0;
    let mut edges = Vec::new();
    for i in 0..4 {
        let y = table_top + i as f32 * 20.0;
        edges.push(Edge::horizontal(72.0, 372.0, y));
        let x = 72.0 + i as f32 * 100.0;
        edges.push(Edge::vertical(x, table_top, table_top + 60.0));
    }

    RawPage::new(index, 612.0, 792.0)
        .with_words(words)
        .with_edges(edges)
}

/// Benchmark word grouping alone.
fn bench_grouping(c: &mut Criterion) {
    let page = synthetic_page(0, 40);

    c.bench_function("group_words_40_lines", |b| {
        b.iter(|| group_words_by_line(black_box(page.words.clone()), 2.0));
    });
}

/// Benchmark full page assembly at various document sizes.
fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    for page_count in [1, 10, 50].iter() {
        let pages: Vec<RawPage> = (0..*page_count).map(|i| synthetic_page(i, 40)).collect();

        let parallel = Assembler::new(LayoutOptions::default());
        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            b.iter(|| parallel.assemble(black_box(&pages)));
        });

        let sequential = Assembler::new(LayoutOptions::default().sequential());
        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            b.iter(|| sequential.assemble(black_box(&pages)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grouping, bench_assembly);
criterion_main!(benches);

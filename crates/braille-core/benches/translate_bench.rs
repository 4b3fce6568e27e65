//! Criterion benchmarks for table translation.
//!
//! Measures text → cells and cells → text for the bundled tables at a few
//! display-sized inputs (one 40-cell line up to a short paragraph).
//!
//! Run with:
//! ```bash
//! cargo bench --package braille-core --bench translate_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use braille_core::{cells_to_text, text_to_cells, TableLoader, TranslationTable};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const SENTENCE: &str = "the quick brown fox jumps over the lazy dog, and then it sleeps.";

fn text_of_len(len: usize) -> String {
    SENTENCE.chars().cycle().take(len).collect()
}

fn table(name: &str) -> TranslationTable {
    TranslationTable::from_definition(&TableLoader::new().load(name))
}

// ── Benchmarks: forward translation ──────────────────────────────────────────

fn bench_text_to_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_to_cells");

    for name in ["ueb_grade1", "ueb_grade2"] {
        let table = table(name);
        for len in [40usize, 80, 400] {
            let text = text_of_len(len);
            group.bench_with_input(BenchmarkId::new(name, len), &text, |b, text| {
                b.iter(|| text_to_cells(black_box(text), &table))
            });
        }
    }

    group.finish();
}

// ── Benchmarks: back-translation ─────────────────────────────────────────────

fn bench_cells_to_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("cells_to_text");

    for name in ["ueb_grade1", "ueb_grade2"] {
        let table = table(name);
        let matrix = text_to_cells(&text_of_len(80), &table);
        group.bench_with_input(BenchmarkId::new(name, 80), &matrix, |b, matrix| {
            b.iter(|| cells_to_text(black_box(matrix), &table))
        });
    }

    group.finish();
}

// ── Benchmarks: table compilation ────────────────────────────────────────────

fn bench_table_load(c: &mut Criterion) {
    let loader = TableLoader::new();
    c.bench_function("table_load_ueb_grade2", |b| {
        b.iter(|| TranslationTable::from_definition(&loader.load(black_box("ueb_grade2"))))
    });
}

criterion_group!(benches, bench_text_to_cells, bench_cells_to_text, bench_table_load);
criterion_main!(benches);

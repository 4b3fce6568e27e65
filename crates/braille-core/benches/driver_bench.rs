//! Criterion benchmarks for driver report decoding and frame encoding.
//!
//! Decoding runs once per inbound report and encoding once per display
//! refresh, so both sit on the interactive path.
//!
//! Run with:
//! ```bash
//! cargo bench --package braille-core --bench driver_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use braille_core::{BrailleCell, CellMatrix, DotWidth, Driver};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A keys report mixing text, navigation, chords, and dropped bytes.
const KEYS_REPORT: &[u8] = &[
    0x01, b'h', b'e', b'l', b'l', b'o', 0x0D, 0x8D, 0x81, 0x00, b'!', 0x1B, 0x08,
];

/// A routing report pressing four routing keys.
const ROUTING_REPORT: &[u8] = &[0x02, 0, 10, 20, 39];

fn full_line(cells: usize) -> CellMatrix {
    let line = (0..cells)
        .map(|i| BrailleCell::from_mask(DotWidth::Eight, (i % 256) as u8).unwrap_or(BrailleCell::empty(DotWidth::Eight)))
        .collect();
    CellMatrix::new(line, Some(cells / 2)).unwrap()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("driver_decode");
    let mut focus = Driver::focus();
    let mut generic = Driver::generic_hid();

    group.bench_function("focus_keys_report", |b| {
        b.iter(|| focus.decode(black_box(KEYS_REPORT)))
    });
    group.bench_function("focus_routing_report", |b| {
        b.iter(|| focus.decode(black_box(ROUTING_REPORT)))
    });
    group.bench_function("generic_hid_text", |b| {
        b.iter(|| generic.decode(black_box(b"hello world\n")))
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("driver_encode");
    let mut focus = Driver::focus();
    let mut handytech = Driver::handytech();
    let line40 = full_line(40);
    let line80 = full_line(80);

    group.bench_function("focus_40_cells", |b| b.iter(|| focus.encode(black_box(&line40))));
    group.bench_function("focus_80_cells", |b| b.iter(|| focus.encode(black_box(&line80))));
    group.bench_function("handytech_80_cells", |b| {
        b.iter(|| handytech.encode(black_box(&line80)))
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);

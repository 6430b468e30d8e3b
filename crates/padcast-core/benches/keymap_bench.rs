//! Criterion benchmarks for the per-event hot path.
//!
//! Every button press goes through keybind resolution and a key table
//! lookup before it reaches the injection backend.  These benchmarks cover
//! both steps and the table build done once at start-up.
//!
//! Run with:
//! ```bash
//! cargo bench --package padcast-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use padcast_core::domain::layout::arrow_layout;
use padcast_core::{ItemIndex, KeyEvent, KeyTable, Platform, PlayerId};

// ── Representative key names ──────────────────────────────────────────────────

const BENCH_KEY_NAMES: &[&str] = &[
    "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "w", "a", "s", "d", "W", "Shift",
    "Control", " ", "Enter", "Escape", "F1", "F12", "Numpad5", "KeyQ", "Digit1",
    "NotAKey",
];

// ── Benchmarks: key table ────────────────────────────────────────────────────

fn bench_key_table_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_table");

    for platform in [Platform::Linux, Platform::Windows] {
        let table = KeyTable::for_platform(platform);

        group.bench_with_input(
            BenchmarkId::new("lookup_single", format!("{platform:?}")),
            &table,
            |b, table| b.iter(|| table.lookup(black_box("ArrowUp"))),
        );

        group.bench_with_input(
            BenchmarkId::new("lookup_batch_20", format!("{platform:?}")),
            &table,
            |b, table| {
                b.iter(|| {
                    BENCH_KEY_NAMES
                        .iter()
                        .map(|name| table.lookup(black_box(name)).is_ok())
                        .filter(|&found| found)
                        .count()
                })
            },
        );
    }

    group.bench_function("build_linux", |b| {
        b.iter(|| KeyTable::for_platform(black_box(Platform::Linux)))
    });

    group.finish();
}

// ── Benchmarks: event parse + resolve ────────────────────────────────────────

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let index = ItemIndex::from_layout(&arrow_layout());

    group.bench_function("override", |b| {
        b.iter(|| index.resolve(black_box("up_button"), black_box(PlayerId(2))))
    });

    group.bench_function("default_fallback", |b| {
        b.iter(|| index.resolve(black_box("up_button"), black_box(PlayerId(99))))
    });

    group.bench_function("parse_and_resolve", |b| {
        let table = KeyTable::for_platform(Platform::Linux);
        b.iter(|| {
            let event = KeyEvent::parse(black_box(r#"{"itemId":"left_button","action":"down"}"#)).ok()?;
            let key = index.resolve(&event.item_id, PlayerId(3)).ok()?;
            table.lookup(key).ok()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_key_table_lookup, bench_resolve);
criterion_main!(benches);

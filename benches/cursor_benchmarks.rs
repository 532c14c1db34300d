//! Benchmarks for cursor motion and insert-mode typing.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use oxidevim_buffer::{Cursor, LineDirection, TextBuffer};
use oxidevim_core::{Config, Editor, FileNode, GraphData, KeyPress, PlatformInfo};

/// Generates a large text string for benchmarking.
fn generate_large_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("Line {}: This is a sample line of text for benchmarking purposes.\n", i))
        .collect()
}

/// Benchmarks offset to line/column conversion.
fn bench_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("position");

    for size in [100, 1000, 10000, 100000].iter() {
        let buffer = TextBuffer::from(generate_large_text(*size));
        let mut cursor = Cursor::new();
        cursor.set_offset(buffer.len_chars() / 2, &buffer);

        group.bench_with_input(BenchmarkId::new("middle", size), &buffer, |b, buffer| {
            b.iter(|| black_box(cursor.position(black_box(buffer))))
        });
    }

    group.finish();
}

/// Benchmarks vertical and horizontal motions.
fn bench_motion(c: &mut Criterion) {
    let mut group = c.benchmark_group("motion");

    let buffer = TextBuffer::from(generate_large_text(10000));

    group.bench_function("move_line_down_1000", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new();
            for _ in 0..1000 {
                cursor.move_line(LineDirection::Down, &buffer);
            }
            black_box(cursor)
        })
    });

    group.bench_function("move_by_1000", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new();
            for _ in 0..1000 {
                cursor.move_by(black_box(1), &buffer);
            }
            black_box(cursor)
        })
    });

    group.finish();
}

/// Benchmarks typing through the full key dispatch path.
fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");

    let project = GraphData {
        nodes: vec![FileNode {
            id: "big.rs".to_string(),
            name: "big.rs".to_string(),
            content: generate_large_text(10000),
            group: 1,
        }],
        links: Vec::new(),
    };
    let keys = KeyPress::parse_sequence("jjjjjifn main() {}<CR><Esc>").unwrap();

    group.bench_function("insert_line", |b| {
        b.iter_with_setup(
            || Editor::new(Config::default(), project.clone(), PlatformInfo::detect()).unwrap(),
            |mut editor| {
                for key in &keys {
                    editor.handle_key(*key);
                }
                black_box(editor)
            },
        )
    });

    group.finish();
}

criterion_group!(benches, bench_position, bench_motion, bench_typing);
criterion_main!(benches);

//! Benchmarks for toolbar transforms.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use markpad::format::{FormatAction, apply};

fn bench_format(c: &mut Criterion) {
    let text = (0..2_000)
        .map(|i| format!("line {i} with some words"))
        .collect::<Vec<_>>()
        .join("\n");
    let len = text.chars().count();
    let middle = len / 2;

    c.bench_function("format_bold_small_selection", |b| {
        b.iter(|| apply(black_box(&text), middle..middle + 10, FormatAction::Bold))
    });

    c.bench_function("format_ordered_list_whole_document", |b| {
        b.iter(|| apply(black_box(&text), 0..len, FormatAction::OrderedList))
    });
}

criterion_group!(benches, bench_format);
criterion_main!(benches);

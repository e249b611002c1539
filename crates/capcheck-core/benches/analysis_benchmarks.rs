//! Benchmarks for segmentation and analysis
//!
//! Generates synthetic caption and news documents so results do not depend
//! on external files.

use capcheck_core::{
    analysis::rules::baseline::BaselineRule,
    analyze_lines, analyze_text_by_type,
    parser::{collect_runs, TextLines},
    segment::{parse_news, parse_subs},
    timing::format_timecode,
    AnalysisOptions, RuleSet, ScriptType,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::{fmt::Write, hint::black_box};

const PAYLOADS: [&str; 5] = [
    "Today we look at the 5 biggest stories.",
    "The market rose 12 percent overnight",
    "\"We are not going anywhere,\" she said.",
    "Same text",
    "Same text",
];

/// Caption document with `rows` timestamp rows
fn caption_document(rows: usize) -> String {
    let mut text = String::new();
    let mut frame = 0;
    for i in 0..rows {
        let payload = PAYLOADS[i % PAYLOADS.len()];
        let duration = 30 + u32::try_from(i % 4).unwrap_or(0) * 15;
        let _ = writeln!(
            text,
            "{}\t{}\n{payload}",
            format_timecode(frame),
            format_timecode(frame + duration)
        );
        frame += duration;
    }
    text
}

/// News script with `blocks` VO/SUPER blocks
fn news_document(blocks: usize) -> String {
    let mut text = String::new();
    for i in 0..blocks {
        let _ = writeln!(text, "{:03}_{:04}", i / 10, i);
        if i % 3 == 0 {
            let _ = writeln!(text, "/*SUPER: 标题{i}*/\nHeadline number {i}\n");
        } else {
            let _ = writeln!(text, "VO:\n今天的新闻{i}\nToday in the news, story {i}.\n");
        }
    }
    text
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    for size in [100, 1_000] {
        let captions = TextLines::new(&caption_document(size));
        let news = TextLines::new(&news_document(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("subs", size), &captions, |b, lines| {
            b.iter(|| parse_subs(black_box(lines), false));
        });
        group.bench_with_input(BenchmarkId::new("runs", size), &captions, |b, lines| {
            b.iter(|| collect_runs(black_box(lines), false));
        });
        group.bench_with_input(BenchmarkId::new("news", size), &news, |b, lines| {
            b.iter(|| parse_news(black_box(lines)));
        });
    }
    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let rules = RuleSet::builtin();
    let options = AnalysisOptions::default();
    let mut group = c.benchmark_group("analysis");
    for size in [100, 1_000] {
        let captions = caption_document(size);
        group.throughput(Throughput::Bytes(captions.len() as u64));
        group.bench_with_input(BenchmarkId::new("segments", size), &captions, |b, text| {
            b.iter(|| analyze_text_by_type(black_box(text), ScriptType::Subs, &rules, &options));
        });
        group.bench_with_input(BenchmarkId::new("lines", size), &captions, |b, text| {
            b.iter(|| analyze_lines(black_box(text), &rules, &options));
        });
    }
    group.finish();
}

fn bench_baseline(c: &mut Criterion) {
    let baseline = caption_document(500);
    let mut current = caption_document(500);
    current.push_str("00:10:00:00\t00:10:01:00\nExtra row\n");
    let rule = BaselineRule::new(&baseline);
    let lines = TextLines::new(&current);
    c.bench_function("baseline_align_500", |b| {
        b.iter(|| rule.compare(black_box(&lines)));
    });
}

criterion_group!(benches, bench_segmentation, bench_analysis, bench_baseline);
criterion_main!(benches);

//! Criterion benchmarks for the EOD analyzer.
//!
//! Benchmarks:
//! 1. Parsing a full-day scanner log
//! 2. Full analysis (parse → trajectories → filter → windows → rank)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gaplab_core::{parse_lines, AnalysisConfig, EodAnalyzer};

// ── Helpers ──────────────────────────────────────────────────────────

/// One Top-N block per minute from 09:30 to 16:00 for `tickers` symbols.
fn make_log(tickers: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for cycle in 0..390_u32 {
        let hour = 9 + (30 + cycle) / 60;
        let minute = (30 + cycle) % 60;
        lines.push(format!(
            "2025-10-08 {hour:02}:{minute:02}:00,000 [INFO] Top {tickers} movers by gap %:"
        ));
        for t in 0..tickers {
            let drift = (f64::from(cycle) * 0.05 + t as f64).sin() * 0.4;
            let price = 5.0 + t as f64 * 0.25 + drift + f64::from(cycle) * 0.002;
            let volume = 0.5 + t as f64 * 0.1 + f64::from(cycle) * 0.01;
            lines.push(format!(
                "2025-10-08 {hour:02}:{minute:02}:00,000 [INFO]    T{t:03}: score={:.1} chg=+{:.1}% last={price:.2} vol={volume:.1}M",
                50.0 + drift * 10.0,
                drift * 10.0,
            ));
        }
    }
    lines
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_log");
    for tickers in [5, 20, 50] {
        let log = make_log(tickers);
        group.bench_with_input(BenchmarkId::from_parameter(tickers), &log, |b, log| {
            b.iter(|| parse_lines(black_box(log)))
        });
    }
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let analyzer = EodAnalyzer::new(AnalysisConfig::default()).expect("default config is valid");
    let mut group = c.benchmark_group("analyze_day");
    for tickers in [5, 20, 50] {
        let log = make_log(tickers);
        group.bench_with_input(BenchmarkId::from_parameter(tickers), &log, |b, log| {
            b.iter(|| analyzer.analyze_lines(black_box(log)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_analyze);
criterion_main!(benches);

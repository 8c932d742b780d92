// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 性能基准测试套件
//!
//! 覆盖驱动器热路径上的ID编码、工作项构造与日志行编解码。

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use resolvrs::domain::models::ResolvedEntry;
use resolvrs::domain::services::{ProbeStats, ResultStore};
use resolvrs::infrastructure::storage::FileResultLog;
use resolvrs::queue::WorkItem;
use resolvrs::utils::id_codec;
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// 基准测试：ID编码
///
/// 不同量级的ID对应不同的token长度
fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("id_encode");

    for id in [61u64, 238_327, 56_800_235_583, u64::MAX].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(id), id, |b, &id| {
            b.iter(|| black_box(id_codec::encode(black_box(id))));
        });
    }

    group.bench_function("sequential_10k", |b| {
        b.iter(|| {
            for id in 1_000_000u64..1_010_000 {
                black_box(id_codec::encode(id));
            }
        });
    });

    group.finish();
}

/// 基准测试：工作项构造
fn benchmark_work_item(c: &mut Criterion) {
    c.bench_function("work_item_new", |b| {
        let mut id = 0u64;
        b.iter(|| {
            id = id.wrapping_add(1);
            black_box(WorkItem::new(id, "https://sho.rt"))
        });
    });
}

/// 基准测试：日志行编解码
fn benchmark_log_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_line");
    let entry = ResolvedEntry::redirect("aZ09x", "https://destination.example/path?q=1");
    let line = entry.to_log_line();

    group.bench_function("to_log_line", |b| {
        b.iter(|| black_box(entry.to_log_line()));
    });
    group.bench_function("parse_log_line", |b| {
        b.iter(|| black_box(ResolvedEntry::parse_log_line(line.trim_end())));
    });
    group.bench_function("redirect_with_escaping", |b| {
        b.iter(|| {
            black_box(ResolvedEntry::redirect(
                "aZ09x",
                "https://destination.example/a,b,c",
            ))
        });
    });

    group.finish();
}

/// 基准测试：结果记录
///
/// 阈值设为不触发落盘，只测量内存中的批次合并
fn benchmark_record(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let dir = tempfile::TempDir::new().unwrap();
    let store = ResultStore::new(
        FileResultLog::new(dir.path().join("bench.csv")),
        Arc::new(ProbeStats::new()),
        usize::MAX,
    );

    c.bench_function("result_store_record", |b| {
        let mut id = 0u64;
        b.iter(|| {
            id = id.wrapping_add(1);
            let entry = ResolvedEntry::not_found(id_codec::encode(id % 100_000));
            rt.block_on(store.record(entry));
        });
    });
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_work_item,
    benchmark_log_line,
    benchmark_record
);
criterion_main!(benches);

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ResolvedEntry;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// 启动时从结果日志统计出的基线
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsBaseline {
    /// 既有重定向记录数
    pub redirects: u64,
    /// 既有未找到记录数
    pub not_found: u64,
}

impl StatsBaseline {
    pub fn count(&mut self, entry: &ResolvedEntry) {
        if entry.is_not_found() {
            self.not_found += 1;
        } else {
            self.redirects += 1;
        }
    }
}

/// 探测统计
///
/// 所有计数器均为无锁原子操作，可在任意工作器上更新，
/// 报告方随时读取不会阻塞写入方。由调用方显式构造并以 `Arc` 共享。
#[derive(Debug)]
pub struct ProbeStats {
    total_attempted: AtomicU64,
    total_redirects: AtomicU64,
    total_not_found: AtomicU64,
    requests: AtomicU64,
    request_errors: AtomicU64,
    request_not_found: AtomicU64,
    request_successes: AtomicU64,
    started: Instant,
    started_at: DateTime<Utc>,
}

/// 统计快照
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub rate: f64,
    pub total_attempted: u64,
    pub total_redirects: u64,
    pub total_not_found: u64,
    pub requests: u64,
    pub request_errors: u64,
    pub request_not_found: u64,
    pub request_successes: u64,
}

impl Default for ProbeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeStats {
    pub fn new() -> Self {
        Self {
            total_attempted: AtomicU64::new(0),
            total_redirects: AtomicU64::new(0),
            total_not_found: AtomicU64::new(0),
            requests: AtomicU64::new(0),
            request_errors: AtomicU64::new(0),
            request_not_found: AtomicU64::new(0),
            request_successes: AtomicU64::new(0),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// 叠加启动基线到累计计数器
    pub fn apply_baseline(&self, baseline: &StatsBaseline) {
        self.total_redirects
            .fetch_add(baseline.redirects, Ordering::Relaxed);
        self.total_not_found
            .fetch_add(baseline.not_found, Ordering::Relaxed);
    }

    /// 每个出队的ID都会计数，包括被跳过的
    pub fn record_attempt(&self) {
        self.total_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip(&self) {
        counter!("probe_skipped_total").increment(1);
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        counter!("probe_requests_total").increment(1);
    }

    pub fn record_success(&self) {
        self.request_successes.fetch_add(1, Ordering::Relaxed);
        counter!("probe_success_total").increment(1);
    }

    pub fn record_not_found(&self) {
        self.request_not_found.fetch_add(1, Ordering::Relaxed);
        counter!("probe_not_found_total").increment(1);
    }

    pub fn record_error(&self) {
        self.request_errors.fetch_add(1, Ordering::Relaxed);
        counter!("probe_errors_total").increment(1);
    }

    /// 记录一条进入待写批次的结果，更新累计计数器
    pub fn record_resolved(&self, entry: &ResolvedEntry) {
        if entry.is_not_found() {
            self.total_not_found.fetch_add(1, Ordering::Relaxed);
        } else {
            self.total_redirects.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn total_attempted(&self) -> u64 {
        self.total_attempted.load(Ordering::Relaxed)
    }

    pub fn total_redirects(&self) -> u64 {
        self.total_redirects.load(Ordering::Relaxed)
    }

    pub fn total_not_found(&self) -> u64 {
        self.total_not_found.load(Ordering::Relaxed)
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn request_errors(&self) -> u64 {
        self.request_errors.load(Ordering::Relaxed)
    }

    pub fn request_not_found(&self) -> u64 {
        self.request_not_found.load(Ordering::Relaxed)
    }

    pub fn request_successes(&self) -> u64 {
        self.request_successes.load(Ordering::Relaxed)
    }

    /// 本次运行的每秒请求数
    ///
    /// # 返回值
    ///
    /// 请求数除以启动以来的秒数；尚未经过可测时间时返回 0
    pub fn rate(&self) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.requests() as f64 / elapsed
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            elapsed_secs: self.started.elapsed().as_secs_f64(),
            rate: self.rate(),
            total_attempted: self.total_attempted(),
            total_redirects: self.total_redirects(),
            total_not_found: self.total_not_found(),
            requests: self.requests(),
            request_errors: self.request_errors(),
            request_not_found: self.request_not_found(),
            request_successes: self.request_successes(),
        }
    }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use metrics::counter;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::domain::models::ResolvedEntry;
use crate::domain::repositories::ResultLog;
use crate::domain::services::stats::{ProbeStats, StatsBaseline};
use crate::utils::errors::StoreError;

/// 默认落盘阈值
pub const DEFAULT_FLUSH_THRESHOLD: usize = 10_000;

/// 启动加载结果
#[derive(Debug, Default)]
pub struct LoadedResults {
    /// 已解析token集合，仅用于跳过判断
    pub resolved: HashSet<String>,
    /// 日志中既有记录对应的统计基线
    pub baseline: StatsBaseline,
}

/// 结果存储
///
/// 工作器把结果写入受同一把锁保护的待写批次；批次超过阈值时，
/// 在持有锁的情况下交换出整个批次并追加到日志，保证不会重复落盘，
/// 也不会丢失落盘期间的写入。
pub struct ResultStore<L: ResultLog> {
    log: L,
    stats: Arc<ProbeStats>,
    flush_threshold: usize,
    pending: Mutex<HashMap<String, ResolvedEntry>>,
}

impl<L: ResultLog> ResultStore<L> {
    /// 创建新的结果存储实例
    ///
    /// # 参数
    ///
    /// * `log` - 结果日志
    /// * `stats` - 共享统计，`record` 时更新累计计数器
    /// * `flush_threshold` - 待写批次超过该条数时落盘
    pub fn new(log: L, stats: Arc<ProbeStats>, flush_threshold: usize) -> Self {
        Self {
            log,
            stats,
            flush_threshold,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// 加载既有结果
    ///
    /// 日志不存在时返回空集合。重复token只保留一次，
    /// 但每一行都计入基线。
    ///
    /// # 返回值
    ///
    /// * `Ok(LoadedResults)` - 已解析集合与统计基线
    /// * `Err(StoreError::MalformedLine)` - 某行不是恰好两个字段，不能继续运行
    pub async fn load(&self) -> Result<LoadedResults, StoreError> {
        let Some(content) = self.log.read_all().await? else {
            info!(location = %self.log.location(), "Result log not found, starting empty");
            return Ok(LoadedResults::default());
        };

        let mut loaded = LoadedResults::default();
        for (index, line) in content.lines().enumerate() {
            let entry =
                ResolvedEntry::parse_log_line(line).ok_or_else(|| StoreError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                })?;
            loaded.baseline.count(&entry);
            loaded.resolved.insert(entry.token);
        }

        info!(
            location = %self.log.location(),
            resolved = loaded.resolved.len(),
            redirects = loaded.baseline.redirects,
            not_found = loaded.baseline.not_found,
            "Loaded result log"
        );
        Ok(loaded)
    }

    /// 记录一条结果
    ///
    /// 同一token的待写记录会被覆盖。批次超过阈值时在锁内落盘；
    /// 落盘失败只会被报告，该批次丢失。
    pub async fn record(&self, entry: ResolvedEntry) {
        let mut pending = self.pending.lock().await;
        self.stats.record_resolved(&entry);
        pending.insert(entry.token.clone(), entry);

        if pending.len() > self.flush_threshold {
            let batch = std::mem::take(&mut *pending);
            // Lock stays held until the append finishes
            let _ = self.write_batch(batch).await;
        }
    }

    /// 落盘全部待写记录
    ///
    /// 批次为空时不触碰日志。
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 写入的记录数
    /// * `Err(StoreError)` - 追加失败，批次已丢弃
    pub async fn flush(&self) -> Result<usize, StoreError> {
        let mut pending = self.pending.lock().await;
        let batch = std::mem::take(&mut *pending);
        self.write_batch(batch).await
    }

    /// 当前待写批次大小
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn write_batch(&self, batch: HashMap<String, ResolvedEntry>) -> Result<usize, StoreError> {
        if batch.is_empty() {
            debug!("No pending results to flush");
            return Ok(0);
        }

        let entries: Vec<ResolvedEntry> = batch.into_values().collect();
        match self.log.append(&entries).await {
            Ok(()) => {
                counter!("result_flush_total").increment(1);
                debug!(count = entries.len(), location = %self.log.location(), "Flushed results");
                Ok(entries.len())
            }
            Err(e) => {
                counter!("result_flush_failures_total").increment(1);
                error!(
                    location = %self.log.location(),
                    lost = entries.len(),
                    error = %e,
                    "Failed to append results"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "result_store_test.rs"]
mod tests;

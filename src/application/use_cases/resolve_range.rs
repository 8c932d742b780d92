// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::settings::WorkerSettings;
use crate::domain::models::{Completion, Outcome};
use crate::domain::repositories::ResultLog;
use crate::domain::services::{ProbeStats, ResultStore};
use crate::engines::traits::ProbeEngineFactory;
use crate::queue::work_queue::{self, WorkItem};
use crate::utils::errors::ResolveError;
use crate::workers::{PoolContext, WorkerPool};

/// 一次范围解析的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// 提交到工作队列的ID数
    pub submitted: u64,
    /// 收到的完成信号数
    pub completed: u64,
    /// 已在既有结果中而跳过的ID数
    pub skipped: u64,
    pub successes: u64,
    pub not_found: u64,
    pub errors: u64,
    /// 是否因取消提前结束
    pub cancelled: bool,
}

impl RunSummary {
    fn tally(&mut self, completion: &Completion) {
        self.completed += 1;
        match completion {
            Completion::Skipped(_) => self.skipped += 1,
            Completion::Probed(_, Outcome::Success(_)) => self.successes += 1,
            Completion::Probed(_, Outcome::NotFound(_)) => self.not_found += 1,
            Completion::Probed(_, Outcome::Error) => self.errors += 1,
        }
    }
}

/// 范围解析用例
///
/// 按递增顺序枚举 `[start, end)`，编码为token后送入工作池，
/// 等待与提交数相同的完成信号后统一落盘
pub struct RangeResolver<L: ResultLog + 'static> {
    workers: WorkerSettings,
    base_url: String,
    factory: Arc<dyn ProbeEngineFactory>,
    context: PoolContext<L>,
}

impl<L: ResultLog + 'static> RangeResolver<L> {
    /// 创建新的范围解析用例
    ///
    /// # 参数
    ///
    /// * `workers` - 工作池配置
    /// * `base_url` - 短链接服务根地址
    /// * `factory` - 探测引擎工厂
    /// * `stats` - 共享统计
    /// * `store` - 结果存储
    /// * `resolved` - 启动时加载的已解析集合，运行期间只读
    pub fn new(
        workers: WorkerSettings,
        base_url: impl Into<String>,
        factory: Arc<dyn ProbeEngineFactory>,
        stats: Arc<ProbeStats>,
        store: Arc<ResultStore<L>>,
        resolved: Arc<HashSet<String>>,
    ) -> Self {
        Self {
            workers,
            base_url: base_url.into(),
            factory,
            context: PoolContext {
                stats,
                store,
                resolved,
            },
        }
    }

    /// 解析 `[start, end)` 范围内的全部ID
    ///
    /// 生产与收集在同一循环内交替进行：工作队列满时生产方等待，
    /// 同时继续接收完成信号，避免两个有界通道互相阻塞。
    /// 收到取消信号后停止提交，关闭工作池，仍会执行最终落盘。
    ///
    /// # 返回值
    ///
    /// * `Ok(RunSummary)` - 运行汇总
    /// * `Err(ResolveError)` - 范围无效、引擎创建失败或工作器全部退出
    pub async fn resolve_range(
        &self,
        start: u64,
        end: u64,
        cancel: CancellationToken,
    ) -> Result<RunSummary, ResolveError> {
        if start > end {
            return Err(ResolveError::InvalidRange { start, end });
        }

        let (work_tx, queue) = work_queue::channel(self.workers.queue_capacity);
        let (done_tx, mut done_rx) = mpsc::channel(self.workers.completion_capacity);
        let pool = WorkerPool::start(
            self.workers.count,
            self.factory.as_ref(),
            queue,
            done_tx,
            self.context.clone(),
            self.workers.shutdown_grace(),
        )?;

        info!(start, end, workers = pool.size(), "Resolving range");

        let mut summary = RunSummary::default();
        let mut next = start;
        let result = loop {
            if next >= end && summary.completed >= summary.submitted {
                break Ok(());
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(next, "Range resolution cancelled");
                    summary.cancelled = true;
                    break Ok(());
                }
                completion = done_rx.recv(), if summary.completed < summary.submitted => {
                    match completion {
                        Some(completion) => summary.tally(&completion),
                        None => break Err(ResolveError::CompletionChannelClosed),
                    }
                }
                permit = work_tx.reserve(), if next < end => {
                    match permit {
                        Ok(permit) => {
                            permit.send(WorkItem::new(next, &self.base_url));
                            next += 1;
                            summary.submitted += 1;
                        }
                        Err(_) => break Err(ResolveError::WorkQueueClosed),
                    }
                }
            }
        };

        drop(work_tx);
        pool.shutdown().await;
        // Completions that were already queued when the loop stopped
        while let Ok(completion) = done_rx.try_recv() {
            summary.tally(&completion);
        }

        match self.context.store.flush().await {
            Ok(written) => info!(written, "Final flush complete"),
            Err(e) => error!(error = %e, "Final flush failed"),
        }

        result?;
        info!(
            submitted = summary.submitted,
            completed = summary.completed,
            skipped = summary.skipped,
            successes = summary.successes,
            not_found = summary.not_found,
            errors = summary.errors,
            cancelled = summary.cancelled,
            "Range resolution finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "resolve_range_test.rs"]
mod tests;

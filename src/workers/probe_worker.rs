// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::models::{Completion, Outcome, ResolvedEntry};
use crate::domain::repositories::ResultLog;
use crate::domain::services::{ProbeStats, ResultStore};
use crate::engines::traits::{ProbeEngine, ProbeResponse};
use crate::queue::{SharedQueue, WorkItem};

/// 重定向状态码
const STATUS_FOUND: u16 = 302;
/// 未找到状态码
const STATUS_NOT_FOUND: u16 = 404;

/// 探测工作者
///
/// 独占一个探测引擎，从共享队列取出工作项，每个ID只探测一次
pub struct ProbeWorker<L: ResultLog> {
    worker_id: usize,
    engine: Box<dyn ProbeEngine>,
    stats: Arc<ProbeStats>,
    store: Arc<ResultStore<L>>,
    resolved: Arc<HashSet<String>>,
}

impl<L: ResultLog> ProbeWorker<L> {
    /// 创建新的探测工作器实例
    pub fn new(
        worker_id: usize,
        engine: Box<dyn ProbeEngine>,
        stats: Arc<ProbeStats>,
        store: Arc<ResultStore<L>>,
        resolved: Arc<HashSet<String>>,
    ) -> Self {
        Self {
            worker_id,
            engine,
            stats,
            store,
            resolved,
        }
    }

    /// 运行探测工作器
    ///
    /// 队列关闭或收到取消信号时退出；取消时正在进行的探测被放弃
    pub async fn run(
        self,
        queue: SharedQueue,
        completions: mpsc::Sender<Completion>,
        shutdown: CancellationToken,
    ) {
        debug!(worker_id = self.worker_id, engine = self.engine.name(), "Probe worker started");

        loop {
            let item = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                item = queue.recv() => match item {
                    Some(item) => item,
                    None => break,
                },
            };

            let Some(completion) = self.process(item, &shutdown).await else {
                break;
            };

            tokio::select! {
                biased;
                sent = completions.send(completion) => {
                    if sent.is_err() {
                        break;
                    }
                }
                _ = shutdown.cancelled() => break,
            }
        }

        debug!(worker_id = self.worker_id, "Probe worker stopped");
    }

    /// 处理单个工作项
    ///
    /// # 返回值
    ///
    /// * `Some(Completion)` - 处理完成
    /// * `None` - 探测过程中收到取消信号，结果被放弃
    #[instrument(skip(self, item, shutdown), fields(worker_id = self.worker_id, id = item.id))]
    pub async fn process(&self, item: WorkItem, shutdown: &CancellationToken) -> Option<Completion> {
        self.stats.record_attempt();

        if self.resolved.contains(&item.token) {
            self.stats.record_skip();
            return Some(Completion::Skipped(item.id));
        }

        self.stats.record_request();
        let response = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!(url = %item.url, "Abandoning in-flight probe");
                return None;
            }
            response = self.engine.probe(&item.url) => response,
        };

        let outcome = match response {
            Ok(response) => classify(&item, &response),
            Err(e) => {
                debug!(url = %item.url, error = %e, "Probe failed");
                Outcome::Error
            }
        };

        match &outcome {
            Outcome::Success(entry) => {
                self.stats.record_success();
                self.store.record(entry.clone()).await;
            }
            Outcome::NotFound(entry) => {
                self.stats.record_not_found();
                self.store.record(entry.clone()).await;
            }
            Outcome::Error => self.stats.record_error(),
        }

        Some(Completion::Probed(item.id, outcome))
    }
}

/// 根据响应状态对探测结果分类
///
/// 302 且 Location 可解析为成功，404 为未找到，其余均为错误
pub fn classify(item: &WorkItem, response: &ProbeResponse) -> Outcome {
    match response.status_code {
        STATUS_FOUND => match resolve_location(&item.url, response.location.as_deref()) {
            Some(target) => Outcome::Success(ResolvedEntry::redirect(item.token.as_str(), &target)),
            None => {
                debug!(url = %item.url, location = ?response.location, "Unparseable redirect location");
                Outcome::Error
            }
        },
        STATUS_NOT_FOUND => Outcome::NotFound(ResolvedEntry::not_found(item.token.as_str())),
        status => {
            debug!(url = %item.url, status, "Unexpected status");
            Outcome::Error
        }
    }
}

/// 相对于请求URL解析 Location 头
fn resolve_location(request_url: &str, location: Option<&str>) -> Option<String> {
    let location = location.filter(|l| !l.trim().is_empty())?;
    let base = Url::parse(request_url).ok()?;
    base.join(location).ok().map(String::from)
}

#[cfg(test)]
#[path = "probe_worker_test.rs"]
mod tests;

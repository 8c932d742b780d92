// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::domain::models::Completion;
use crate::domain::repositories::ResultLog;
use crate::domain::services::{ProbeStats, ResultStore};
use crate::engines::traits::{EngineError, ProbeEngineFactory};
use crate::queue::SharedQueue;
use crate::workers::probe_worker::ProbeWorker;

/// 工作池共享的依赖
pub struct PoolContext<L: ResultLog> {
    pub stats: Arc<ProbeStats>,
    pub store: Arc<ResultStore<L>>,
    pub resolved: Arc<HashSet<String>>,
}

impl<L: ResultLog> Clone for PoolContext<L> {
    fn clone(&self) -> Self {
        Self {
            stats: self.stats.clone(),
            store: self.store.clone(),
            resolved: self.resolved.clone(),
        }
    }
}

/// 探测工作池
///
/// 持有全部工作器句柄与共享取消令牌
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    shutdown: CancellationToken,
    grace: Duration,
}

impl WorkerPool {
    /// 启动工作池
    ///
    /// 为每个工作器单独创建探测引擎，任一引擎创建失败时已启动的工作器会被取消
    ///
    /// # 参数
    ///
    /// * `count` - 工作器数量
    /// * `factory` - 探测引擎工厂
    /// * `queue` - 共享工作队列
    /// * `completions` - 完成通道
    /// * `context` - 统计、存储与已解析集合
    /// * `grace` - 关闭时等待工作器退出的时间
    pub fn start<L: ResultLog + 'static>(
        count: usize,
        factory: &dyn ProbeEngineFactory,
        queue: SharedQueue,
        completions: mpsc::Sender<Completion>,
        context: PoolContext<L>,
        grace: Duration,
    ) -> Result<Self, EngineError> {
        let shutdown = CancellationToken::new();
        let mut handles = Vec::with_capacity(count);

        for worker_id in 0..count {
            let engine = match factory.create() {
                Ok(engine) => engine,
                Err(e) => {
                    error!(worker_id, error = %e, "Failed to create probe engine");
                    shutdown.cancel();
                    return Err(e);
                }
            };

            let worker = ProbeWorker::new(
                worker_id,
                engine,
                context.stats.clone(),
                context.store.clone(),
                context.resolved.clone(),
            );
            handles.push(tokio::spawn(worker.run(
                queue.clone(),
                completions.clone(),
                shutdown.clone(),
            )));
        }

        info!(count, "Worker pool started");
        Ok(Self {
            handles,
            shutdown,
            grace,
        })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// 关闭工作池
    ///
    /// 取消所有工作器并在宽限时间内等待其退出，超时后强制中止
    pub async fn shutdown(self) {
        info!("Shutting down workers...");
        self.shutdown.cancel();

        let aborts: Vec<_> = self.handles.iter().map(JoinHandle::abort_handle).collect();
        match timeout(self.grace, join_all(self.handles)).await {
            Ok(results) => {
                for result in results {
                    if let Err(e) = result {
                        if e.is_panic() {
                            error!("Probe worker panicked: {}", e);
                        }
                    }
                }
                info!("Workers shut down successfully");
            }
            Err(_) => {
                warn!(
                    grace_secs = self.grace.as_secs_f64(),
                    "Workers did not stop within grace period, aborting"
                );
                for abort in aborts {
                    abort.abort();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::ProbeStats;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// 启动周期性进度报告
///
/// 每个间隔读取一次统计快照并输出，不会阻塞工作器的写入
pub fn spawn_reporter(
    stats: Arc<ProbeStats>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let snapshot = stats.snapshot();
                    info!(
                        rps = %format!("{:.2}", snapshot.rate),
                        total = snapshot.total_attempted,
                        total_redirects = snapshot.total_redirects,
                        total_not_found = snapshot.total_not_found,
                        requests = snapshot.requests,
                        errors = snapshot.request_errors,
                        not_found = snapshot.request_not_found,
                        success = snapshot.request_successes,
                        "stats"
                    );
                }
            }
        }
    })
}

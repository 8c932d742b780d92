// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 探测统计（stats）：原子计数器与速率计算
/// - 结果存储（result_store）：启动加载、批次记录与落盘
pub mod result_store;
pub mod stats;

pub use result_store::{LoadedResults, ResultStore, DEFAULT_FLUSH_THRESHOLD};
pub use stats::{ProbeStats, StatsBaseline, StatsSnapshot};

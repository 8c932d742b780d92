// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供探测工作器与工作池生命周期管理
pub mod manager;
pub mod probe_worker;

pub use manager::{PoolContext, WorkerPool};
pub use probe_worker::ProbeWorker;

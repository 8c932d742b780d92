// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供结果日志的文件实现与 Prometheus 指标导出
pub mod metrics;
pub mod storage;

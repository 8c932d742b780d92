// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含范围解析用例与进度报告
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含已解析记录、统计与结果存储
pub mod domain;

/// 引擎模块
///
/// 实现基于HTTP的短链接探测引擎与DNS缓存
pub mod engines;

/// 基础设施模块
///
/// 提供结果日志文件与指标导出
pub mod infrastructure;

/// 队列模块
///
/// 实现驱动器与工作器之间的有界工作队列
pub mod queue;

/// 工具模块
///
/// 提供ID编码、错误类型与日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现探测工作器与工作池管理
pub mod workers;

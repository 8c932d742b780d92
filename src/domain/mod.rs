// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：已解析记录与探测结果
/// - 仓库接口（repositories）：结果日志的持久化抽象
/// - 服务（services）：统计与结果存储
///
/// 领域层不依赖任何具体的网络或文件实现。
pub mod models;
pub mod repositories;
pub mod services;

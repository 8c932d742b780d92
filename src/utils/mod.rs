// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供ID编码、错误类型和日志初始化
pub mod errors;
pub mod id_codec;
pub mod telemetry;

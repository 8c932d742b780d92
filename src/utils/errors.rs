// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::EngineError;
use thiserror::Error;

/// 结果存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("存储I/O错误: {0}")]
    Io(#[from] std::io::Error),

    /// 记录行不是恰好两个逗号分隔的字段
    #[error("第 {line} 行格式错误: {content:?}")]
    MalformedLine { line: usize, content: String },
}

/// 范围解析错误类型
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("无效范围: [{start}, {end})")]
    InvalidRange { start: u64, end: u64 },

    #[error("引擎错误: {0}")]
    Engine(#[from] EngineError),

    #[error("工作队列已关闭")]
    WorkQueueClosed,

    #[error("完成通道已关闭，所有工作器已退出")]
    CompletionChannelClosed,
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义已解析记录、单次探测结果以及完成信号
pub mod resolved_entry;

pub use resolved_entry::{Completion, Outcome, ResolvedEntry};

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// 包含范围解析用例
pub mod resolve_range;

pub use resolve_range::{RangeResolver, RunSummary};

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含范围解析用例与周期性进度报告
pub mod reporter;
pub mod use_cases;

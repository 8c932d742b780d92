// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 实现驱动器与工作池之间的有界工作队列
pub mod work_queue;

pub use work_queue::{SharedQueue, WorkItem};

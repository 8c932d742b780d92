// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ResolvedEntry;
use crate::utils::errors::StoreError;
use async_trait::async_trait;

/// 结果日志特质
///
/// 只追加的持久化记录，每条记录一行 `token,target`
#[async_trait]
pub trait ResultLog: Send + Sync {
    /// 读取日志全部内容
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(String))` - 日志内容
    /// * `Ok(None)` - 日志尚不存在
    /// * `Err(StoreError)` - 读取失败
    async fn read_all(&self) -> Result<Option<String>, StoreError>;

    /// 追加一批记录
    async fn append(&self, entries: &[ResolvedEntry]) -> Result<(), StoreError>;

    /// 日志位置描述，用于诊断输出
    fn location(&self) -> String;
}

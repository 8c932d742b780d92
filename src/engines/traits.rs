// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败（连接、超时、TLS）
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 客户端构建失败
    #[error("Failed to build client: {0}")]
    ClientBuild(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 探测响应
///
/// 只保留分类所需的部分，响应体已被读取并丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 原始 Location 头，缺失或不是合法 UTF-8 时为 None
    pub location: Option<String>,
}

/// 探测引擎特质
///
/// 每个工作器独占一个引擎实例，引擎不得自动跟随重定向
#[async_trait]
pub trait ProbeEngine: Send + Sync {
    /// 对URL发起一次探测
    async fn probe(&self, url: &str) -> Result<ProbeResponse, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

/// 探测引擎工厂
///
/// 工作池启动时为每个工作器调用一次
pub trait ProbeEngineFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn ProbeEngine>, EngineError>;
}

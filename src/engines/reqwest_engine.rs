// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{DnsSettings, HttpSettings};
use crate::engines::dns_cache::CachingResolver;
use crate::engines::traits::{EngineError, ProbeEngine, ProbeEngineFactory, ProbeResponse};
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 探测引擎
///
/// 基于reqwest实现，发送 HEAD 请求，不跟随重定向
pub struct ReqwestProbeEngine {
    client: reqwest::Client,
}

impl ReqwestProbeEngine {
    /// 构建引擎及其专属的HTTP客户端与DNS缓存
    ///
    /// # 参数
    ///
    /// * `http` - HTTP客户端配置
    /// * `dns` - DNS缓存配置
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestProbeEngine)` - 引擎实例
    /// * `Err(EngineError)` - 客户端构建失败
    pub fn new(http: &HttpSettings, dns: &DnsSettings) -> Result<Self, EngineError> {
        let resolver = CachingResolver::new(
            Duration::from_secs(dns.positive_ttl_secs),
            Duration::from_secs(dns.negative_ttl_secs),
        );

        let client = reqwest::Client::builder()
            .user_agent(http.user_agent.as_str())
            // A redirect must be captured at the first hop
            .redirect(Policy::none())
            .timeout(Duration::from_secs(http.timeout_secs))
            .connect_timeout(Duration::from_secs(http.tls_handshake_timeout_secs))
            .pool_max_idle_per_host(http.max_idle_per_host)
            .dns_resolver(Arc::new(resolver))
            .build()
            .map_err(|e| EngineError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ProbeEngine for ReqwestProbeEngine {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, EngineError> {
        let response = self.client.head(url).send().await?;

        let status_code = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        // Drain the body so the connection can return to the pool
        if let Err(e) = response.bytes().await {
            debug!(url, error = %e, "Failed to drain response body");
        }

        Ok(ProbeResponse {
            status_code,
            location,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// reqwest 引擎工厂
///
/// 每次调用都构建独立的客户端，工作器之间不共享连接池
#[derive(Debug, Clone)]
pub struct ReqwestEngineFactory {
    http: HttpSettings,
    dns: DnsSettings,
}

impl ReqwestEngineFactory {
    pub fn new(http: HttpSettings, dns: DnsSettings) -> Self {
        Self { http, dns }
    }
}

impl ProbeEngineFactory for ReqwestEngineFactory {
    fn create(&self) -> Result<Box<dyn ProbeEngine>, EngineError> {
        Ok(Box::new(ReqwestProbeEngine::new(&self.http, &self.dns)?))
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;

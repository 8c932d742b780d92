// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// 应用程序配置设置
///
/// 包含探测目标、工作池、HTTP客户端、DNS缓存、存储、日志与指标等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 探测目标配置
    pub target: TargetSettings,
    /// 工作池配置
    pub workers: WorkerSettings,
    /// HTTP客户端配置
    pub http: HttpSettings,
    /// DNS缓存配置
    pub dns: DnsSettings,
    /// 结果存储配置
    pub storage: StorageSettings,
    /// 进度报告配置
    pub reporting: ReportingSettings,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 指标导出配置
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// 探测目标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSettings {
    /// 短链接服务根地址，探测URL为 `<base_url>/<token>`
    pub base_url: String,
}

/// 工作池配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// 并发工作器数量
    pub count: usize,
    /// 工作队列容量
    pub queue_capacity: usize,
    /// 完成通道容量
    pub completion_capacity: usize,
    /// 关闭时等待工作器退出的宽限时间（秒）
    pub shutdown_grace_secs: u64,
}

impl WorkerSettings {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// HTTP客户端配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 单次请求总超时（秒）
    pub timeout_secs: u64,
    /// 连接与TLS握手超时（秒）
    pub tls_handshake_timeout_secs: u64,
    /// 每个主机保留的最大空闲连接数
    pub max_idle_per_host: usize,
    /// User-Agent
    pub user_agent: String,
}

/// DNS缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DnsSettings {
    /// 解析成功结果的缓存时间（秒）
    pub positive_ttl_secs: u64,
    /// 解析失败结果的缓存时间（秒）
    pub negative_ttl_secs: u64,
}

/// 结果存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 结果日志文件路径
    pub data_path: String,
    /// 待写批次超过该条数时落盘
    pub flush_threshold: usize,
}

/// 进度报告配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingSettings {
    /// 报告间隔（秒）
    pub interval_secs: u64,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// EnvFilter 过滤规则
    pub filter: String,
    /// 输出格式 (text, json)
    pub format: String,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 监听地址，未设置时不启动导出
    pub listen_addr: Option<String>,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `RESOLVRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("RESOLVRS").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("target.base_url", "https://git.io")?
            .set_default("workers.count", 1500)?
            .set_default("workers.queue_capacity", 8192)?
            .set_default("workers.completion_capacity", 8192)?
            .set_default("workers.shutdown_grace_secs", 25)?
            .set_default("http.timeout_secs", 20)?
            .set_default("http.tls_handshake_timeout_secs", 20)?
            .set_default("http.max_idle_per_host", 1024)?
            .set_default(
                "http.user_agent",
                format!("resolvrs/{}", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("dns.positive_ttl_secs", 24 * 60 * 60)?
            .set_default("dns.negative_ttl_secs", 5)?
            .set_default("storage.data_path", "data.txt")?
            .set_default("storage.flush_threshold", 10_000)?
            .set_default("reporting.interval_secs", 5)?
            .set_default("logging.filter", "info,resolvrs=debug")?
            .set_default("logging.format", "text")
    }

    /// 校验配置
    ///
    /// 拒绝容量为零的工作池、通道与批次，以及无法解析的目标地址
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero_checks = [
            ("workers.count", self.workers.count),
            ("workers.queue_capacity", self.workers.queue_capacity),
            ("workers.completion_capacity", self.workers.completion_capacity),
            ("storage.flush_threshold", self.storage.flush_threshold),
        ];
        if let Some((key, _)) = zero_checks.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Message(format!("{} must be greater than 0", key)));
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "http.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let base = Url::parse(&self.target.base_url).map_err(|e| {
            ConfigError::Message(format!(
                "target.base_url {:?} is not a valid URL: {}",
                self.target.base_url, e
            ))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Message(format!(
                "target.base_url must use http or https, got {}",
                base.scheme()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

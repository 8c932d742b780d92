// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use clap::Parser;
use resolvrs::application::reporter::spawn_reporter;
use resolvrs::application::use_cases::RangeResolver;
use resolvrs::config::settings::Settings;
use resolvrs::domain::services::{ProbeStats, ResultStore};
use resolvrs::engines::reqwest_engine::ReqwestEngineFactory;
use resolvrs::infrastructure::metrics::init_metrics;
use resolvrs::infrastructure::storage::FileResultLog;
use resolvrs::utils::telemetry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "resolvrs", version, about = "Resolve a range of short links")]
struct Cli {
    /// 起始ID（包含）
    start: u64,
    /// 结束ID（不包含）
    end: u64,
    /// 覆盖 workers.count
    #[arg(long)]
    workers: Option<usize>,
    /// 覆盖 storage.data_path
    #[arg(long)]
    data: Option<String>,
    /// 覆盖 target.base_url
    #[arg(long)]
    base_url: Option<String>,
}

/// 主函数
///
/// 加载配置与既有结果，解析给定范围后退出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    if cli.start > cli.end {
        anyhow::bail!("start ({}) must not exceed end ({})", cli.start, cli.end);
    }

    // 1. Load configuration
    let mut settings = Settings::new().context("failed to load configuration")?;
    if let Some(workers) = cli.workers {
        settings.workers.count = workers;
    }
    if let Some(data) = cli.data {
        settings.storage.data_path = data;
    }
    if let Some(base_url) = cli.base_url {
        settings.target.base_url = base_url;
    }
    settings.validate().context("invalid configuration")?;

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.logging);
    info!(start = cli.start, end = cli.end, "Starting resolvrs");

    if let Some(addr) = &settings.metrics.listen_addr {
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("invalid metrics.listen_addr {:?}", addr))?;
        init_metrics(addr);
    }

    // 3. Load previously resolved results
    let stats = Arc::new(ProbeStats::new());
    let store = Arc::new(ResultStore::new(
        FileResultLog::new(&settings.storage.data_path),
        stats.clone(),
        settings.storage.flush_threshold,
    ));
    let loaded = store.load().await.map_err(|e| {
        error!(error = %e, path = %settings.storage.data_path, "Result log is corrupt");
        e
    })?;
    stats.apply_baseline(&loaded.baseline);

    // 4. Wire the resolver
    let factory = Arc::new(ReqwestEngineFactory::new(
        settings.http.clone(),
        settings.dns.clone(),
    ));
    let resolver = RangeResolver::new(
        settings.workers.clone(),
        settings.target.base_url.clone(),
        factory,
        stats.clone(),
        store,
        Arc::new(loaded.resolved),
    );

    let cancel = CancellationToken::new();
    let reporter = spawn_reporter(
        stats.clone(),
        Duration::from_secs(settings.reporting.interval_secs.max(1)),
        cancel.child_token(),
    );
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown signal received");
                    cancel.cancel();
                }
                Err(err) => error!("Unable to listen for shutdown signal: {}", err),
            }
        }
    });

    // 5. Resolve
    let summary = resolver
        .resolve_range(cli.start, cli.end, cancel.clone())
        .await?;

    cancel.cancel();
    if let Err(e) = reporter.await {
        error!("Reporter task failed: {}", e);
    }

    info!(
        summary = %serde_json::to_string(&summary)?,
        stats = %serde_json::to_string(&stats.snapshot())?,
        "Run complete"
    );
    Ok(())
}

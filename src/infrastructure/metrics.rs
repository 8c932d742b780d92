// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 在指定地址启动 Prometheus 导出器并注册探测相关指标。
/// 安装失败（例如端口被占用）只记录警告。
pub fn init_metrics(addr: SocketAddr) {
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder on {}: {}", addr, e);
        return;
    }

    describe_counter!("probe_requests_total", "Total number of probe requests issued");
    describe_counter!("probe_success_total", "Total number of probes answered with a redirect");
    describe_counter!("probe_not_found_total", "Total number of probes answered with 404");
    describe_counter!(
        "probe_errors_total",
        "Total number of probes that failed or returned an unexpected status"
    );
    describe_counter!(
        "probe_skipped_total",
        "Total number of identifiers skipped because they were already resolved"
    );
    describe_counter!("result_flush_total", "Total number of successful result log appends");
    describe_counter!(
        "result_flush_failures_total",
        "Total number of failed result log appends"
    );

    info!("Metrics exporter listening on {}", addr);
}

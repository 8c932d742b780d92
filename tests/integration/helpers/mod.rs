// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use resolvrs::application::use_cases::RangeResolver;
use resolvrs::config::settings::{DnsSettings, HttpSettings, WorkerSettings};
use resolvrs::domain::services::{ProbeStats, ResultStore};
use resolvrs::engines::reqwest_engine::ReqwestEngineFactory;
use resolvrs::infrastructure::storage::FileResultLog;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 桩短链接服务的行为
#[derive(Default)]
pub struct StubState {
    /// 返回 302 的token
    pub redirects: HashSet<String>,
    /// 返回 500 的token
    pub failures: HashSet<String>,
    pub calls: AtomicUsize,
}

impl StubState {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn target_for(token: &str) -> String {
    format!("https://dest.example/{}", token)
}

async fn handle(State(state): State<Arc<StubState>>, uri: Uri) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let token = uri.path().trim_start_matches('/');

    if state.failures.contains(token) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if state.redirects.contains(token) {
        return (StatusCode::FOUND, [(header::LOCATION, target_for(token))]).into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

pub struct StubServer {
    pub base_url: String,
    pub state: Arc<StubState>,
}

/// 在随机端口启动桩服务
pub async fn spawn_stub(state: StubState) -> StubServer {
    let state = Arc::new(state);
    let app = Router::new().fallback(handle).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{}", addr),
        state,
    }
}

pub fn worker_settings(count: usize) -> WorkerSettings {
    WorkerSettings {
        count,
        queue_capacity: 4,
        completion_capacity: 4,
        shutdown_grace_secs: 5,
    }
}

pub fn http_factory() -> Arc<ReqwestEngineFactory> {
    Arc::new(ReqwestEngineFactory::new(
        HttpSettings {
            timeout_secs: 5,
            tls_handshake_timeout_secs: 5,
            max_idle_per_host: 16,
            user_agent: "resolvrs-test".to_string(),
        },
        DnsSettings {
            positive_ttl_secs: 60,
            negative_ttl_secs: 1,
        },
    ))
}

/// 按进程启动流程组装：加载既有结果、应用基线、构建解析器
pub async fn build_resolver(
    base_url: &str,
    data_path: &Path,
    workers: usize,
) -> (RangeResolver<FileResultLog>, Arc<ProbeStats>) {
    let stats = Arc::new(ProbeStats::new());
    let store = Arc::new(ResultStore::new(
        FileResultLog::new(data_path),
        stats.clone(),
        100,
    ));
    let loaded = store.load().await.unwrap();
    stats.apply_baseline(&loaded.baseline);

    let resolver = RangeResolver::new(
        worker_settings(workers),
        base_url,
        http_factory(),
        stats.clone(),
        store,
        Arc::new(loaded.resolved),
    );
    (resolver, stats)
}

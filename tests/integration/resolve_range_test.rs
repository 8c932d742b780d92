// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{build_resolver, spawn_stub, target_for, StubState};
use resolvrs::utils::id_codec::encode;
use std::collections::HashSet;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn even_tokens(end: u64) -> HashSet<String> {
    (0..end).filter(|id| id % 2 == 0).map(encode).collect()
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    let mut lines: Vec<String> = std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    lines.sort();
    lines
}

#[tokio::test]
async fn test_resolve_small_range_against_stub() {
    let stub = spawn_stub(StubState {
        redirects: even_tokens(5),
        ..Default::default()
    })
    .await;
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("resolved.csv");

    let (resolver, stats) = build_resolver(&stub.base_url, &data, 3).await;
    let summary = resolver
        .resolve_range(0, 5, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.submitted, 5);
    assert_eq!(summary.completed, 5);
    assert_eq!(summary.successes, 3);
    assert_eq!(summary.not_found, 2);
    assert_eq!(summary.errors, 0);
    assert!(!summary.cancelled);
    assert_eq!(stub.state.calls(), 5);

    assert_eq!(stats.requests(), 5);
    assert_eq!(stats.request_successes(), 3);
    assert_eq!(stats.total_not_found(), 2);
    assert_eq!(stats.total_redirects(), 3);

    let expected = {
        let mut lines = vec![
            format!(",{}", target_for("")),
            "1,".to_string(),
            format!("2,{}", target_for("2")),
            "3,".to_string(),
            format!("4,{}", target_for("4")),
        ];
        lines.sort();
        lines
    };
    assert_eq!(read_lines(&data), expected);
}

#[tokio::test]
async fn test_second_run_skips_everything_already_resolved() {
    let stub = spawn_stub(StubState {
        redirects: even_tokens(20),
        ..Default::default()
    })
    .await;
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("resolved.csv");

    let (first, _) = build_resolver(&stub.base_url, &data, 4).await;
    first
        .resolve_range(0, 20, CancellationToken::new())
        .await
        .unwrap();
    let calls_after_first = stub.state.calls();
    let lines_after_first = read_lines(&data);
    assert_eq!(calls_after_first, 20);
    assert_eq!(lines_after_first.len(), 20);

    let (second, stats) = build_resolver(&stub.base_url, &data, 4).await;
    assert_eq!(stats.total_redirects(), 10);
    assert_eq!(stats.total_not_found(), 10);

    let summary = second
        .resolve_range(0, 20, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.completed, 20);
    assert_eq!(summary.skipped, 20);
    assert_eq!(stub.state.calls(), calls_after_first);
    assert_eq!(stats.requests(), 0);
    assert_eq!(read_lines(&data), lines_after_first);
}

#[tokio::test]
async fn test_server_errors_are_not_persisted() {
    let stub = spawn_stub(StubState {
        redirects: ["1".to_string()].into_iter().collect(),
        failures: ["2".to_string(), "3".to_string()].into_iter().collect(),
        ..Default::default()
    })
    .await;
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("resolved.csv");

    let (resolver, stats) = build_resolver(&stub.base_url, &data, 2).await;
    let summary = resolver
        .resolve_range(1, 4, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.completed, 3);
    assert_eq!(summary.successes, 1);
    assert_eq!(summary.errors, 2);
    assert_eq!(stats.request_errors(), 2);
    assert_eq!(read_lines(&data), vec![format!("1,{}", target_for("1"))]);

    // Errors are retried on the next run
    let (retry, _) = build_resolver(&stub.base_url, &data, 2).await;
    let summary = retry
        .resolve_range(1, 4, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.errors, 2);
}

#[tokio::test]
async fn test_unreachable_target_counts_errors() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let dir = TempDir::new().unwrap();
    let data = dir.path().join("resolved.csv");

    let (resolver, stats) = build_resolver(&base_url, &data, 2).await;
    let summary = resolver
        .resolve_range(0, 4, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.completed, 4);
    assert_eq!(summary.errors, 4);
    assert_eq!(stats.request_errors(), 4);
    assert!(!data.exists());
}

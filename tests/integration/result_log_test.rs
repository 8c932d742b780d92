// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use resolvrs::domain::services::{ProbeStats, ResultStore};
use resolvrs::infrastructure::storage::FileResultLog;
use resolvrs::utils::errors::StoreError;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_load_builds_skip_set_and_baseline() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("resolved.csv");
    std::fs::write(
        &data,
        "abc,https://x.example/1\ndef,\nghi,https://x.example/2\n",
    )
    .unwrap();

    let stats = Arc::new(ProbeStats::new());
    let store = ResultStore::new(FileResultLog::new(&data), stats.clone(), 10);
    let loaded = store.load().await.unwrap();
    stats.apply_baseline(&loaded.baseline);

    assert_eq!(loaded.resolved.len(), 3);
    assert!(loaded.resolved.contains("def"));
    assert_eq!(stats.total_redirects(), 2);
    assert_eq!(stats.total_not_found(), 1);
    assert_eq!(stats.requests(), 0);
}

#[tokio::test]
async fn test_load_rejects_malformed_log() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("resolved.csv");
    std::fs::write(&data, "abc,https://x.example/1\nbroken\n").unwrap();

    let store = ResultStore::new(
        FileResultLog::new(&data),
        Arc::new(ProbeStats::new()),
        10,
    );
    match store.load().await {
        Err(StoreError::MalformedLine { line, content }) => {
            assert_eq!(line, 2);
            assert_eq!(content, "broken");
        }
        other => panic!("expected malformed line error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_records_append_across_runs() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("nested").join("resolved.csv");

    let stats = Arc::new(ProbeStats::new());
    let store = ResultStore::new(FileResultLog::new(&data), stats.clone(), 10);
    store
        .record(resolvrs::domain::models::ResolvedEntry::not_found("a"))
        .await;
    store.flush().await.unwrap();

    let store = ResultStore::new(FileResultLog::new(&data), stats, 10);
    store
        .record(resolvrs::domain::models::ResolvedEntry::redirect(
            "b",
            "https://x.example/b",
        ))
        .await;
    store.flush().await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&data).unwrap(),
        "a,\nb,https://x.example/b\n"
    );
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// 缓存的解析结果
#[derive(Debug, Clone)]
enum CachedLookup {
    Resolved {
        addrs: Arc<[SocketAddr]>,
        expires_at: Instant,
    },
    Failed {
        message: String,
        expires_at: Instant,
    },
}

impl CachedLookup {
    fn expires_at(&self) -> Instant {
        match self {
            CachedLookup::Resolved { expires_at, .. } | CachedLookup::Failed { expires_at, .. } => {
                *expires_at
            }
        }
    }

    fn to_result(&self, host: &str) -> io::Result<Vec<SocketAddr>> {
        match self {
            CachedLookup::Resolved { addrs, .. } => Ok(addrs.to_vec()),
            CachedLookup::Failed { message, .. } => Err(io::Error::other(format!(
                "cached lookup failure for {}: {}",
                host, message
            ))),
        }
    }
}

/// 带缓存的DNS解析器
///
/// 成功结果与失败结果分别按各自的 TTL 缓存
#[derive(Debug, Clone)]
pub struct CachingResolver {
    positive_ttl: Duration,
    negative_ttl: Duration,
    entries: Arc<DashMap<String, CachedLookup>>,
}

impl CachingResolver {
    /// 创建新的解析器
    ///
    /// # 参数
    ///
    /// * `positive_ttl` - 解析成功结果的缓存时间
    /// * `negative_ttl` - 解析失败结果的缓存时间
    pub fn new(positive_ttl: Duration, negative_ttl: Duration) -> Self {
        Self {
            positive_ttl,
            negative_ttl,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// 解析主机名，优先使用未过期的缓存
    pub async fn lookup(&self, host: &str) -> io::Result<Vec<SocketAddr>> {
        if let Some(result) = self.cached(host) {
            return result;
        }

        let result = tokio::net::lookup_host((host, 0))
            .await
            .map(|addrs| addrs.collect::<Vec<_>>())
            .and_then(|addrs| {
                if addrs.is_empty() {
                    Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no addresses for {}", host),
                    ))
                } else {
                    Ok(addrs)
                }
            });

        let now = Instant::now();
        let entry = match &result {
            Ok(addrs) => CachedLookup::Resolved {
                addrs: addrs.as_slice().into(),
                expires_at: now + self.positive_ttl,
            },
            Err(e) => {
                debug!(host, error = %e, "DNS lookup failed");
                CachedLookup::Failed {
                    message: e.to_string(),
                    expires_at: now + self.negative_ttl,
                }
            }
        };
        self.entries.insert(host.to_string(), entry);
        result
    }

    fn cached(&self, host: &str) -> Option<io::Result<Vec<SocketAddr>>> {
        let now = Instant::now();
        let hit = self.entries.get(host).map(|entry| entry.value().clone())?;
        if hit.expires_at() <= now {
            self.entries
                .remove_if(host, |_, entry| entry.expires_at() <= now);
            return None;
        }
        Some(hit.to_result(host))
    }

    /// 当前缓存条目数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Resolve for CachingResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let addrs = resolver.lookup(name.as_str()).await?;
            let addrs: Addrs = Box::new(addrs.into_iter());
            Ok(addrs)
        })
    }
}

#[cfg(test)]
#[path = "dns_cache_test.rs"]
mod tests;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::id_codec;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// 工作项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// 数字ID
    pub id: u64,
    /// 编码后的token
    pub token: String,
    /// 探测URL
    pub url: String,
}

impl WorkItem {
    /// 由数字ID构造工作项
    pub fn new(id: u64, base_url: &str) -> Self {
        let token = id_codec::encode(id);
        let url = id_codec::probe_url(base_url, &token);
        Self { id, token, url }
    }
}

/// 多个工作器共享的有界工作队列接收端
#[derive(Debug, Clone)]
pub struct SharedQueue {
    receiver: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
}

impl SharedQueue {
    /// 取出下一个工作项
    ///
    /// # 返回值
    ///
    /// * `Some(WorkItem)` - 工作项
    /// * `None` - 发送端已全部关闭且队列已空
    pub async fn recv(&self) -> Option<WorkItem> {
        self.receiver.lock().await.recv().await
    }
}

/// 创建有界工作队列
///
/// 队列满时发送方会等待，这是唯一的背压机制
pub fn channel(capacity: usize) -> (mpsc::Sender<WorkItem>, SharedQueue) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        sender,
        SharedQueue {
            receiver: Arc::new(Mutex::new(receiver)),
        },
    )
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// 已解析的短链接记录
///
/// `target` 为空表示目标服务返回了 404。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedEntry {
    /// 短链接token
    pub token: String,
    /// 重定向目标，未找到时为空
    pub target: String,
}

impl ResolvedEntry {
    /// 创建重定向记录
    ///
    /// 目标中的 `,` 与换行会被百分号编码，保证每条日志行恰好两个字段
    pub fn redirect(token: impl Into<String>, target: &str) -> Self {
        Self {
            token: token.into(),
            target: escape_target(target),
        }
    }

    /// 创建未找到记录
    pub fn not_found(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            target: String::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.target.is_empty()
    }

    /// 序列化为日志行 `token,target\n`
    pub fn to_log_line(&self) -> String {
        format!("{},{}\n", self.token, self.target)
    }

    /// 解析日志行
    ///
    /// # 返回值
    ///
    /// * `Some(ResolvedEntry)` - 行内恰好有两个逗号分隔的字段
    /// * `None` - 字段数不为二
    pub fn parse_log_line(line: &str) -> Option<Self> {
        let mut fields = line.split(',');
        let token = fields.next()?;
        let target = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
            target: target.to_string(),
        })
    }
}

fn escape_target(target: &str) -> String {
    if !target.contains([',', '\n', '\r']) {
        return target.to_string();
    }
    let mut escaped = String::with_capacity(target.len() + 8);
    for c in target.chars() {
        match c {
            ',' => escaped.push_str("%2C"),
            '\n' => escaped.push_str("%0A"),
            '\r' => escaped.push_str("%0D"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// 单次探测的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 302 重定向，附带解析后的目标
    Success(ResolvedEntry),
    /// 404，目标为空
    NotFound(ResolvedEntry),
    /// 传输错误或协议异常，不持久化
    Error,
}

impl Outcome {
    pub fn entry(&self) -> Option<&ResolvedEntry> {
        match self {
            Outcome::Success(entry) | Outcome::NotFound(entry) => Some(entry),
            Outcome::Error => None,
        }
    }
}

/// 工作器发往驱动器的完成信号
///
/// 每个提交的ID恰好产生一个完成信号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// token 已在既有结果中，未发起请求
    Skipped(u64),
    /// 发起了一次探测
    Probed(u64, Outcome),
}

impl Completion {
    pub fn id(&self) -> u64 {
        match self {
            Completion::Skipped(id) | Completion::Probed(id, _) => *id,
        }
    }
}

#[cfg(test)]
#[path = "resolved_entry_test.rs"]
mod tests;

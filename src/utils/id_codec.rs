// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 62进制符号表：数字、大写字母、小写字母
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// u64 在62进制下的最大位数
const MAX_SYMBOLS: usize = 11;

/// 将数字ID编码为短链接token
///
/// 反复除以62，按产生顺序输出余数对应的符号，即最低位符号在前。
/// 这不是标准的62进制位置表示法：历史记录中的token依赖这个输出顺序，
/// 结果不能再反转。
///
/// `encode(0)` 返回空字符串。
///
/// # 参数
///
/// * `id` - 待编码的数字ID
///
/// # 返回值
///
/// 编码后的token
pub fn encode(mut id: u64) -> String {
    let mut out = String::with_capacity(MAX_SYMBOLS);
    while id > 0 {
        out.push(ALPHABET[(id % 62) as usize] as char);
        id /= 62;
    }
    out
}

/// 拼接探测URL：`<base_url>/<token>`
pub fn probe_url(base_url: &str, token: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), token)
}

#[cfg(test)]
#[path = "id_codec_test.rs"]
mod tests;

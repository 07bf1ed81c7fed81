// src/utils.rs

use md5::{Digest, Md5};
use std::{
    process,
    sync::atomic::{AtomicU64, Ordering},
};

// 与数据库 push() 生成的键使用同一字母表，按 ASCII 排序即按时间排序
const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
static PUSH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 生成 20 位、按时间递增的节点键: 8 位毫秒时间戳 + 12 位随机部分
pub fn generate_push_id() -> String {
    let now = chrono::Utc::now();
    let mut id = String::with_capacity(20);

    let mut millis = now.timestamp_millis().max(0) as u64;
    let mut stamp = [0u8; 8];
    for slot in stamp.iter_mut().rev() {
        *slot = PUSH_CHARS[(millis % 64) as usize];
        millis /= 64;
    }
    id.extend(stamp.iter().map(|&b| b as char));

    let mut hasher = Md5::new();
    hasher.update(now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    hasher.update(PUSH_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    hasher.update(process::id().to_le_bytes());
    let digest = hasher.finalize();
    id.extend(digest.iter().take(12).map(|b| PUSH_CHARS[(b % 64) as usize] as char));
    id
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

/// 去除首尾空白，空字符串视为未填写
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

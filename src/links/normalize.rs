// src/links/normalize.rs

use super::{LinkClass, NormalizedLinks};
use crate::constants::providers;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

// 依次尝试 watch 参数、短链路径、embed 路径，最左侧的匹配生效
static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)").unwrap()
});
static FILE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").unwrap());

pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn extract_file_id(url: &str) -> Option<&str> {
    FILE_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 根据类别生成嵌入、查看、下载链接。
///
/// 从不返回错误: 提取不到 ID 时原样返回输入链接，调用方总能拿到可用的嵌入地址。
pub fn normalize(url: &str, class: LinkClass) -> NormalizedLinks {
    match class {
        LinkClass::VideoHost => normalize_video(url),
        LinkClass::FileHost => normalize_file(url),
        LinkClass::Unrecognized => NormalizedLinks::unchanged(url),
    }
}

fn normalize_video(url: &str) -> NormalizedLinks {
    match extract_video_id(url) {
        Some(id) => NormalizedLinks {
            embed_url: format!("{}{}", providers::video::EMBED_BASE, id),
            view_url: format!("{}{}", providers::video::WATCH_BASE, id),
            download_url: None,
        },
        None => {
            debug!("未能从视频链接中提取 ID，使用原链接: {}", url);
            NormalizedLinks {
                embed_url: url.to_string(),
                view_url: url.to_string(),
                download_url: None,
            }
        }
    }
}

fn normalize_file(url: &str) -> NormalizedLinks {
    match extract_file_id(url) {
        Some(id) => NormalizedLinks {
            embed_url: format!("{}{}/preview", providers::file::FILE_BASE, id),
            view_url: format!("{}{}/view", providers::file::FILE_BASE, id),
            download_url: Some(format!("{}{}", providers::file::DOWNLOAD_BASE, id)),
        },
        None => {
            debug!("未能从云盘链接中提取文件 ID，使用原链接: {}", url);
            NormalizedLinks::unchanged(url)
        }
    }
}

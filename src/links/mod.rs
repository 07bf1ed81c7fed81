// src/links/mod.rs

pub mod classify;
pub mod normalize;

pub use classify::{LinkClass, classify};
pub use normalize::{extract_file_id, extract_video_id, normalize};

use serde::Serialize;

/// 每次展示资源时即时计算的链接，不会写回数据库
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLinks {
    pub embed_url: String,
    pub view_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl NormalizedLinks {
    fn unchanged(url: &str) -> Self {
        Self {
            embed_url: url.to_string(),
            view_url: url.to_string(),
            download_url: Some(url.to_string()),
        }
    }
}

pub fn resolve_links(url: &str) -> NormalizedLinks {
    normalize(url, classify(url))
}

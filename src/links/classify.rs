// src/links/classify.rs

use crate::constants::providers;
use serde::Serialize;

/// 链接来源的服务商类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkClass {
    /// 视频托管站点 (含短链域名)
    VideoHost,
    /// 云盘文件托管站点
    FileHost,
    Unrecognized,
}

/// 仅按子串判断链接类别，不解析 URL 也不访问网络。
///
/// 格式不合法但包含域名标记的字符串同样会被识别，旧数据依赖这一点。
/// 视频标记优先，因此任一链接只会落入一个类别。
pub fn classify(url: &str) -> LinkClass {
    if is_video_link(url) {
        LinkClass::VideoHost
    } else if is_file_link(url) {
        LinkClass::FileHost
    } else {
        LinkClass::Unrecognized
    }
}

pub fn is_video_link(url: &str) -> bool {
    url.contains(providers::video::DOMAIN_MARKER) || url.contains(providers::video::SHORT_LINK_MARKER)
}

pub fn is_file_link(url: &str) -> bool {
    url.contains(providers::file::DOMAIN_MARKER)
}

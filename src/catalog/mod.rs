// src/catalog/mod.rs

pub mod admin;
pub mod index;
pub mod locator;
pub mod views;

pub use admin::{Catalog, CourseInput, ResourceInput};
pub use index::ResourceIndex;
pub use locator::{duplicate_resource_ids, locate_course_item, locate_resource};

use crate::{
    links::{self, LinkClass, NormalizedLinks},
    models::{Resource, Snapshot},
};
use serde::Serialize;

/// 打开一个资源时展示给用户的全部信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResource {
    pub resource: Resource,
    pub link_class: LinkClass,
    pub links: NormalizedLinks,
}

/// 按 ID 查找资源并生成可嵌入链接，找不到时返回 `None`
pub fn open_resource(snapshot: &Snapshot, resource_id: &str) -> Option<ResolvedResource> {
    let resource = locate_resource(&snapshot.resources, resource_id)?;
    let link_class = links::classify(&resource.source_url);
    let links = links::normalize(&resource.source_url, link_class);
    Some(ResolvedResource {
        resource,
        link_class,
        links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParentKind, ResourceKind, ResourceRecord};
    use std::collections::BTreeMap;

    #[test]
    fn test_open_resource_uses_url_not_declared_kind() {
        let mut snapshot = Snapshot::default();
        snapshot.resources.insert(
            "lec2".into(),
            BTreeMap::from([(
                "r2".to_string(),
                ResourceRecord {
                    title: "Recording".into(),
                    // 声明为视频，但链接是云盘文件
                    kind: ResourceKind::Video,
                    original_url: "https://drive.google.com/file/d/XYZ789/view".into(),
                    parent_type: Some(ParentKind::Lecture),
                    extra: Default::default(),
                },
            )]),
        );

        let opened = open_resource(&snapshot, "r2").unwrap();
        assert_eq!(opened.resource.parent_id, "lec2");
        assert_eq!(opened.link_class, LinkClass::FileHost);
        assert_eq!(
            opened.links.embed_url,
            "https://drive.google.com/file/d/XYZ789/preview"
        );
        // 源链接不被改写
        assert_eq!(
            snapshot.resources["lec2"]["r2"].original_url,
            "https://drive.google.com/file/d/XYZ789/view"
        );
        assert!(open_resource(&snapshot, "r9").is_none());
    }
}

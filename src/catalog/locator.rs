// src/catalog/locator.rs

use crate::models::{ItemTree, LocatedItem, ParentKind, Resource, ResourceTree};
use log::debug;
use std::collections::BTreeMap;

/// 在所有父节点中线性查找资源，返回第一个命中的记录及其父节点 ID。
///
/// 资源 ID 需要全局唯一；若快照中存在重复 ID，返回遍历顺序中最先出现的那个，
/// 调用方无法区分。写入路径会拒绝重复 ID，外部产生的数据可用
/// [`duplicate_resource_ids`] 检查。
pub fn locate_resource(resources: &ResourceTree, resource_id: &str) -> Option<Resource> {
    let found = resources.iter().find_map(|(parent_id, group)| {
        group
            .get(resource_id)
            .map(|record| Resource::from_record(resource_id, parent_id, record))
    });
    if found.is_none() {
        debug!("在 {} 个父节点中未找到资源 '{}'", resources.len(), resource_id);
    }
    found
}

/// 按 ID 在所有课程下查找讲座或实践课
pub fn locate_course_item(items: &ItemTree, kind: ParentKind, item_id: &str) -> Option<LocatedItem> {
    items.iter().find_map(|(course_id, group)| {
        group
            .get(item_id)
            .map(|item| LocatedItem::from_item(item_id, course_id, kind, item))
    })
}

/// 返回出现在多个父节点下的资源 ID 及这些父节点
pub fn duplicate_resource_ids(resources: &ResourceTree) -> BTreeMap<String, Vec<String>> {
    let mut owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (parent_id, group) in resources {
        for resource_id in group.keys() {
            owners
                .entry(resource_id.clone())
                .or_default()
                .push(parent_id.clone());
        }
    }
    owners.retain(|_, parents| parents.len() > 1);
    owners
}

// src/catalog/index.rs

use crate::models::{Resource, ResourceTree};
use std::collections::HashMap;

/// 资源 ID -> 父节点 ID 的反向索引，对同一快照做多次查找时使用。
///
/// 查找结果与 [`super::locate_resource`] 一致: 重复 ID 保留遍历顺序中的第一个父节点。
pub struct ResourceIndex<'a> {
    resources: &'a ResourceTree,
    parents: HashMap<&'a str, &'a str>,
}

impl<'a> ResourceIndex<'a> {
    pub fn build(resources: &'a ResourceTree) -> Self {
        let mut parents = HashMap::new();
        for (parent_id, group) in resources {
            for resource_id in group.keys() {
                parents
                    .entry(resource_id.as_str())
                    .or_insert(parent_id.as_str());
            }
        }
        Self { resources, parents }
    }

    pub fn parent_of(&self, resource_id: &str) -> Option<&'a str> {
        self.parents.get(resource_id).copied()
    }

    pub fn get(&self, resource_id: &str) -> Option<Resource> {
        let parent_id = self.parent_of(resource_id)?;
        self.resources
            .get(parent_id)
            .and_then(|group| group.get(resource_id))
            .map(|record| Resource::from_record(resource_id, parent_id, record))
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

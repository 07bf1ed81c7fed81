// src/models/snapshot.rs

use super::{ParentKind, ResourceKind, Weekday};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `lectures` / `sections` 节点: 课程 ID -> (条目 ID -> 条目)
pub type ItemTree = BTreeMap<String, BTreeMap<String, CourseItem>>;
/// `resources` 节点: 父节点 ID -> (资源 ID -> 资源)
pub type ResourceTree = BTreeMap<String, BTreeMap<String, ResourceRecord>>;
/// 未建模的字段，原样保留以便写回时不丢失
pub type Extra = Map<String, Value>;

// --- 文档树中存储的原始记录 ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub has_practicals: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub original_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<ParentKind>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: ParentKind,
    pub time: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// 某一时刻的完整文档树副本，核心逻辑只读取它，不持有任何实时状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub courses: BTreeMap<String, Course>,
    pub lectures: ItemTree,
    pub sections: ItemTree,
    pub resources: ResourceTree,
    pub schedules: BTreeMap<String, BTreeMap<String, ScheduleEntry>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Snapshot {
    pub fn items(&self, kind: ParentKind) -> &ItemTree {
        match kind {
            ParentKind::Lecture => &self.lectures,
            ParentKind::Section => &self.sections,
        }
    }

    pub fn items_mut(&mut self, kind: ParentKind) -> &mut ItemTree {
        match kind {
            ParentKind::Lecture => &mut self.lectures,
            ParentKind::Section => &mut self.sections,
        }
    }

    pub fn schedule(&self, day: Weekday) -> Option<&BTreeMap<String, ScheduleEntry>> {
        self.schedules.get(day.as_str())
    }
}

// 管理端写入的是 ISO 字符串，历史数据里偶尔有无法解析的值，这里按缺失处理
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match DateTime::parse_from_rfc3339(&s) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!("忽略无法解析的 dateAdded '{}': {}", s, e);
            None
        }
    }))
}

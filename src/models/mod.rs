// src/models/mod.rs

pub mod snapshot;

pub use snapshot::{
    Course, CourseItem, Extra, ItemTree, ResourceRecord, ResourceTree, ScheduleEntry, Snapshot,
};

use crate::symbols;
use chrono::{DateTime, Datelike, Utc};
use clap::ValueEnum;
use colored::ColoredString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 资源的声明类型，仅用于图标和分组，不参与链接识别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    File,
    Audio,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::File => "file",
            ResourceKind::Audio => "audio",
            ResourceKind::Video => "video",
        }
    }

    pub fn symbol(&self) -> &'static ColoredString {
        match self {
            ResourceKind::File => &symbols::FILE,
            ResourceKind::Audio => &symbols::AUDIO,
            ResourceKind::Video => &symbols::VIDEO,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 拥有资源的父节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParentKind {
    #[default]
    Lecture,
    Section,
}

impl ParentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentKind::Lecture => "lecture",
            ParentKind::Section => "section",
        }
    }

    /// 中文显示名，用于提示信息
    pub fn label(&self) -> &'static str {
        match self {
            ParentKind::Lecture => "讲座",
            ParentKind::Section => "实践课",
        }
    }

    pub fn symbol(&self) -> &'static ColoredString {
        match self {
            ParentKind::Lecture => &symbols::LECTURE,
            ParentKind::Section => &symbols::SECTION,
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[value(alias = "mon")]
    Monday,
    #[value(alias = "tue")]
    Tuesday,
    #[value(alias = "wed")]
    Wednesday,
    #[value(alias = "thu")]
    Thursday,
    #[value(alias = "fri")]
    Friday,
    #[value(alias = "sat")]
    Saturday,
    #[value(alias = "sun")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// 在文档树 `schedules/<day>` 中使用的键
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "星期一",
            Weekday::Tuesday => "星期二",
            Weekday::Wednesday => "星期三",
            Weekday::Thursday => "星期四",
            Weekday::Friday => "星期五",
            Weekday::Saturday => "星期六",
            Weekday::Sunday => "星期日",
        }
    }

    pub fn today() -> Self {
        chrono::Local::now().weekday().into()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个资源记录，附带它在文档树中的位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub kind: ResourceKind,
    pub source_url: String,
    pub parent_id: String,
    pub parent_kind: ParentKind,
}

impl Resource {
    pub fn from_record(id: &str, parent_id: &str, record: &ResourceRecord) -> Self {
        Self {
            id: id.to_string(),
            title: record.title.clone(),
            kind: record.kind,
            source_url: record.original_url.clone(),
            parent_id: parent_id.to_string(),
            parent_kind: record.parent_type.unwrap_or_default(),
        }
    }
}

/// 讲座或实践课，附带所属课程
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedItem {
    pub id: String,
    pub course_id: String,
    pub kind: ParentKind,
    pub title: String,
    pub description: Option<String>,
    pub order: i64,
    pub date_added: Option<DateTime<Utc>>,
}

impl LocatedItem {
    pub fn from_item(id: &str, course_id: &str, kind: ParentKind, item: &CourseItem) -> Self {
        Self {
            id: id.to_string(),
            course_id: course_id.to_string(),
            kind,
            title: item.title.clone(),
            description: item.description.clone(),
            order: item.order,
            date_added: item.date_added,
        }
    }
}

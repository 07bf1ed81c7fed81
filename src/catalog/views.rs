// src/catalog/views.rs

use crate::{
    error::{AppError, AppResult},
    models::{
        Course, LocatedItem, ParentKind, Resource, ResourceKind, ScheduleEntry, Snapshot, Weekday,
    },
};
use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    #[serde(flatten)]
    pub course: Course,
    pub lecture_count: usize,
    pub section_count: usize,
}

/// 一个讲座/实践课下按类型分组的资源
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedResources {
    pub files: Vec<Resource>,
    pub audios: Vec<Resource>,
    pub videos: Vec<Resource>,
}

impl GroupedResources {
    pub fn get(&self, kind: ResourceKind) -> &[Resource] {
        match kind {
            ResourceKind::File => &self.files,
            ResourceKind::Audio => &self.audios,
            ResourceKind::Video => &self.videos,
        }
    }

    pub fn total(&self) -> usize {
        self.files.len() + self.audios.len() + self.videos.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledClass {
    pub id: String,
    #[serde(flatten)]
    pub entry: ScheduleEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub courses: usize,
    pub lectures: usize,
    pub sections: usize,
    pub resources: usize,
    pub schedule_entries: usize,
}

/// 所有课程及其讲座、实践课数量。没有实践环节的课程不统计实践课。
pub fn course_summaries(snapshot: &Snapshot) -> Vec<CourseSummary> {
    let count = |kind: ParentKind, course_id: &str| {
        snapshot.items(kind).get(course_id).map_or(0, |group| group.len())
    };
    snapshot
        .courses
        .iter()
        .map(|(id, course)| CourseSummary {
            id: id.clone(),
            course: course.clone(),
            lecture_count: count(ParentKind::Lecture, id),
            section_count: if course.has_practicals {
                count(ParentKind::Section, id)
            } else {
                0
            },
        })
        .sorted_by(|a, b| {
            a.course
                .code
                .cmp(&b.course.code)
                .then_with(|| a.course.name.cmp(&b.course.name))
        })
        .collect()
}

/// 课程下的讲座或实践课，最新添加的排在前面
pub fn course_items(snapshot: &Snapshot, course_id: &str, kind: ParentKind) -> Vec<LocatedItem> {
    snapshot
        .items(kind)
        .get(course_id)
        .into_iter()
        .flatten()
        .map(|(id, item)| LocatedItem::from_item(id, course_id, kind, item))
        .sorted_by(|a, b| b.order.cmp(&a.order))
        .collect()
}

pub fn resources_by_kind(snapshot: &Snapshot, parent_id: &str) -> GroupedResources {
    let mut grouped = GroupedResources::default();
    let Some(group) = snapshot.resources.get(parent_id) else {
        return grouped;
    };
    for (id, record) in group {
        let resource = Resource::from_record(id, parent_id, record);
        match resource.kind {
            ResourceKind::File => grouped.files.push(resource),
            ResourceKind::Audio => grouped.audios.push(resource),
            ResourceKind::Video => grouped.videos.push(resource),
        }
    }
    for list in [&mut grouped.files, &mut grouped.audios, &mut grouped.videos] {
        list.sort_by(|a, b| a.title.cmp(&b.title));
    }
    grouped
}

/// `window` 时间内新增的讲座和实践课，按添加时间倒序。
///
/// 缺少 `dateAdded` 的条目视为刚刚添加。
///
/// 时间范围超出可表示的日期时返回 [`AppError::UserInputError`]。
pub fn recent_items(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    window: Duration,
) -> AppResult<Vec<LocatedItem>> {
    let since = now.checked_sub_signed(window).ok_or_else(|| {
        AppError::UserInputError(format!("时间范围过大: {} 天", window.num_days()))
    })?;
    let items: Vec<LocatedItem> = [ParentKind::Lecture, ParentKind::Section]
        .into_iter()
        .flat_map(move |kind| {
            snapshot.items(kind).iter().flat_map(move |(course_id, group)| {
                group
                    .iter()
                    .map(move |(id, item)| LocatedItem::from_item(id, course_id, kind, item))
            })
        })
        .map(|item| {
            let added = item.date_added.unwrap_or(now);
            (added, item)
        })
        .filter(|(added, _)| *added >= since)
        .sorted_by(|(a, _), (b, _)| b.cmp(a))
        .map(|(_, item)| item)
        .collect();
    Ok(items)
}

pub fn schedule_for(snapshot: &Snapshot, day: Weekday) -> Vec<ScheduledClass> {
    snapshot
        .schedule(day)
        .into_iter()
        .flatten()
        .map(|(id, entry)| ScheduledClass {
            id: id.clone(),
            entry: entry.clone(),
        })
        .sorted_by(|a, b| {
            a.entry
                .time
                .cmp(&b.entry.time)
                .then_with(|| a.entry.name.cmp(&b.entry.name))
        })
        .collect()
}

pub fn dashboard_stats(snapshot: &Snapshot) -> DashboardStats {
    DashboardStats {
        courses: snapshot.courses.len(),
        lectures: snapshot.lectures.values().map(|g| g.len()).sum(),
        sections: snapshot.sections.values().map(|g| g.len()).sum(),
        resources: snapshot.resources.values().map(|g| g.len()).sum(),
        schedule_entries: snapshot.schedules.values().map(|g| g.len()).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseItem, ResourceRecord};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn item(title: &str, order: i64, date_added: Option<DateTime<Utc>>) -> CourseItem {
        CourseItem {
            title: title.into(),
            description: None,
            order,
            date_added,
            extra: Default::default(),
        }
    }

    fn course(name: &str, code: &str, has_practicals: bool) -> Course {
        Course {
            name: name.into(),
            code: code.into(),
            description: None,
            has_practicals,
            extra: Default::default(),
        }
    }

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.courses.insert("c1".into(), course("Networks", "CS302", false));
        snapshot.courses.insert("c2".into(), course("Algorithms", "CS201", true));
        snapshot.lectures.insert(
            "c1".into(),
            BTreeMap::from([("l1".to_string(), item("Intro", 1, None))]),
        );
        snapshot.lectures.insert(
            "c2".into(),
            BTreeMap::from([
                ("l2".to_string(), item("Sorting", 10, None)),
                ("l3".to_string(), item("Graphs", 20, None)),
            ]),
        );
        snapshot.sections.insert(
            "c1".into(),
            BTreeMap::from([("s0".to_string(), item("Ignored", 1, None))]),
        );
        snapshot.sections.insert(
            "c2".into(),
            BTreeMap::from([("s1".to_string(), item("Lab 1", 1, None))]),
        );
        snapshot
    }

    #[test]
    fn test_course_summaries_count_sections_only_with_practicals() {
        let summaries = course_summaries(&sample());
        assert_eq!(summaries.len(), 2);
        // 按课程代码排序
        assert_eq!(summaries[0].id, "c2");
        assert_eq!((summaries[0].lecture_count, summaries[0].section_count), (2, 1));
        assert_eq!(summaries[1].id, "c1");
        assert_eq!((summaries[1].lecture_count, summaries[1].section_count), (1, 0));
    }

    #[test]
    fn test_course_items_newest_first() {
        let items = course_items(&sample(), "c2", ParentKind::Lecture);
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Graphs", "Sorting"]);
        assert!(course_items(&sample(), "nope", ParentKind::Section).is_empty());
    }

    #[test]
    fn test_resources_grouped_by_kind() {
        let mut snapshot = Snapshot::default();
        let record = |title: &str, kind| ResourceRecord {
            title: title.into(),
            kind,
            original_url: "https://example.com".into(),
            parent_type: Some(ParentKind::Section),
            extra: Default::default(),
        };
        snapshot.resources.insert(
            "s1".into(),
            BTreeMap::from([
                ("a".to_string(), record("Worksheet", ResourceKind::File)),
                ("b".to_string(), record("Recording", ResourceKind::Audio)),
                ("c".to_string(), record("Handout", ResourceKind::File)),
            ]),
        );
        let grouped = resources_by_kind(&snapshot, "s1");
        assert_eq!(grouped.total(), 3);
        assert_eq!(grouped.files[0].title, "Handout");
        assert_eq!(grouped.get(ResourceKind::Audio)[0].parent_kind, ParentKind::Section);
        assert!(grouped.videos.is_empty());
        assert_eq!(resources_by_kind(&snapshot, "missing"), GroupedResources::default());
    }

    #[test]
    fn test_recent_items_window() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let mut snapshot = Snapshot::default();
        snapshot.lectures.insert(
            "c1".into(),
            BTreeMap::from([
                ("old".to_string(), item("Old", 1, Some(now - Duration::days(4)))),
                ("new".to_string(), item("New", 2, Some(now - Duration::hours(2)))),
                ("undated".to_string(), item("Undated", 3, None)),
            ]),
        );
        snapshot.sections.insert(
            "c1".into(),
            BTreeMap::from([("lab".to_string(), item("Lab", 1, Some(now - Duration::days(1))))]),
        );

        let recent = recent_items(&snapshot, now, Duration::days(3)).unwrap();
        let ids: Vec<_> = recent.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["undated", "new", "lab"]);
        assert_eq!(recent[2].kind, ParentKind::Section);
    }

    #[test]
    fn test_recent_items_window_out_of_range() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let window = Duration::try_days(1_000_000_000).unwrap();
        let err = recent_items(&sample(), now, window).unwrap_err();
        assert!(matches!(err, AppError::UserInputError(_)));
    }

    #[test]
    fn test_schedule_sorted_by_time() {
        let mut snapshot = Snapshot::default();
        let entry = |name: &str, time: &str| ScheduleEntry {
            name: name.into(),
            code: "X".into(),
            kind: ParentKind::Lecture,
            time: time.into(),
            extra: Default::default(),
        };
        snapshot.schedules.insert(
            "friday".into(),
            BTreeMap::from([
                ("e1".to_string(), entry("Late", "14:00")),
                ("e2".to_string(), entry("Early", "08:30")),
            ]),
        );
        let classes = schedule_for(&snapshot, Weekday::Friday);
        assert_eq!(classes[0].entry.name, "Early");
        assert_eq!(classes[1].id, "e1");
        assert!(schedule_for(&snapshot, Weekday::Monday).is_empty());
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = dashboard_stats(&sample());
        assert_eq!(
            stats,
            DashboardStats {
                courses: 2,
                lectures: 3,
                sections: 2,
                resources: 0,
                schedule_entries: 0,
            }
        );
    }
}

// src/catalog/admin.rs

use super::locator::{locate_course_item, locate_resource};
use crate::{
    error::{AppError, AppResult},
    models::{
        Course, CourseItem, LocatedItem, ParentKind, Resource, ResourceKind, ResourceRecord,
        ScheduleEntry, Snapshot, Weekday,
    },
    utils,
};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

/// 课程字段的输入，编辑时 `None` 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct CourseInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub has_practicals: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceInput {
    pub title: Option<String>,
    pub kind: Option<ResourceKind>,
    pub url: Option<String>,
}

/// 管理操作的工作副本。所有修改都在内存中完成，由调用方决定何时写回存储。
pub struct Catalog {
    snapshot: Snapshot,
    clock: fn() -> DateTime<Utc>,
}

impl Catalog {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            clock: Utc::now,
        }
    }

    /// 使用固定时钟，便于测试 `order` 与 `dateAdded`
    pub fn with_clock(snapshot: Snapshot, clock: fn() -> DateTime<Utc>) -> Self {
        Self { snapshot, clock }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    // --- 课程 ---

    pub fn add_course(&mut self, input: CourseInput) -> AppResult<String> {
        let course = Course {
            name: required("课程名称", input.name.as_deref())?,
            code: required("课程代码", input.code.as_deref())?,
            description: input.description.as_deref().and_then(utils::non_empty),
            has_practicals: input.has_practicals.unwrap_or(false),
            extra: Default::default(),
        };
        let id = self.fresh_id(|s, id| s.courses.contains_key(id));
        info!("新增课程 '{}' ({}) -> {}", course.name, course.code, id);
        self.snapshot.courses.insert(id.clone(), course);
        Ok(id)
    }

    /// 先校验全部字段再写入，校验失败时课程保持原样
    pub fn update_course(&mut self, course_id: &str, input: CourseInput) -> AppResult<()> {
        let name = input.name.as_deref().map(|v| required("课程名称", Some(v))).transpose()?;
        let code = input.code.as_deref().map(|v| required("课程代码", Some(v))).transpose()?;
        let course = self
            .snapshot
            .courses
            .get_mut(course_id)
            .ok_or_else(|| AppError::not_found("课程", course_id))?;
        if let Some(name) = name {
            course.name = name;
        }
        if let Some(code) = code {
            course.code = code;
        }
        if let Some(description) = input.description.as_deref() {
            course.description = utils::non_empty(description);
        }
        if let Some(has_practicals) = input.has_practicals {
            course.has_practicals = has_practicals;
        }
        info!("更新课程 {}", course_id);
        Ok(())
    }

    /// 删除课程，同时删除其下的讲座、实践课以及它们的全部资源
    pub fn remove_course(&mut self, course_id: &str) -> AppResult<Course> {
        let course = self
            .snapshot
            .courses
            .remove(course_id)
            .ok_or_else(|| AppError::not_found("课程", course_id))?;

        let mut removed_items = 0;
        for kind in [ParentKind::Lecture, ParentKind::Section] {
            if let Some(group) = self.snapshot.items_mut(kind).remove(course_id) {
                for item_id in group.keys() {
                    self.snapshot.resources.remove(item_id);
                }
                removed_items += group.len();
            }
        }
        info!(
            "删除课程 '{}' ({})，级联删除 {} 个讲座/实践课",
            course.name, course_id, removed_items
        );
        Ok(course)
    }

    // --- 讲座 / 实践课 ---

    pub fn add_item(
        &mut self,
        course_id: &str,
        kind: ParentKind,
        title: &str,
        description: Option<&str>,
    ) -> AppResult<String> {
        let course = self
            .snapshot
            .courses
            .get(course_id)
            .ok_or_else(|| AppError::not_found("课程", course_id))?;
        if kind == ParentKind::Section && !course.has_practicals {
            warn!("课程 '{}' 未开启实践环节，仍然添加实践课", course.name);
        }
        let now = (self.clock)();
        let item = CourseItem {
            title: required("标题", Some(title))?,
            description: description.and_then(utils::non_empty),
            order: now.timestamp_millis(),
            date_added: Some(now),
            extra: Default::default(),
        };
        let id = self.fresh_id(|s, id| {
            locate_course_item(&s.lectures, ParentKind::Lecture, id).is_some()
                || locate_course_item(&s.sections, ParentKind::Section, id).is_some()
        });
        info!("新增{} '{}' -> {}/{}", kind.label(), item.title, course_id, id);
        self.snapshot
            .items_mut(kind)
            .entry(course_id.to_string())
            .or_default()
            .insert(id.clone(), item);
        Ok(id)
    }

    /// 编辑标题与描述，`order` 和 `dateAdded` 保持不变
    pub fn update_item(
        &mut self,
        item_id: &str,
        kind: ParentKind,
        title: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<()> {
        let located = self.find_item(item_id, kind)?;
        let item = self
            .snapshot
            .items_mut(kind)
            .get_mut(&located.course_id)
            .and_then(|group| group.get_mut(item_id))
            .ok_or_else(|| AppError::not_found(kind.label(), item_id))?;
        if let Some(title) = title {
            item.title = required("标题", Some(title))?;
        }
        if let Some(description) = description {
            item.description = utils::non_empty(description);
        }
        info!("更新{} {}", kind.label(), item_id);
        Ok(())
    }

    /// 删除讲座或实践课及其资源
    pub fn remove_item(&mut self, item_id: &str, kind: ParentKind) -> AppResult<LocatedItem> {
        let located = self.find_item(item_id, kind)?;
        let items = self.snapshot.items_mut(kind);
        if let Some(group) = items.get_mut(&located.course_id) {
            group.remove(item_id);
            if group.is_empty() {
                items.remove(&located.course_id);
            }
        }
        let removed = self
            .snapshot
            .resources
            .remove(item_id)
            .map_or(0, |group| group.len());
        info!(
            "删除{} '{}' ({})，级联删除 {} 个资源",
            kind.label(),
            located.title,
            item_id,
            removed
        );
        Ok(located)
    }

    pub fn find_item(&self, item_id: &str, kind: ParentKind) -> AppResult<LocatedItem> {
        locate_course_item(self.snapshot.items(kind), kind, item_id)
            .ok_or_else(|| AppError::not_found(kind.label(), item_id))
    }

    // --- 资源 ---

    /// 在讲座或实践课下新增资源。
    ///
    /// 资源 ID 必须在整个文档树中唯一: 指定的 ID 已存在于任何父节点下时返回
    /// [`AppError::DuplicateResource`]。
    pub fn add_resource(
        &mut self,
        parent_id: &str,
        input: ResourceInput,
        explicit_id: Option<&str>,
    ) -> AppResult<String> {
        let parent_kind = self.parent_kind_of(parent_id)?;
        let record = ResourceRecord {
            title: required("资源标题", input.title.as_deref())?,
            kind: input.kind.unwrap_or(ResourceKind::File),
            original_url: required("资源链接", input.url.as_deref())?,
            parent_type: Some(parent_kind),
            extra: Default::default(),
        };

        let id = match explicit_id {
            Some(id) => {
                let id = required("资源 ID", Some(id))?;
                if let Some(existing) = locate_resource(&self.snapshot.resources, &id) {
                    return Err(AppError::DuplicateResource {
                        id,
                        parent_id: existing.parent_id,
                    });
                }
                id
            }
            None => self.fresh_id(|s, id| locate_resource(&s.resources, id).is_some()),
        };

        info!(
            "新增资源 '{}' ({}) -> {}/{}",
            record.title, record.kind, parent_id, id
        );
        self.snapshot
            .resources
            .entry(parent_id.to_string())
            .or_default()
            .insert(id.clone(), record);
        Ok(id)
    }

    pub fn update_resource(&mut self, resource_id: &str, input: ResourceInput) -> AppResult<Resource> {
        let title = input.title.as_deref().map(|v| required("资源标题", Some(v))).transpose()?;
        let url = input.url.as_deref().map(|v| required("资源链接", Some(v))).transpose()?;
        let located = self.find_resource(resource_id)?;
        let record = self
            .snapshot
            .resources
            .get_mut(&located.parent_id)
            .and_then(|group| group.get_mut(resource_id))
            .ok_or_else(|| AppError::not_found("资源", resource_id))?;
        if let Some(title) = title {
            record.title = title;
        }
        if let Some(kind) = input.kind {
            record.kind = kind;
        }
        if let Some(url) = url {
            record.original_url = url;
        }
        info!("更新资源 {} (父节点 {})", resource_id, located.parent_id);
        Ok(Resource::from_record(resource_id, &located.parent_id, record))
    }

    pub fn remove_resource(&mut self, resource_id: &str) -> AppResult<Resource> {
        let located = self.find_resource(resource_id)?;
        if let Some(group) = self.snapshot.resources.get_mut(&located.parent_id) {
            group.remove(resource_id);
            if group.is_empty() {
                self.snapshot.resources.remove(&located.parent_id);
            }
        }
        info!("删除资源 '{}' ({})", located.title, resource_id);
        Ok(located)
    }

    pub fn find_resource(&self, resource_id: &str) -> AppResult<Resource> {
        locate_resource(&self.snapshot.resources, resource_id)
            .ok_or_else(|| AppError::not_found("资源", resource_id))
    }

    // --- 课表 ---

    pub fn add_schedule_entry(
        &mut self,
        day: Weekday,
        name: &str,
        code: &str,
        kind: ParentKind,
        time: &str,
    ) -> AppResult<String> {
        let entry = ScheduleEntry {
            name: required("课程名称", Some(name))?,
            code: required("课程代码", Some(code))?,
            kind,
            time: required("上课时间", Some(time))?,
            extra: Default::default(),
        };
        let id = self.fresh_id(|s, id| s.schedule(day).is_some_and(|entries| entries.contains_key(id)));
        info!("新增课表条目 {} {} '{}' -> {}", day, entry.time, entry.name, id);
        self.snapshot
            .schedules
            .entry(day.as_str().to_string())
            .or_default()
            .insert(id.clone(), entry);
        Ok(id)
    }

    pub fn remove_schedule_entry(&mut self, day: Weekday, entry_id: &str) -> AppResult<ScheduleEntry> {
        let entries = self
            .snapshot
            .schedules
            .get_mut(day.as_str())
            .ok_or_else(|| AppError::not_found("课表条目", entry_id))?;
        let entry = entries
            .remove(entry_id)
            .ok_or_else(|| AppError::not_found("课表条目", entry_id))?;
        if entries.is_empty() {
            self.snapshot.schedules.remove(day.as_str());
        }
        info!("删除课表条目 {} '{}' ({})", day, entry.name, entry_id);
        Ok(entry)
    }

    // --- 内部辅助 ---

    fn parent_kind_of(&self, parent_id: &str) -> AppResult<ParentKind> {
        [ParentKind::Lecture, ParentKind::Section]
            .into_iter()
            .find(|&kind| locate_course_item(self.snapshot.items(kind), kind, parent_id).is_some())
            .ok_or_else(|| AppError::not_found("讲座或实践课", parent_id))
    }

    fn fresh_id(&self, taken: impl Fn(&Snapshot, &str) -> bool) -> String {
        loop {
            let id = utils::generate_push_id();
            if !taken(&self.snapshot, &id) {
                return id;
            }
            debug!("生成的 ID '{}' 已被占用，重新生成", id);
        }
    }
}

fn required(field: &str, value: Option<&str>) -> AppResult<String> {
    value
        .and_then(utils::non_empty)
        .ok_or_else(|| AppError::Validation(format!("{}不能为空", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap()
    }

    fn course_input(name: &str, code: &str, practicals: bool) -> CourseInput {
        CourseInput {
            name: Some(name.into()),
            code: Some(code.into()),
            description: None,
            has_practicals: Some(practicals),
        }
    }

    fn resource_input(title: &str, url: &str) -> ResourceInput {
        ResourceInput {
            title: Some(title.into()),
            kind: Some(ResourceKind::Video),
            url: Some(url.into()),
        }
    }

    fn seeded() -> (Catalog, String, String, String) {
        let mut catalog = Catalog::with_clock(Snapshot::default(), fixed_now);
        let course = catalog.add_course(course_input("Algorithms", "CS201", true)).unwrap();
        let lecture = catalog
            .add_item(&course, ParentKind::Lecture, "Sorting", Some("  "))
            .unwrap();
        let section = catalog
            .add_item(&course, ParentKind::Section, "Lab 1", None)
            .unwrap();
        (catalog, course, lecture, section)
    }

    #[test]
    fn test_add_item_stamps_order_and_date() {
        let (catalog, course, lecture, _) = seeded();
        let item = &catalog.snapshot().lectures[&course][&lecture];
        assert_eq!(item.order, fixed_now().timestamp_millis());
        assert_eq!(item.date_added, Some(fixed_now()));
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_add_item_requires_course() {
        let mut catalog = Catalog::new(Snapshot::default());
        let err = catalog
            .add_item("ghost", ParentKind::Lecture, "Intro", None)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: "课程", .. }));
    }

    #[test]
    fn test_update_item_keeps_order() {
        let (mut catalog, course, lecture, _) = seeded();
        catalog
            .update_item(&lecture, ParentKind::Lecture, Some("Sorting II"), Some("merge sort"))
            .unwrap();
        let item = &catalog.snapshot().lectures[&course][&lecture];
        assert_eq!(item.title, "Sorting II");
        assert_eq!(item.description.as_deref(), Some("merge sort"));
        assert_eq!(item.order, fixed_now().timestamp_millis());
        // 类型不匹配时找不到
        assert!(catalog.update_item(&lecture, ParentKind::Section, Some("x"), None).is_err());
    }

    #[test]
    fn test_resource_records_parent_type() {
        let (mut catalog, _, _, section) = seeded();
        let id = catalog
            .add_resource(&section, resource_input("Walkthrough", "https://youtu.be/abc"), None)
            .unwrap();
        let found = catalog.find_resource(&id).unwrap();
        assert_eq!(found.parent_id, section);
        assert_eq!(found.parent_kind, ParentKind::Section);
        assert_eq!(found.kind, ResourceKind::Video);
    }

    #[test]
    fn test_add_resource_rejects_duplicate_id_across_parents() {
        let (mut catalog, _, lecture, section) = seeded();
        catalog
            .add_resource(&lecture, resource_input("A", "https://youtu.be/a"), Some("r1"))
            .unwrap();
        let err = catalog
            .add_resource(&section, resource_input("B", "https://youtu.be/b"), Some("r1"))
            .unwrap_err();
        match err {
            AppError::DuplicateResource { id, parent_id } => {
                assert_eq!(id, "r1");
                assert_eq!(parent_id, lecture);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_add_resource_validation() {
        let (mut catalog, _, lecture, _) = seeded();
        let err = catalog
            .add_resource(&lecture, resource_input("Empty", "   "), None)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(catalog
            .add_resource("nowhere", resource_input("X", "https://x"), None)
            .is_err());
    }

    #[test]
    fn test_update_and_remove_resource_by_id_only() {
        let (mut catalog, _, lecture, _) = seeded();
        let id = catalog
            .add_resource(&lecture, resource_input("Old", "https://youtu.be/a"), None)
            .unwrap();
        let updated = catalog
            .update_resource(
                &id,
                ResourceInput {
                    title: Some("New".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.source_url, "https://youtu.be/a");

        let removed = catalog.remove_resource(&id).unwrap();
        assert_eq!(removed.title, "New");
        assert!(catalog.snapshot().resources.is_empty());
        assert!(matches!(
            catalog.remove_resource(&id),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove_item_cascades_to_resources() {
        let (mut catalog, course, lecture, section) = seeded();
        catalog
            .add_resource(&lecture, resource_input("A", "https://youtu.be/a"), None)
            .unwrap();
        catalog
            .add_resource(&section, resource_input("B", "https://youtu.be/b"), None)
            .unwrap();

        catalog.remove_item(&lecture, ParentKind::Lecture).unwrap();
        let snapshot = catalog.snapshot();
        assert!(!snapshot.lectures.contains_key(&course));
        assert!(!snapshot.resources.contains_key(&lecture));
        assert!(snapshot.resources.contains_key(&section));
    }

    #[test]
    fn test_remove_course_cascades() {
        let (mut catalog, course, lecture, section) = seeded();
        let other = catalog.add_course(course_input("Networks", "CS302", false)).unwrap();
        let other_lecture = catalog
            .add_item(&other, ParentKind::Lecture, "TCP", None)
            .unwrap();
        for parent in [&lecture, &section, &other_lecture] {
            catalog
                .add_resource(parent, resource_input("R", "https://youtu.be/r"), None)
                .unwrap();
        }

        let removed = catalog.remove_course(&course).unwrap();
        assert_eq!(removed.code, "CS201");

        let snapshot = catalog.into_snapshot();
        assert_eq!(snapshot.courses.len(), 1);
        assert!(snapshot.lectures.get(&course).is_none());
        assert!(snapshot.sections.get(&course).is_none());
        assert_eq!(snapshot.resources.keys().collect::<Vec<_>>(), vec![&other_lecture]);
    }

    #[test]
    fn test_update_course_partial() {
        let (mut catalog, course, _, _) = seeded();
        catalog
            .update_course(
                &course,
                CourseInput {
                    description: Some("Core course".into()),
                    has_practicals: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        let stored = &catalog.snapshot().courses[&course];
        assert_eq!(stored.name, "Algorithms");
        assert_eq!(stored.description.as_deref(), Some("Core course"));
        assert!(!stored.has_practicals);

        let err = catalog
            .update_course(&course, CourseInput { name: Some(" ".into()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_failed_update_leaves_records_untouched() {
        let (mut catalog, course, lecture, _) = seeded();
        let before = catalog.snapshot().clone();

        let err = catalog
            .update_course(
                &course,
                CourseInput {
                    name: Some("Renamed".into()),
                    code: Some("  ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let id = catalog
            .add_resource(&lecture, resource_input("Talk", "https://youtu.be/a"), None)
            .unwrap();
        let with_resource = catalog.snapshot().clone();
        let err = catalog
            .update_resource(
                &id,
                ResourceInput {
                    title: Some("New title".into()),
                    kind: Some(ResourceKind::Audio),
                    url: Some("".into()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(catalog.snapshot(), &with_resource);
        assert_eq!(with_resource.courses, before.courses);
    }

    #[test]
    fn test_schedule_add_and_remove() {
        let mut catalog = Catalog::new(Snapshot::default());
        let id = catalog
            .add_schedule_entry(Weekday::Tuesday, "Algorithms", "CS201", ParentKind::Lecture, "09:00")
            .unwrap();
        assert_eq!(catalog.snapshot().schedule(Weekday::Tuesday).unwrap().len(), 1);
        assert!(catalog
            .add_schedule_entry(Weekday::Tuesday, "Algorithms", "CS201", ParentKind::Lecture, "")
            .is_err());

        assert!(catalog.remove_schedule_entry(Weekday::Monday, &id).is_err());
        let entry = catalog.remove_schedule_entry(Weekday::Tuesday, &id).unwrap();
        assert_eq!(entry.time, "09:00");
        assert!(catalog.snapshot().schedules.is_empty());
    }
}

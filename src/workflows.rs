// src/workflows.rs

use crate::{
    AppContext,
    catalog::{self, Catalog, CourseInput, ResourceIndex, ResourceInput, views},
    cli::{AdminCommand, CourseAction, ItemAction, ResourceAction, ScheduleAction},
    error::{AppError, AppResult},
    links::{self, LinkClass, NormalizedLinks},
    models::{LocatedItem, ParentKind, Resource, ResourceKind, Weekday},
    symbols, ui, utils, constants,
};
use chrono::{Duration, Utc};
use colored::*;
use log::{debug, info};
use serde_json::json;

fn class_label(class: LinkClass) -> &'static str {
    match class {
        LinkClass::VideoHost => "视频托管 (YouTube)",
        LinkClass::FileHost => "云盘文件 (Google Drive)",
        LinkClass::Unrecognized => "未识别，原样使用",
    }
}

fn print_links(links: &NormalizedLinks) {
    ui::field("嵌入", &links.embed_url);
    ui::field("查看", &links.view_url);
    match &links.download_url {
        Some(url) => ui::field("下载", url),
        None => ui::field("下载", &"不支持".dimmed().to_string()),
    }
}

fn print_item_line(item: &LocatedItem) {
    let date = item
        .date_added
        .map(|d| d.with_timezone(&chrono::Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {} {}  {}  {}",
        item.kind.symbol(),
        utils::truncate_text(&item.title, constants::TITLE_TRUNCATE_LENGTH),
        date.dimmed(),
        item.id.dimmed()
    );
}

fn print_resource_line(resource: &Resource) {
    println!(
        "  {} {}  {}",
        resource.kind.symbol(),
        utils::truncate_text(&resource.title, constants::TITLE_TRUNCATE_LENGTH),
        resource.id.dimmed()
    );
}

// --- 浏览 ---

/// 查找资源 -> 识别链接 -> 生成嵌入/查看/下载链接
pub(crate) async fn open_resource(ctx: &AppContext, resource_id: &str) -> AppResult<()> {
    let snapshot = ctx.store.load().await?;
    let resolved = catalog::open_resource(&snapshot, resource_id)
        .ok_or_else(|| AppError::not_found("资源", resource_id))?;
    debug!(
        "资源 '{}' 位于 '{}'，链接类别 {:?}",
        resource_id, resolved.resource.parent_id, resolved.link_class
    );

    if ctx.json {
        return ui::print_json(&resolved);
    }
    let resource = &resolved.resource;
    ui::print_header(&resource.title);
    ui::field("类型", &format!("{} {}", resource.kind.symbol(), resource.kind));
    ui::field(
        "所属",
        &format!("{} {}", resource.parent_kind.label(), resource.parent_id),
    );
    ui::field("原链接", &resource.source_url);
    ui::field("识别为", class_label(resolved.link_class));
    print_links(&resolved.links);
    Ok(())
}

pub(crate) fn show_links(url: &str, as_json: bool) -> AppResult<()> {
    let class = links::classify(url);
    let normalized = links::normalize(url, class);
    if as_json {
        return ui::print_json(&json!({ "linkClass": class, "links": normalized }));
    }
    ui::field("识别为", class_label(class));
    print_links(&normalized);
    Ok(())
}

pub(crate) async fn list_courses(ctx: &AppContext) -> AppResult<()> {
    let snapshot = ctx.store.load().await?;
    let summaries = views::course_summaries(&snapshot);
    if ctx.json {
        return ui::print_json(&summaries);
    }
    ui::print_header("课程列表");
    if summaries.is_empty() {
        ui::info("暂无课程，可通过 `admin course add` 添加。");
        return Ok(());
    }
    for summary in &summaries {
        let practicals = if summary.course.has_practicals {
            format!(" | 实践课 {}", summary.section_count)
        } else {
            String::new()
        };
        println!(
            "  {} {}  讲座 {}{}  {}",
            summary.course.code.yellow(),
            summary.course.name.bold(),
            summary.lecture_count,
            practicals,
            summary.id.dimmed()
        );
    }
    Ok(())
}

pub(crate) async fn show_course(ctx: &AppContext, course_id: &str, sections: bool) -> AppResult<()> {
    let snapshot = ctx.store.load().await?;
    let course = snapshot
        .courses
        .get(course_id)
        .ok_or_else(|| AppError::not_found("课程", course_id))?;
    let kind = if sections { ParentKind::Section } else { ParentKind::Lecture };
    let items = views::course_items(&snapshot, course_id, kind);

    if ctx.json {
        return ui::print_json(&json!({ "id": course_id, "course": course, "items": items }));
    }
    ui::print_header(&format!("{} {}", course.code, course.name));
    if let Some(description) = &course.description {
        println!("  {}", description);
    }
    if sections && !course.has_practicals {
        ui::warn("该课程未开启实践环节。");
    }
    ui::print_sub_header(&format!("{} ({})", kind.label(), items.len()));
    if items.is_empty() {
        ui::info(&format!("暂无{}。", kind.label()));
    }
    for item in &items {
        print_item_line(item);
    }
    Ok(())
}

pub(crate) async fn show_item(ctx: &AppContext, item_id: &str, section: bool) -> AppResult<()> {
    let snapshot = ctx.store.load().await?;
    let kind = if section { ParentKind::Section } else { ParentKind::Lecture };
    let item = catalog::locate_course_item(snapshot.items(kind), kind, item_id)
        .ok_or_else(|| AppError::not_found(kind.label(), item_id))?;
    let grouped = views::resources_by_kind(&snapshot, item_id);

    if ctx.json {
        return ui::print_json(&json!({ "item": item, "resources": grouped }));
    }
    ui::print_header(&item.title);
    if let Some(course) = snapshot.courses.get(&item.course_id) {
        ui::field("课程", &format!("{} {}", course.code, course.name));
    }
    if let Some(description) = &item.description {
        ui::field("简介", description);
    }
    for (kind, title) in [
        (ResourceKind::File, "文档"),
        (ResourceKind::Audio, "音频"),
        (ResourceKind::Video, "视频"),
    ] {
        let list = grouped.get(kind);
        ui::print_sub_header(&format!("{} ({})", title, list.len()));
        if list.is_empty() {
            println!("  {}", format!("暂无{}", title).dimmed());
        }
        for resource in list {
            print_resource_line(resource);
        }
    }
    Ok(())
}

pub(crate) async fn recent(ctx: &AppContext, days: Option<i64>) -> AppResult<()> {
    let days = days.unwrap_or(ctx.config.recent_days);
    if days < 0 {
        return Err(AppError::UserInputError("天数不能为负数".to_string()));
    }
    let window = Duration::try_days(days)
        .ok_or_else(|| AppError::UserInputError(format!("时间范围过大: {} 天", days)))?;
    let snapshot = ctx.store.load().await?;
    let items = views::recent_items(&snapshot, Utc::now(), window)?;
    if ctx.json {
        return ui::print_json(&items);
    }
    ui::print_header(&format!("最近 {} 天新增", days));
    if items.is_empty() {
        ui::info("最近没有新增内容。");
    }
    for item in &items {
        print_item_line(item);
    }
    Ok(())
}

pub(crate) async fn schedule(ctx: &AppContext, day: Option<Weekday>) -> AppResult<()> {
    let today = Weekday::today();
    let day = day.unwrap_or(today);
    let snapshot = ctx.store.load().await?;
    let classes = views::schedule_for(&snapshot, day);
    if ctx.json {
        return ui::print_json(&json!({ "day": day, "classes": classes }));
    }
    let title = if day == today {
        format!("今日课表 - {}", day.label())
    } else {
        format!("课表 - {}", day.label())
    };
    ui::print_header(&title);
    if classes.is_empty() {
        ui::info("当天没有安排课程。");
    }
    for class in &classes {
        println!(
            "  {}  {} {}  {}  {}",
            class.entry.time.cyan(),
            class.entry.kind.symbol(),
            class.entry.name.bold(),
            class.entry.code.yellow(),
            class.id.dimmed()
        );
    }
    Ok(())
}

pub(crate) async fn stats(ctx: &AppContext) -> AppResult<()> {
    let snapshot = ctx.store.load().await?;
    let stats = views::dashboard_stats(&snapshot);
    if ctx.json {
        return ui::print_json(&stats);
    }
    ui::print_header("数据统计");
    ui::field("课程", &stats.courses.to_string());
    ui::field("讲座", &stats.lectures.to_string());
    ui::field("实践课", &stats.sections.to_string());
    ui::field("资源", &stats.resources.to_string());
    ui::field("课表条目", &stats.schedule_entries.to_string());
    Ok(())
}

/// 报告跨父节点重复的资源 ID；存在重复时返回错误
pub(crate) async fn check(ctx: &AppContext) -> AppResult<()> {
    let snapshot = ctx.store.load().await?;
    let index = ResourceIndex::build(&snapshot.resources);
    let duplicates = catalog::duplicate_resource_ids(&snapshot.resources);
    if ctx.json {
        ui::print_json(&json!({ "uniqueIds": index.len(), "duplicates": duplicates }))?;
    } else if duplicates.is_empty() {
        ui::success(&format!("共 {} 个资源，ID 均全局唯一。", index.len()));
    } else {
        let lines: Vec<String> = duplicates
            .iter()
            .map(|(id, parents)| {
                let winner = index.parent_of(id).unwrap_or("-");
                format!("{} -> {} (按 ID 打开时命中 {})", id, parents.join(", "), winner)
            })
            .collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        ui::box_message(
            &format!("{} 发现重复的资源 ID", *symbols::WARN),
            &lines,
            |s| s.yellow(),
        );
    }
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "发现 {} 个重复的资源 ID，按 ID 打开时只会命中第一个父节点",
            duplicates.len()
        )))
    }
}

// --- 管理 ---

pub(crate) async fn admin(ctx: &AppContext, command: &AdminCommand) -> AppResult<()> {
    let base = ctx.store.load().await?;
    let mut catalog = Catalog::new(base.clone());

    let (message, changed) = match command {
        AdminCommand::Course { action } => admin_course(&mut catalog, action)?,
        AdminCommand::Item { action } => admin_item(&mut catalog, action)?,
        AdminCommand::Resource { action } => admin_resource(&mut catalog, action)?,
        AdminCommand::Schedule { action } => admin_schedule(&mut catalog, action)?,
    };

    if !changed {
        ui::info(&message);
        return Ok(());
    }
    ctx.store.save_changes(&base, catalog.snapshot()).await?;
    info!("管理操作完成: {}", message);
    if ctx.json {
        ui::print_json(&json!({ "ok": true, "message": message }))
    } else {
        ui::success(&message);
        Ok(())
    }
}

fn confirmed(yes: bool, question: &str) -> bool {
    yes || ui::confirm(question, false)
}

fn admin_course(catalog: &mut Catalog, action: &CourseAction) -> AppResult<(String, bool)> {
    match action {
        CourseAction::Add { name, code, description, practicals } => {
            let id = catalog.add_course(CourseInput {
                name: Some(name.clone()),
                code: Some(code.clone()),
                description: description.clone(),
                has_practicals: Some(*practicals),
            })?;
            Ok((format!("已添加课程 {} ({})", code, id), true))
        }
        CourseAction::Edit { id, name, code, description, practicals } => {
            catalog.update_course(
                id,
                CourseInput {
                    name: name.clone(),
                    code: code.clone(),
                    description: description.clone(),
                    has_practicals: *practicals,
                },
            )?;
            Ok((format!("已更新课程 {}", id), true))
        }
        CourseAction::Rm { id, yes } => {
            let course = catalog
                .snapshot()
                .courses
                .get(id)
                .ok_or_else(|| AppError::not_found("课程", id.as_str()))?;
            let question = format!(
                "确定删除课程 '{}' 及其全部讲座、实践课和资源吗?",
                course.name
            );
            if !confirmed(*yes, &question) {
                return Ok(("已取消删除。".to_string(), false));
            }
            let course = catalog.remove_course(id)?;
            Ok((format!("已删除课程 {}", course.name), true))
        }
    }
}

fn admin_item(catalog: &mut Catalog, action: &ItemAction) -> AppResult<(String, bool)> {
    match action {
        ItemAction::Add { course, kind, title, description } => {
            let id = catalog.add_item(course, *kind, title, description.as_deref())?;
            Ok((format!("已添加{} '{}' ({})", kind.label(), title, id), true))
        }
        ItemAction::Edit { id, kind, title, description } => {
            catalog.update_item(id, *kind, title.as_deref(), description.as_deref())?;
            Ok((format!("已更新{} {}", kind.label(), id), true))
        }
        ItemAction::Rm { id, kind, yes } => {
            let item = catalog.find_item(id, *kind)?;
            let question = format!("确定删除{} '{}' 及其全部资源吗?", kind.label(), item.title);
            if !confirmed(*yes, &question) {
                return Ok(("已取消删除。".to_string(), false));
            }
            let item = catalog.remove_item(id, *kind)?;
            Ok((format!("已删除{} '{}'", kind.label(), item.title), true))
        }
    }
}

fn admin_resource(catalog: &mut Catalog, action: &ResourceAction) -> AppResult<(String, bool)> {
    match action {
        ResourceAction::Add { parent, kind, title, url, id } => {
            let id = catalog.add_resource(
                parent,
                ResourceInput {
                    title: Some(title.clone()),
                    kind: Some(*kind),
                    url: Some(url.clone()),
                },
                id.as_deref(),
            )?;
            Ok((format!("已添加资源 '{}' ({})", title, id), true))
        }
        ResourceAction::Edit { id, title, kind, url } => {
            let resource = catalog.update_resource(
                id,
                ResourceInput {
                    title: title.clone(),
                    kind: *kind,
                    url: url.clone(),
                },
            )?;
            Ok((format!("已更新资源 '{}' ({})", resource.title, id), true))
        }
        ResourceAction::Rm { id, yes } => {
            let resource = catalog.find_resource(id)?;
            let question = format!("确定删除资源 '{}' 吗?", resource.title);
            if !confirmed(*yes, &question) {
                return Ok(("已取消删除。".to_string(), false));
            }
            let resource = catalog.remove_resource(id)?;
            Ok((format!("已删除资源 '{}'", resource.title), true))
        }
    }
}

fn admin_schedule(catalog: &mut Catalog, action: &ScheduleAction) -> AppResult<(String, bool)> {
    match action {
        ScheduleAction::Add { day, name, code, kind, time } => {
            let id = catalog.add_schedule_entry(*day, name, code, *kind, time)?;
            Ok((format!("已在{}添加 {} {} ({})", day.label(), time, name, id), true))
        }
        ScheduleAction::Rm { day, id } => {
            let entry = catalog.remove_schedule_entry(*day, id)?;
            Ok((format!("已从{}删除 '{}'", day.label(), entry.name), true))
        }
    }
}

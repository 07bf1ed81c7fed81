// src/cli.rs

use crate::models::{ParentKind, ResourceKind, Weekday};
use clap::{Parser, Subcommand, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// command 属性
#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    // --- 数据来源 (Source) ---
    /// 使用指定的本地快照文件 (JSON)
    #[arg(long, value_name = "FILE", global = true, conflicts_with = "remote", help_heading = "Source")]
    pub data: Option<PathBuf>,
    /// 使用数据库 REST 地址，例如 https://<project>.firebaseio.com
    #[arg(long, value_name = "URL", global = true, help_heading = "Source")]
    pub remote: Option<String>,

    // --- 通用选项 (General) ---
    /// 以 JSON 格式输出结果
    #[arg(long, action = clap::ArgAction::SetTrue, global = true, help_heading = "General")]
    pub json: bool,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 打开资源: 查找资源并生成嵌入、查看、下载链接
    Open {
        /// 资源 ID
        resource_id: String,
    },
    /// 识别并转换任意一个链接
    Links {
        url: String,
    },
    /// 列出所有课程及讲座、实践课数量
    Courses,
    /// 查看课程及其讲座 (或实践课)
    Course {
        course_id: String,
        /// 列出实践课而不是讲座
        #[arg(long, action = clap::ArgAction::SetTrue)]
        sections: bool,
    },
    /// 查看讲座 (或实践课) 及其资源
    Item {
        item_id: String,
        /// 按实践课 ID 查找
        #[arg(long, action = clap::ArgAction::SetTrue)]
        section: bool,
    },
    /// 最近新增的讲座和实践课
    Recent {
        /// 时间范围 (天)，默认读取配置
        #[arg(long)]
        days: Option<i64>,
    },
    /// 今天的课表
    Today,
    /// 指定星期的课表，不指定时为今天
    Schedule {
        #[arg(value_enum, ignore_case = true)]
        day: Option<Weekday>,
    },
    /// 数据统计
    Stats,
    /// 检查快照中跨父节点重复的资源 ID
    Check,
    /// 管理操作: 增删改课程、讲座、资源与课表
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// 管理课程
    Course {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// 管理讲座与实践课
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// 管理资源
    Resource {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// 管理每周课表
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CourseAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        description: Option<String>,
        /// 课程包含实践课
        #[arg(long, action = clap::ArgAction::SetTrue)]
        practicals: bool,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_name = "BOOL")]
        practicals: Option<bool>,
    },
    /// 删除课程，同时删除其讲座、实践课和资源
    Rm {
        id: String,
        /// 跳过确认
        #[arg(short, long, action = clap::ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ItemAction {
    Add {
        #[arg(long)]
        course: String,
        #[arg(long, value_enum, ignore_case = true, default_value_t = ParentKind::Lecture)]
        kind: ParentKind,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long, value_enum, ignore_case = true, default_value_t = ParentKind::Lecture)]
        kind: ParentKind,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// 删除讲座或实践课及其资源
    Rm {
        id: String,
        #[arg(long, value_enum, ignore_case = true, default_value_t = ParentKind::Lecture)]
        kind: ParentKind,
        #[arg(short, long, action = clap::ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ResourceAction {
    Add {
        /// 所属讲座或实践课 ID
        #[arg(long)]
        parent: String,
        #[arg(long, value_enum, ignore_case = true, default_value_t = ResourceKind::File)]
        kind: ResourceKind,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        /// 指定资源 ID (必须全局唯一)，默认自动生成
        #[arg(long)]
        id: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_enum, ignore_case = true)]
        kind: Option<ResourceKind>,
        #[arg(long)]
        url: Option<String>,
    },
    Rm {
        id: String,
        #[arg(short, long, action = clap::ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScheduleAction {
    Add {
        #[arg(value_enum, ignore_case = true)]
        day: Weekday,
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
        #[arg(long, value_enum, ignore_case = true, default_value_t = ParentKind::Lecture)]
        kind: ParentKind,
        /// 上课时间，例如 10:00
        #[arg(long)]
        time: String,
    },
    Rm {
        #[arg(value_enum, ignore_case = true)]
        day: Weekday,
        id: String,
    },
}

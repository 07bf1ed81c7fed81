// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod links;
pub mod logging;
pub mod models;
pub mod store;
pub mod symbols;
pub mod ui;
pub mod utils;
mod workflows;

use crate::{
    cli::{Cli, Command},
    config::AppConfig,
    error::AppResult,
    store::SnapshotStore,
};
use log::debug;
use std::sync::Arc;

/// 命令执行上下文: 配置、数据来源与输出方式
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: Box<dyn SnapshotStore>,
    pub json: bool,
}

impl AppContext {
    pub fn new(config: AppConfig, json: bool) -> AppResult<Self> {
        let store = store::open_store(&config)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            json,
        })
    }
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);

    // 纯链接转换不需要配置和数据来源
    if let Command::Links { url } = &args.command {
        return workflows::show_links(url, args.json);
    }

    let config = AppConfig::new(&args)?;
    let ctx = AppContext::new(config, args.json)?;

    match &args.command {
        Command::Open { resource_id } => workflows::open_resource(&ctx, resource_id).await,
        Command::Links { url } => workflows::show_links(url, ctx.json),
        Command::Courses => workflows::list_courses(&ctx).await,
        Command::Course {
            course_id,
            sections,
        } => workflows::show_course(&ctx, course_id, *sections).await,
        Command::Item { item_id, section } => workflows::show_item(&ctx, item_id, *section).await,
        Command::Recent { days } => workflows::recent(&ctx, *days).await,
        Command::Today => workflows::schedule(&ctx, None).await,
        Command::Schedule { day } => workflows::schedule(&ctx, *day).await,
        Command::Stats => workflows::stats(&ctx).await,
        Command::Check => workflows::check(&ctx).await,
        Command::Admin { action } => workflows::admin(&ctx, action).await,
    }
}

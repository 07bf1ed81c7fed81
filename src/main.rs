// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use lecture_hub::{cli::Cli, logging, run_from_cli, symbols};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", *symbols::WARN);
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "lecture-hub".to_string());

    let after_help = format!(
        "示例:\n  # 打开资源，生成嵌入/查看/下载链接\n  {bin} open r1\n\n  # 直接转换一个链接\n  {bin} links \"https://youtu.be/abc123\"\n\n  # 使用本地快照文件查看课程\n  {bin} --data snapshot.json courses\n\n  # 添加资源\n  {bin} admin resource add --parent <讲座ID> --kind video --title \"...\" --url \"https://...\"",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logging::init_logger(args.log_level);

    if let Err(e) = run_from_cli(args).await {
        eprintln!("\n{} {}", *symbols::ERROR, format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}

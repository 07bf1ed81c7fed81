// src/symbols.rs

use std::sync::LazyLock;
use colored::{Colorize, ColoredString};

pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());
pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());

// 资源列表中的类型标记
pub static FILE: LazyLock<ColoredString> = LazyLock::new(|| "[文档]".blue());
pub static AUDIO: LazyLock<ColoredString> = LazyLock::new(|| "[音频]".magenta());
pub static VIDEO: LazyLock<ColoredString> = LazyLock::new(|| "[视频]".red());
pub static LECTURE: LazyLock<ColoredString> = LazyLock::new(|| "[讲座]".cyan());
pub static SECTION: LazyLock<ColoredString> = LazyLock::new(|| "[实践]".green());

// src/config/file.rs

use crate::{
    config::{ExternalConfig, StoreConfig}, // 只需要从父模块导入结构体定义
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{fs, path::PathBuf};
use url::Url;

fn config_dir() -> AppResult<PathBuf> {
    let dir = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME);
    Ok(dir)
}

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    Ok(config_dir()?.join(constants::CONFIG_FILE_NAME))
}

pub(crate) fn default_data_path() -> AppResult<PathBuf> {
    Ok(config_dir()?.join(constants::DATA_FILE_NAME))
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

/// 依次从命令行、环境变量、配置文件中查找数据库地址。
///
/// 返回解析后的地址、访问凭据和来源说明；都未配置时返回 `None`，使用本地文件。
pub fn resolve_remote(
    cli_url: Option<&str>,
    file_config: &StoreConfig,
) -> AppResult<Option<(Url, Option<String>, String)>> {
    let env_auth = std::env::var(constants::env::AUTH)
        .ok()
        .filter(|s| !s.is_empty());
    let auth = env_auth.or_else(|| file_config.auth.clone());

    if let Some(url) = cli_url && !url.is_empty() {
        debug!("使用来自命令行参数的数据库地址");
        return Ok(Some((parse_base_url(url)?, auth, "命令行参数".to_string())));
    }
    if let Ok(url) = std::env::var(constants::env::DATABASE_URL) && !url.is_empty() {
        debug!("使用来自环境变量 {} 的数据库地址", constants::env::DATABASE_URL);
        return Ok(Some((
            parse_base_url(&url)?,
            auth,
            format!("环境变量 ({})", constants::env::DATABASE_URL),
        )));
    }
    if let Some(url) = file_config.database_url.as_deref() && !url.is_empty() {
        debug!("使用来自本地配置文件的数据库地址");
        return Ok(Some((parse_base_url(url)?, auth, "本地配置文件".to_string())));
    }
    debug!("未配置数据库地址，使用本地数据文件");
    Ok(None)
}

/// 统一为以 `/` 结尾的地址，便于后续 `join(".json")`
pub fn parse_base_url(raw: &str) -> AppResult<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&with_slash)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::UserInputError(format!(
            "数据库地址必须是 http(s) 链接: '{}'",
            raw
        )));
    }
    Ok(url)
}

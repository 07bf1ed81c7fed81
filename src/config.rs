// src/config.rs

pub mod file;

use self::file::{load_or_create_external_config, resolve_remote};
use crate::{cli::Cli, constants, error::AppResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// 数据快照的来源: 本地 JSON 文件或数据库 REST 接口
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default = "default_recent_days")]
    pub recent_days: i64,
}

fn default_recent_days() -> i64 {
    constants::DEFAULT_RECENT_DAYS
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组稳健的默认值
        let network_config = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(30),
            max_retries: Some(3),
        };

        Self {
            store: StoreConfig::default(),
            network: network_config,
            recent_days: constants::DEFAULT_RECENT_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    File(PathBuf),
    Remote { base_url: Url, auth: Option<String> },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreTarget,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub recent_days: i64,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;

        let store = if let Some(path) = &args.data {
            debug!("使用命令行指定的数据文件: {}", path.display());
            StoreTarget::File(path.clone())
        } else if let Some((base_url, auth, source)) =
            resolve_remote(args.remote.as_deref(), &external_config.store)?
        {
            debug!("使用来自{}的数据库地址: {}", source, base_url);
            StoreTarget::Remote { base_url, auth }
        } else {
            let path = match external_config.store.data_file.clone() {
                Some(path) => path,
                None => file::default_data_path()?,
            };
            StoreTarget::File(path)
        };

        Ok(Self {
            store,
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external_config.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external_config.network.timeout_secs.unwrap_or(30)),
            max_retries: external_config.network.max_retries.unwrap_or(3),
            recent_days: external_config.recent_days.max(0),
        })
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreTarget::File(PathBuf::from(constants::DATA_FILE_NAME)),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 2,
            recent_days: constants::DEFAULT_RECENT_DAYS,
        }
    }
}

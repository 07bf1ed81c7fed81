// src/store/mod.rs

pub mod file;
pub mod remote;

pub use file::FileStore;
pub use remote::RemoteStore;

use crate::{
    client::RobustClient,
    config::{AppConfig, StoreTarget},
    error::*,
    models::Snapshot,
};
use async_trait::async_trait;
use log::info;

/// 文档树快照的来源。核心逻辑只接收这里产生的不可变快照。
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// 用于提示信息的来源描述
    fn describe(&self) -> String;

    async fn load(&self) -> AppResult<Snapshot>;

    /// 整体写入快照
    async fn save(&self, snapshot: &Snapshot) -> AppResult<()>;

    /// 写回 `base` 到 `updated` 之间的改动。默认整体写入 `updated`。
    async fn save_changes(&self, _base: &Snapshot, updated: &Snapshot) -> AppResult<()> {
        self.save(updated).await
    }
}

pub fn open_store(config: &AppConfig) -> AppResult<Box<dyn SnapshotStore>> {
    let store: Box<dyn SnapshotStore> = match &config.store {
        StoreTarget::File(path) => Box::new(FileStore::new(path.clone())),
        StoreTarget::Remote { base_url, auth } => Box::new(RemoteStore::new(
            RobustClient::new(config)?,
            base_url.clone(),
            auth.clone(),
        )),
    };
    info!("使用数据来源: {}", store.describe());
    Ok(store)
}

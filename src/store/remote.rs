// src/store/remote.rs

use super::SnapshotStore;
use crate::{client::RobustClient, error::*, models::Snapshot};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::{Map, Value};
use url::Url;

/// 通过 REST 接口读取/写入文档树 (`<base>/.json`)
pub struct RemoteStore {
    client: RobustClient,
    base_url: Url,
    auth: Option<String>,
}

impl RemoteStore {
    pub fn new(client: RobustClient, base_url: Url, auth: Option<String>) -> Self {
        Self {
            client,
            base_url,
            auth,
        }
    }

    fn document_url(&self) -> AppResult<Url> {
        let mut url = self.base_url.join(".json")?;
        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }
        Ok(url)
    }
}

/// 比较两棵文档树，得到多路径更新: `"courses/c1/name" -> 新值`，删除的节点为 `null`。
///
/// 只下钻到双方都是对象的层级，新增的子树整体写入。
pub fn changed_paths(base: &Value, updated: &Value) -> Map<String, Value> {
    let mut changes = Map::new();
    collect_changes(&mut changes, "", base, updated);
    changes
}

fn collect_changes(changes: &mut Map<String, Value>, path: &str, base: &Value, updated: &Value) {
    let child_path = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", path, key)
        }
    };
    match (base, updated) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, new_value) in new {
                match old.get(key) {
                    Some(old_value) => collect_changes(changes, &child_path(key), old_value, new_value),
                    None => {
                        changes.insert(child_path(key), new_value.clone());
                    }
                }
            }
            for key in old.keys().filter(|key| !new.contains_key(*key)) {
                changes.insert(child_path(key), Value::Null);
            }
        }
        _ if base == updated => {}
        _ => {
            changes.insert(path.to_string(), updated.clone());
        }
    }
}

#[async_trait]
impl SnapshotStore for RemoteStore {
    fn describe(&self) -> String {
        format!("数据库 {}", self.base_url)
    }

    async fn load(&self) -> AppResult<Snapshot> {
        let url = self.document_url()?;
        let body = self.client.get(url).await?.text().await?;
        // 空数据库返回 null
        if body.trim() == "null" {
            info!("数据库为空，视为空快照");
            return Ok(Snapshot::default());
        }
        let snapshot: Snapshot =
            serde_json::from_str(&body).map_err(|source| AppError::SnapshotParseFailed {
                source_name: self.base_url.to_string(),
                source,
            })?;
        debug!("已从 {} 加载 {} 门课程", self.base_url, snapshot.courses.len());
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> AppResult<()> {
        let url = self.document_url()?;
        self.client.put_json(url, snapshot).await?;
        info!("快照已整体写回 {}", self.base_url);
        Ok(())
    }

    /// 只 PATCH 改动过的路径，其它节点以及他人同时写入的数据保持不变
    async fn save_changes(&self, base: &Snapshot, updated: &Snapshot) -> AppResult<()> {
        let changes = changed_paths(&serde_json::to_value(base)?, &serde_json::to_value(updated)?);
        if changes.is_empty() {
            info!("没有需要写回的改动");
            return Ok(());
        }
        debug!("写回路径: {:?}", changes.keys().collect::<Vec<_>>());
        let url = self.document_url()?;
        self.client.patch_json(url, &changes).await?;
        info!("已向 {} 写回 {} 个路径", self.base_url, changes.len());
        Ok(())
    }
}

// src/store/file.rs

use super::SnapshotStore;
use crate::{error::*, models::Snapshot};
use async_trait::async_trait;
use log::{debug, info};
use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// 以 JSON 文件保存的本地快照
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    fn describe(&self) -> String {
        format!("本地文件 {}", self.path.display())
    }

    async fn load(&self) -> AppResult<Snapshot> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("数据文件 {:?} 不存在，视为空快照", self.path);
                return Ok(Snapshot::default());
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() || content.trim() == "null" {
            return Ok(Snapshot::default());
        }
        serde_json::from_str(&content).map_err(|source| AppError::SnapshotParseFailed {
            source_name: self.path.display().to_string(),
            source,
        })
    }

    /// 先写入同目录下的临时文件再替换，避免中断时留下半个文件
    async fn save(&self, snapshot: &Snapshot) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> AppResult<()> {
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&dir)?;
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&json)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path)?;
            debug!("快照已写入 {}", path.display());
            Ok(())
        })
        .await
        .map_err(|e| AppError::Other(e.into()))?
    }
}

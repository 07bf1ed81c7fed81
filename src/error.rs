// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("数据库拒绝访问 (凭据无效或没有权限)")]
    AuthRejected,
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{source_name}' 的数据快照: {source}")]
    SnapshotParseFailed {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("{kind}不存在: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("资源 ID '{id}' 已存在于 '{parent_id}' 下，资源 ID 必须全局唯一")]
    DuplicateResource { id: String, parent_id: String },
    #[error("字段校验失败: {0}")]
    Validation(String),
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    UserInputError(String),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound { kind, id: id.into() }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// ==========================================
// 车队台账导入导出系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户可读的错误消息
// 说明: 分析/导入/导出以结果结构体返回失败，此类型只覆盖存储管理操作
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 调用参数错误
    // ==========================================
    #[error("数据表不存在: {0}")]
    UnknownTable(String),

    // ==========================================
    // 存储错误
    // ==========================================
    #[error("存储初始化失败: {0}")]
    StorageInitError(String),

    #[error("存储错误: {0}")]
    StorageError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnknownTable(table) => ApiError::UnknownTable(table),
            RepositoryError::InitializationError { path, message } => {
                ApiError::StorageInitError(format!("{}: {}", path, message))
            }
            err @ (RepositoryError::StorageWrite { .. } | RepositoryError::Serialization { .. }) => {
                ApiError::StorageError(err.to_string())
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

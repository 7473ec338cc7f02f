// ==========================================
// 车队台账导入导出系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 读取失败不构成错误（视为空表），只有写入路径会报错
//       写入前发现文件无法完整解析同样报 StorageWrite
// ==========================================

use crate::domain::types::UnknownEntity;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 表名错误 =====
    #[error("数据表不存在: {0}")]
    UnknownTable(String),

    // ===== 存储错误 =====
    #[error("存储目录初始化失败 ({path}): {message}")]
    InitializationError { path: String, message: String },

    #[error("数据表写入失败 (table={table}): {message}")]
    StorageWrite { table: String, message: String },

    #[error("记录序列化失败 (table={table}): {message}")]
    Serialization { table: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<UnknownEntity> for RepositoryError {
    fn from(err: UnknownEntity) -> Self {
        RepositoryError::UnknownTable(err.0)
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

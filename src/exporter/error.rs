// ==========================================
// 车队台账导入导出系统 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("数据表不存在: {0}")]
    UnknownTable(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("xlsx 写入失败: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("文件写出失败: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;

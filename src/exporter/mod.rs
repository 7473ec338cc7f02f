// ==========================================
// 车队台账导入导出系统 - 导出层
// ==========================================
// 职责: 分表存储 → xlsx 工作簿
// ==========================================

pub mod error;
pub mod workbook_exporter;

pub use error::{ExportError, ExportResult};
pub use workbook_exporter::WorkbookExporter;

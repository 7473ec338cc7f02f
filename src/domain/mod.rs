// ==========================================
// 车队台账导入导出系统 - 领域层
// ==========================================
// 职责: 实体类型 / 记录 / 表格模型定义
// 红线: 领域层不含 IO
// ==========================================

pub mod record;
pub mod sheet;
pub mod types;

// 重导出核心类型
pub use record::{is_system_field, Fields, Record, SYSTEM_FIELDS};
pub use sheet::{
    CellValue, ExportOutcome, ImportOutcome, ImportRequest, SheetAnalysis, SheetGrid,
    SheetImportSummary, StoreStats, TableExportStatus, Workbook, WorkbookAnalysis,
};
pub use types::{EntityType, UnknownEntity, UNKNOWN_ENTITY};

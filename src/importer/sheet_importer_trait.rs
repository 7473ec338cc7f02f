// ==========================================
// 车队台账导入导出系统 - 表格导入 Trait
// ==========================================
// 职责: 定义表格分析/导入接口及各阶段组件接口（不包含实现）
// 导入管道: 文件读取 → 实体识别 → 字段映射 → 必填校验 → 批量落库
// ==========================================

use crate::domain::{
    CellValue, EntityType, Fields, ImportOutcome, ImportRequest, SheetAnalysis, SheetGrid,
    Workbook, WorkbookAnalysis,
};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// SpreadsheetImporter Trait
// ==========================================
// 用途: 表格导入主接口
// 实现者: SheetImporterImpl
#[async_trait]
pub trait SpreadsheetImporter: Send + Sync {
    /// 只读分析: 列出工作表、表头、预览行与识别出的实体
    ///
    /// # 返回
    /// - Err: 文件不存在/格式不支持/无法解析
    async fn analyze(&self, file_path: &Path) -> ImportResult<WorkbookAnalysis>;

    /// 导入选中的工作表
    ///
    /// 永不返回 Err: 启动阶段失败体现为 success=false，
    /// 工作表级错误收集到 errors，行级问题计数后丢弃
    async fn import(&self, file_path: &Path, request: &ImportRequest) -> ImportOutcome;
}

// ==========================================
// WorkbookReader Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait WorkbookReader: Send + Sync {
    /// 解析整个文件为工作表网格
    ///
    /// 单个工作表读取失败记录在 Workbook::sheet_errors，不影响其他工作表
    fn read_workbook(&self, file_path: &Path) -> ImportResult<Workbook>;
}

// ==========================================
// EntityDetector Trait
// ==========================================
// 用途: 实体识别接口（阶段 1）
// 实现者: SchemaDetector
pub trait EntityDetector: Send + Sync {
    /// 按表名与表头猜测实体类型；None 表示 unknown
    fn detect(&self, sheet_name: &str, headers: &[String]) -> Option<EntityType>;

    /// 生成单个工作表的分析结果
    fn analyze_sheet(&self, grid: &SheetGrid, preview_rows: usize) -> SheetAnalysis;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射 + 取值转换接口（阶段 2）
// 实现者: PatternFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将一行映射为候选记录；找不到来源的字段直接省略
    ///
    /// # 参数
    /// - headers: 工作表表头（原始大小写）
    /// - row: 与表头按列对齐的单元格
    fn map_row(&self, entity: EntityType, headers: &[String], row: &[CellValue]) -> Fields;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 必填字段校验接口（阶段 3）
// 实现者: RequiredFieldValidator
pub trait DqValidator: Send + Sync {
    /// 候选记录是否满足该实体的全部必填字段
    fn passes(&self, entity: EntityType, candidate: &Fields) -> bool;

    /// 缺失的必填字段（日志用）
    fn missing_fields(&self, entity: EntityType, candidate: &Fields) -> Vec<&'static str>;
}

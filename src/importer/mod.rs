// ==========================================
// 车队台账导入导出系统 - 导入层
// ==========================================
// 职责: 表格文件分析与导入，生成分表记录
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls/.ods), CSV
// ==========================================

// 模块声明
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod field_rules;
pub mod file_parser;
pub mod schema_detector;
pub mod sheet_importer_impl;
pub mod sheet_importer_trait;
pub mod suggestion;
pub mod value_coercer;

// 重导出核心类型
pub use dq_validator::RequiredFieldValidator;
pub use error::{ImportError, ImportResult};
pub use field_mapper::PatternFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use schema_detector::{SchemaDetector, DEFAULT_DETECTION_THRESHOLD};
pub use sheet_importer_impl::SheetImporterImpl;
pub use suggestion::{export_suggestion, suggestion_for, suggestion_for_error};
pub use value_coercer::ValueCoercer;

// 重导出 Trait 接口
pub use sheet_importer_trait::{
    DqValidator, EntityDetector, FieldMapper, SpreadsheetImporter, WorkbookReader,
};

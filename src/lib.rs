// ==========================================
// 车队台账导入导出系统 - 核心库
// ==========================================
// 职责: 表格识别 / 字段映射 / 分表存储 / 表格导出
// 技术栈: Rust + tokio + calamine + rust_xlsxwriter
// 存储: 每表一个 JSON 文件，每表一把锁
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 表格写出
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, EntityType, ExportOutcome, Fields, ImportOutcome, ImportRequest, Record,
    SheetAnalysis, SheetImportSummary, StoreStats, TableExportStatus, WorkbookAnalysis,
};

// 存储
pub use repository::{JsonTableStore, RecordRepository, RepositoryError};

// 导入 / 导出
pub use exporter::WorkbookExporter;
pub use importer::{SchemaDetector, SheetImporterImpl, SpreadsheetImporter};

// API
pub use api::{ApiError, FleetApi};

// 配置
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车队台账导入导出系统";

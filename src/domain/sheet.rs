// ==========================================
// 车队台账导入导出系统 - 表格领域模型
// ==========================================
// 职责: 表格单元格 / 工作表网格 / 分析结果 / 导入导出结果
// 用途: 导入层产出，API 层序列化返回
// ==========================================

use crate::domain::types::{EntityType, UNKNOWN_ENTITY};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// ISO-8601 输出格式（无时区，秒后小数位非零时才输出）
pub const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// 空单元格或仅含空白的文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 字符串化（预览/非数值字段使用）
    ///
    /// 整数值不带小数部分: 2020.0 → "2020"
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format(ISO_DATETIME_FORMAT).to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// SheetGrid - 工作表网格（表头 + 数据行）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub headers: Vec<String>,       // 首行表头（已 trim，空表头保持为空）
    pub rows: Vec<Vec<CellValue>>,  // 数据行（已跳过整行空白）
}

impl SheetGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

// ==========================================
// Workbook - 解析后的整个表格文件
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheet_names: Vec<String>,            // 文件内原始顺序
    pub sheets: HashMap<String, SheetGrid>,  // 成功读取的工作表
    pub sheet_errors: HashMap<String, String>, // 读取失败的工作表 → 原因
    pub file_size: u64,
}

impl Workbook {
    pub fn contains(&self, sheet_name: &str) -> bool {
        self.sheet_names.iter().any(|name| name == sheet_name)
    }
}

// ==========================================
// SheetAnalysis - 单个工作表的分析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetAnalysis {
    pub columns: Vec<String>,
    pub row_count: usize,
    pub preview: Vec<Vec<String>>,
    #[serde(serialize_with = "serialize_detected_entity")]
    pub detected_entity: Option<EntityType>,
    pub column_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SheetAnalysis {
    /// 网格无法读取的工作表: 空列、unknown 实体、附带原因
    pub fn unreadable(error: String) -> Self {
        Self {
            columns: Vec::new(),
            row_count: 0,
            preview: Vec::new(),
            detected_entity: None,
            column_count: 0,
            error: Some(error),
        }
    }
}

fn serialize_detected_entity<S: Serializer>(
    entity: &Option<EntityType>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(entity.map(|e| e.as_str()).unwrap_or(UNKNOWN_ENTITY))
}

// ==========================================
// WorkbookAnalysis - 文件分析结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct WorkbookAnalysis {
    pub sheets: Vec<String>,
    pub sheets_info: BTreeMap<String, SheetAnalysis>,
    pub total_sheets: usize,
    pub file_size: u64,
}

// ==========================================
// ImportRequest - 导入调用参数
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRequest {
    /// 待导入的工作表（不可为空）
    pub selected_sheets: Vec<String>,
    /// 显式覆写: 工作表名 → 实体类型标识（"unknown" 表示跳过）
    #[serde(default)]
    pub entity_overrides: HashMap<String, String>,
    /// 导入前清空全部十张表
    #[serde(default)]
    pub clear_existing: bool,
}

// ==========================================
// SheetImportSummary - 单个工作表的导入摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetImportSummary {
    pub entity_type: EntityType,
    pub record_count: usize,       // 成功写入条数
    pub inserted_ids: Vec<String>, // 前 5 个 id，供追溯
    pub total_rows: usize,         // 非空数据行
    pub skipped_rows: usize,       // 未通过必填校验而丢弃的行
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub message: String,
    pub summary: BTreeMap<String, SheetImportSummary>,
    pub total_imported: usize,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ImportOutcome {
    /// 启动阶段失败（空选择/文件不可读等），不产生任何副作用
    pub fn setup_failure(message: String, errors: Vec<String>, suggestion: Option<String>) -> Self {
        Self {
            success: false,
            message,
            errors,
            suggestion,
            ..Default::default()
        }
    }
}

// ==========================================
// ExportOutcome - 导出结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableExportStatus {
    Exported(usize),
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
    pub summary: BTreeMap<String, TableExportStatus>,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

// ==========================================
// StoreStats - 存储统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    pub database_path: String,
    pub tables: BTreeMap<String, usize>,
    pub total_records: usize,
}

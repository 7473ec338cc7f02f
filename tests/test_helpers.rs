// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时存储目录、测试工作簿生成、API 装配
// ==========================================
#![allow(dead_code)]

use fleet_records::config::AppConfig;
use fleet_records::domain::{Fields, ImportRequest};
use fleet_records::{FleetApi, JsonTableStore};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// 测试工作表定义: (表名, 表头, 数据行)
pub struct SheetSpec<'a> {
    pub name: &'a str,
    pub headers: &'a [&'a str],
    pub rows: Vec<Vec<Value>>,
}

impl<'a> SheetSpec<'a> {
    pub fn new(name: &'a str, headers: &'a [&'a str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            name,
            headers,
            rows,
        }
    }
}

/// 创建临时存储并初始化
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
/// - Arc<JsonTableStore>: 已初始化的存储
pub async fn create_test_store() -> Result<(TempDir, Arc<JsonTableStore>), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let store = Arc::new(JsonTableStore::new(dir.path().join("db")));
    store.initialize().await?;
    Ok((dir, store))
}

/// 在临时目录下创建 API（存储目录为 <dir>/db）
pub async fn create_test_api() -> Result<(TempDir, FleetApi), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let config = AppConfig::with_data_dir(dir.path().join("db"));
    let api = FleetApi::open(config).await?;
    Ok((dir, api))
}

/// JSON 对象 → Fields
pub fn fields(value: Value) -> Fields {
    value
        .as_object()
        .cloned()
        .expect("fields() 需要 JSON 对象")
}

/// 写出测试用 xlsx 工作簿
///
/// 单元格: 字符串 → 文本，数字 → 数值，布尔 → 布尔，null → 留空
pub fn write_workbook(dir: &Path, file_name: &str, sheets: &[SheetSpec]) -> Result<PathBuf, Box<dyn Error>> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet().set_name(sheet.name)?;
        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }
        for (idx, row) in sheet.rows.iter().enumerate() {
            let r = (idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                match cell {
                    Value::Null => {}
                    Value::String(s) => {
                        worksheet.write_string(r, c, s)?;
                    }
                    Value::Number(n) => {
                        worksheet.write_number(r, c, n.as_f64().unwrap_or_default())?;
                    }
                    Value::Bool(b) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                    other => {
                        worksheet.write_string(r, c, other.to_string())?;
                    }
                }
            }
        }
    }

    let path = dir.join(file_name);
    workbook.save(&path)?;
    Ok(path)
}

/// 构造导入请求
pub fn import_request(sheets: &[&str], clear_existing: bool) -> ImportRequest {
    ImportRequest {
        selected_sheets: sheets.iter().map(|s| s.to_string()).collect(),
        entity_overrides: HashMap::new(),
        clear_existing,
    }
}

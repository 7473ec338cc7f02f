// ==========================================
// 车队台账导入导出系统 - 取值转换器
// ==========================================
// 职责: 按标准字段类别把单元格转换为存储值
//   日期/时间字段 → ISO-8601 文本（解析失败保留原文）
//   数值字段     → f64（解析失败或非有限值 → 0.0）
//   其他字段     → trim 后的文本（为空则省略）
// ==========================================

use crate::domain::sheet::ISO_DATETIME_FORMAT;
use crate::domain::CellValue;
use crate::importer::field_rules::{field_kind, FieldKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};

// 文本日期时间格式（先月后日）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

pub struct ValueCoercer;

impl ValueCoercer {
    /// 按字段名选择转换方式
    ///
    /// # 返回
    /// - None: 该字段应从记录中省略
    pub fn coerce(&self, field: &str, cell: &CellValue) -> Option<Value> {
        match field_kind(field) {
            FieldKind::Temporal => self.coerce_temporal(cell),
            FieldKind::Numeric => Some(self.coerce_numeric(cell)),
            FieldKind::Text => self.coerce_text(cell),
        }
    }

    fn coerce_temporal(&self, cell: &CellValue) -> Option<Value> {
        let text = match cell {
            CellValue::DateTime(dt) => dt.format(ISO_DATETIME_FORMAT).to_string(),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                match parse_datetime(trimmed) {
                    Some(dt) => dt.format(ISO_DATETIME_FORMAT).to_string(),
                    None => trimmed.to_string(),
                }
            }
            other => other.to_display_string(),
        };
        non_empty(text)
    }

    fn coerce_numeric(&self, cell: &CellValue) -> Value {
        let n = match cell {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::DateTime(_) | CellValue::Empty => 0.0,
        };
        // NaN / inf 无法写入 JSON
        Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0.0))
    }

    fn coerce_text(&self, cell: &CellValue) -> Option<Value> {
        non_empty(cell.to_display_string().trim().to_string())
    }
}

fn non_empty(text: String) -> Option<Value> {
    if text.is_empty() {
        None
    } else {
        Some(Value::String(text))
    }
}

/// 解析文本日期时间；纯日期补 00:00:00
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

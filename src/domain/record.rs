// ==========================================
// 车队台账导入导出系统 - 记录模型
// ==========================================
// 记录 = 系统字段 (id / created_at / updated_at) + 开放的业务字段
// 红线: id 只分配一次且不可变；created_at 插入后不再变化
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 业务字段集合（字段名 → 标量值），保留插入顺序
pub type Fields = serde_json::Map<String, Value>;

/// 系统字段名
pub const FIELD_ID: &str = "id";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_UPDATED_AT: &str = "updated_at";

/// 全部系统字段（导出时剔除，写入时忽略调用方传入的同名键）
pub const SYSTEM_FIELDS: [&str; 3] = [FIELD_ID, FIELD_CREATED_AT, FIELD_UPDATED_AT];

/// 判断是否为系统字段
pub fn is_system_field(name: &str) -> bool {
    SYSTEM_FIELDS.contains(&name)
}

// ==========================================
// Record - 存储单元
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct Record {
    // ===== 系统字段 =====
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // ===== 业务字段（未知键一律保留）=====
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// 以新 id 和当前时间创建记录
    pub fn new(id: String, now: DateTime<Utc>, fields: Fields) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            fields: strip_system_fields(fields),
        }
    }

    /// 合并覆盖: 只改变 patch 中出现的业务字段，并刷新 updated_at
    pub fn apply_patch(&mut self, patch: Fields, now: DateTime<Utc>) {
        for (key, value) in strip_system_fields(patch) {
            self.fields.insert(key, value);
        }
        self.updated_at = now;
    }

    /// 读取字段值（系统字段同样可查）
    pub fn get(&self, field: &str) -> Option<Value> {
        match field {
            FIELD_ID => Some(Value::String(self.id.clone())),
            FIELD_CREATED_AT => Some(Value::String(self.created_at.to_rfc3339())),
            FIELD_UPDATED_AT => Some(Value::String(self.updated_at.to_rfc3339())),
            _ => self.fields.get(field).cloned(),
        }
    }

    /// 全部给定 (字段, 值) 相等才算匹配；字段缺失即不匹配
    ///
    /// 数值按大小比较: 40 与 40.0 视为相等
    pub fn matches(&self, filters: &[(&str, Value)]) -> bool {
        filters.iter().all(|(field, expected)| {
            self.get(field)
                .is_some_and(|actual| values_equal(&actual, expected))
        })
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => actual == expected,
    }
}

// ==========================================
// 磁盘格式 → Record
// ==========================================
// 时间戳宽松解析: RFC3339，或不带时区的 ISO-8601（按 UTC 处理）
// updated_at 缺失时取 created_at；created_at 缺失时取 updated_at
#[derive(Deserialize)]
struct StoredRecord {
    id: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(flatten)]
    fields: Fields,
}

impl TryFrom<StoredRecord> for Record {
    type Error = String;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        let created_at = stored.created_at.as_deref().map(parse_timestamp).transpose()?;
        let updated_at = stored.updated_at.as_deref().map(parse_timestamp).transpose()?;

        let (created_at, updated_at) = match (created_at, updated_at) {
            (Some(created), Some(updated)) => (created, updated),
            (Some(created), None) => (created, created),
            (None, Some(updated)) => (updated, updated),
            (None, None) => return Err(format!("记录 {} 缺少时间戳", stored.id)),
        };

        Ok(Self {
            id: stored.id,
            created_at,
            updated_at,
            fields: stored.fields,
        })
    }
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 解析时间戳；不带时区的按 UTC
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("无法解析的时间戳: {}", raw))
}

/// 丢弃调用方传入的系统字段
fn strip_system_fields(mut fields: Fields) -> Fields {
    fields.retain(|name, _| !is_system_field(name));
    fields
}

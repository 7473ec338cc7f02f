// ==========================================
// 车队台账导入导出系统 - 领域类型定义
// ==========================================
// 职责: 十张固定数据表（实体类型）的标识
// 红线: 实体集合固定，运行期不可扩展
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 未识别实体的标记值（分析结果/覆写映射中使用）
pub const UNKNOWN_ENTITY: &str = "unknown";

/// 固定数据表数量
pub const TABLE_COUNT: usize = 10;

// ==========================================
// 实体类型 (Entity Type)
// ==========================================
// 声明顺序即识别优先级: 表名命中或列得分相同时，靠前者胜出
// 序列化格式: snake_case (与存储文件名一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Vehicles,    // 车辆
    Drivers,     // 驾驶员
    Trips,       // 行车记录
    FuelEntries, // 加油记录
    FuelPrices,  // 油价
    JobOrders,   // 工单
    Maintenance, // 维修保养
    Routes,      // 路线
    Reporting,   // 日报
    Overtime,    // 加班
}

impl EntityType {
    /// 全部实体（按声明顺序）
    pub const ALL: [EntityType; TABLE_COUNT] = [
        EntityType::Vehicles,
        EntityType::Drivers,
        EntityType::Trips,
        EntityType::FuelEntries,
        EntityType::FuelPrices,
        EntityType::JobOrders,
        EntityType::Maintenance,
        EntityType::Routes,
        EntityType::Reporting,
        EntityType::Overtime,
    ];

    /// 表标识（同时作为存储文件名）
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Vehicles => "vehicles",
            EntityType::Drivers => "drivers",
            EntityType::Trips => "trips",
            EntityType::FuelEntries => "fuel_entries",
            EntityType::FuelPrices => "fuel_prices",
            EntityType::JobOrders => "job_orders",
            EntityType::Maintenance => "maintenance",
            EntityType::Routes => "routes",
            EntityType::Reporting => "reporting",
            EntityType::Overtime => "overtime",
        }
    }

    /// 导出时的工作表名: 下划线转空格，单词首字母大写
    ///
    /// fuel_entries → "Fuel Entries"
    pub fn sheet_title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 表名解析失败（非十张固定表之一）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntity(pub String);

impl fmt::Display for UnknownEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未知数据表: {}", self.0)
    }
}

impl std::error::Error for UnknownEntity {}

impl FromStr for EntityType {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .copied()
            .find(|entity| entity.as_str() == s)
            .ok_or_else(|| UnknownEntity(s.to_string()))
    }
}

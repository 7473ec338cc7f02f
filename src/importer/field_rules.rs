// ==========================================
// 车队台账导入导出系统 - 识别与映射规则表
// ==========================================
// 职责: 表名模式 / 字段表头模式 / 必填字段 / 数值字段
// 红线: 规则为静态声明数据，不在分支代码中硬编码，不随表状态变化
// 约定: 所有模式均为小写子串，匹配时对表名/表头做小写化
// ==========================================

use crate::domain::EntityType;

// ==========================================
// FieldRule - 单个标准字段的表头模式
// ==========================================
// patterns 顺序即优先级: 靠前的模式先于靠后的模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub patterns: &'static [&'static str],
}

const fn rule(field: &'static str, patterns: &'static [&'static str]) -> FieldRule {
    FieldRule { field, patterns }
}

// ==========================================
// 表名模式（按 EntityType 声明顺序检查）
// ==========================================
pub fn sheet_name_patterns(entity: EntityType) -> &'static [&'static str] {
    match entity {
        EntityType::Vehicles => &["vehs", "vehicles", "fleet", "cars", "vehicle"],
        EntityType::Drivers => &[
            "attendence", "attendance", "drivers", "driver", "employees", "staff", "personnel",
        ],
        EntityType::Trips => &["log book", "logbook", "trips", "journey", "travel", "trip", "logs"],
        EntityType::FuelEntries => &[
            "pol soi & ent", "pol utilized", "pol exp (rs)", "pol monthly", "pol (rs)", "fuel",
            "petrol", "diesel",
        ],
        EntityType::FuelPrices => &["pol prices", "fuel prices", "price", "rates", "pol state"],
        EntityType::JobOrders => &["wo & jo", "job orders", "work orders", "jobs", "orders"],
        EntityType::Maintenance => &["maintenance", "service", "repair", "budget"],
        EntityType::Routes => &["routes", "route", "path", "destination"],
        EntityType::Reporting => &["dr", "daily reporting", "spd reporting", "summary", "summary detail"],
        EntityType::Overtime => &["ot", "overtime", "over time"],
    }
}

// ==========================================
// 字段表头模式（字段顺序即声明顺序）
// ==========================================
const VEHICLE_FIELDS: &[FieldRule] = &[
    rule("registration_number", &["registration", "reg no", "reg #", "vehicle no", "number", "plate"]),
    rule("make_type", &["make", "make & type", "brand", "manufacturer"]),
    rule("model_year", &["model", "year", "model year"]),
    rule("color", &["color", "colour"]),
    rule("engine_number", &["engine no", "engine #", "engine number", "engine"]),
    rule("chassis_number", &["chassis no", "chassis #", "chassis number", "chassis"]),
    rule("fuel_type", &["fuel type", "fuel", "petrol/diesel"]),
    rule("current_odometer", &["odometer", "mileage", "km"]),
    rule("purchase_date", &["purchase date", "bought date", "date"]),
    rule("engine_cc", &["engine cc", "cc", "ep(cc)", "engine capacity"]),
];

const DRIVER_FIELDS: &[FieldRule] = &[
    rule("name", &["name", "driver name", "full name", "driver"]),
    rule("employee_id", &["employee id", "emp id", "staff id"]),
    rule("license_number", &["license", "license number", "dl", "driving license"]),
    rule("license_expiry", &["license expiry", "expiry date", "dl expiry"]),
    rule("phone", &["phone", "mobile", "contact", "cell"]),
    rule("emergency_contact", &["emergency contact", "emergency phone"]),
    rule("address", &["address", "location", "residence"]),
    rule("joining_date", &["hire date", "joining date", "start date"]),
    rule("assigned_vehicle", &["assigned vehicle", "vehicle", "assigned to"]),
];

const TRIP_FIELDS: &[FieldRule] = &[
    rule("vehicle_id", &["vehicle id", "vehicle", "reg no", "registration"]),
    rule("driver_id", &["driver id", "driver", "driver name"]),
    rule("start_km", &["start odometer", "start km", "opening km"]),
    rule("end_km", &["end odometer", "end km", "closing km"]),
    rule("start_time", &["start time", "date", "trip date", "departure"]),
    rule("end_time", &["end time", "end date", "arrival"]),
    rule("purpose", &["purpose", "reason", "description", "trip purpose"]),
    rule("route", &["route id", "route", "path"]),
    rule("distance", &["distance", "km traveled", "total km"]),
    rule("fuel_used", &["fuel used", "fuel consumed", "liters"]),
];

const FUEL_ENTRY_FIELDS: &[FieldRule] = &[
    rule("vehicle_id", &["vehicle id", "vehicle", "reg no", "registration"]),
    rule("driver_id", &["driver id", "driver", "driver name"]),
    rule("date", &["date", "fuel date", "purchase date"]),
    rule("liters", &["liters", "quantity", "fuel quantity", "amount"]),
    rule("cost", &["cost", "amount", "price", "total"]),
    rule("odometer", &["odometer", "mileage", "km"]),
    rule("fuel_type", &["fuel type", "type", "petrol", "diesel"]),
    rule("station", &["station", "fuel station", "pump"]),
    rule("receipt_number", &["receipt", "bill no", "receipt no"]),
];

const FUEL_PRICE_FIELDS: &[FieldRule] = &[
    rule("date", &["date", "price date"]),
    rule("fuel_type", &["fuel type", "type", "petrol", "diesel"]),
    rule("price_per_liter", &["price", "rate", "price per liter", "cost"]),
    rule("location", &["location", "station", "area"]),
];

const JOB_ORDER_FIELDS: &[FieldRule] = &[
    rule("vehicle_id", &["vehicle id", "vehicle", "reg no", "registration"]),
    rule("order_number", &["order no", "job no", "wo no", "work order"]),
    rule("description", &["description", "work description", "job description"]),
    rule("date", &["date", "order date", "work date"]),
    rule("cost", &["cost", "amount", "price", "total"]),
    rule("status", &["status", "work status", "job status"]),
];

const MAINTENANCE_FIELDS: &[FieldRule] = &[
    rule("vehicle_id", &["vehicle id", "vehicle", "reg no", "registration"]),
    rule("type", &["type", "service type", "maintenance type"]),
    rule("description", &["description", "details", "work done"]),
    rule("date", &["date", "service date", "maintenance date"]),
    rule("cost", &["cost", "amount", "price", "total"]),
    rule("odometer", &["odometer", "mileage", "km"]),
    rule("service_provider", &["provider", "garage", "workshop"]),
    rule("next_service_km", &["next service km", "next km"]),
    rule("next_service_date", &["next service date", "due date"]),
];

const ROUTE_FIELDS: &[FieldRule] = &[
    rule("route_name", &["route", "route name", "name"]),
    rule("start_location", &["start", "from", "origin", "start location"]),
    rule("end_location", &["end", "to", "destination", "end location"]),
    rule("distance", &["distance", "km", "kilometers"]),
    rule("estimated_time", &["time", "duration", "estimated time"]),
];

const REPORTING_FIELDS: &[FieldRule] = &[
    rule("date", &["date", "report date"]),
    rule("vehicle_id", &["vehicle", "vehicle id", "reg no"]),
    rule("description", &["description", "details", "report"]),
    rule("status", &["status", "report status"]),
];

const OVERTIME_FIELDS: &[FieldRule] = &[
    rule("employee_id", &["employee", "employee id", "staff id"]),
    rule("date", &["date", "overtime date"]),
    rule("hours", &["hours", "ot hours", "overtime hours"]),
    rule("rate", &["rate", "hourly rate"]),
    rule("total", &["total", "amount"]),
];

/// 实体的标准字段及其表头模式
pub fn field_rules(entity: EntityType) -> &'static [FieldRule] {
    match entity {
        EntityType::Vehicles => VEHICLE_FIELDS,
        EntityType::Drivers => DRIVER_FIELDS,
        EntityType::Trips => TRIP_FIELDS,
        EntityType::FuelEntries => FUEL_ENTRY_FIELDS,
        EntityType::FuelPrices => FUEL_PRICE_FIELDS,
        EntityType::JobOrders => JOB_ORDER_FIELDS,
        EntityType::Maintenance => MAINTENANCE_FIELDS,
        EntityType::Routes => ROUTE_FIELDS,
        EntityType::Reporting => REPORTING_FIELDS,
        EntityType::Overtime => OVERTIME_FIELDS,
    }
}

// ==========================================
// 必填字段（入库门槛）
// ==========================================
pub fn required_fields(entity: EntityType) -> &'static [&'static str] {
    match entity {
        EntityType::Vehicles => &["registration_number"],
        EntityType::Drivers => &["name"],
        EntityType::Trips => &["vehicle_id", "start_km", "start_time"],
        EntityType::FuelEntries => &["vehicle_id", "liters", "date"],
        EntityType::Maintenance => &["vehicle_id", "type", "date"],
        EntityType::JobOrders => &["description", "date"],
        EntityType::FuelPrices => &["fuel_type", "price_per_liter"],
        EntityType::Routes => &["route_name"],
        EntityType::Reporting => &["date", "description"],
        EntityType::Overtime => &["employee_id", "hours"],
    }
}

// ==========================================
// 数值字段（里程/距离/油量/金额/排量）
// ==========================================
pub const NUMERIC_FIELDS: &[&str] = &[
    "current_odometer",
    "engine_cc",
    "start_km",
    "end_km",
    "distance",
    "fuel_used",
    "liters",
    "cost",
    "odometer",
];

/// 字段类别（决定取值转换方式）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Temporal, // 字段名含 date / time
    Numeric,  // 固定数值字段集合
    Text,     // 其余字段
}

pub fn field_kind(field: &str) -> FieldKind {
    if field.contains("date") || field.contains("time") {
        FieldKind::Temporal
    } else if NUMERIC_FIELDS.contains(&field) {
        FieldKind::Numeric
    } else {
        FieldKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_lowercase() {
        for entity in EntityType::ALL {
            for pattern in sheet_name_patterns(entity) {
                assert_eq!(*pattern, pattern.to_lowercase());
            }
            for rule in field_rules(entity) {
                assert!(!rule.patterns.is_empty(), "{}.{} 无模式", entity, rule.field);
                for pattern in rule.patterns {
                    assert_eq!(*pattern, pattern.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn test_required_fields_are_mappable() {
        for entity in EntityType::ALL {
            let rules = field_rules(entity);
            for required in required_fields(entity) {
                assert!(
                    rules.iter().any(|r| r.field == *required),
                    "{} 的必填字段 {} 没有映射规则",
                    entity,
                    required
                );
            }
        }
    }

    #[test]
    fn test_field_kind() {
        assert_eq!(field_kind("purchase_date"), FieldKind::Temporal);
        assert_eq!(field_kind("start_time"), FieldKind::Temporal);
        assert_eq!(field_kind("estimated_time"), FieldKind::Temporal);
        assert_eq!(field_kind("liters"), FieldKind::Numeric);
        assert_eq!(field_kind("price_per_liter"), FieldKind::Text);
        assert_eq!(field_kind("registration_number"), FieldKind::Text);
    }
}

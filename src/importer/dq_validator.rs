// ==========================================
// 车队台账导入导出系统 - 必填字段校验器
// ==========================================
// 职责: 候选记录入库门槛
// 规则: 必填字段缺失 / 空字符串 / 数值 0 均视为未填
// ==========================================

use crate::domain::{EntityType, Fields};
use crate::importer::field_rules::required_fields;
use crate::importer::sheet_importer_trait::DqValidator as DqValidatorTrait;
use serde_json::Value;

pub struct RequiredFieldValidator;

impl DqValidatorTrait for RequiredFieldValidator {
    fn passes(&self, entity: EntityType, candidate: &Fields) -> bool {
        required_fields(entity)
            .iter()
            .all(|field| candidate.get(*field).is_some_and(is_filled))
    }

    fn missing_fields(&self, entity: EntityType, candidate: &Fields) -> Vec<&'static str> {
        required_fields(entity)
            .iter()
            .copied()
            .filter(|field| !candidate.get(*field).is_some_and(is_filled))
            .collect()
    }
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_all_required_present() {
        let candidate = fields(json!({
            "vehicle_id": "ABC-123",
            "liters": 40.0,
            "date": "2024-01-15T00:00:00"
        }));
        assert!(RequiredFieldValidator.passes(EntityType::FuelEntries, &candidate));
    }

    #[test]
    fn test_zero_numeric_fails_gate() {
        let candidate = fields(json!({
            "vehicle_id": "ABC-123",
            "liters": 0.0,
            "date": "2024-01-15T00:00:00"
        }));
        assert!(!RequiredFieldValidator.passes(EntityType::FuelEntries, &candidate));
        assert_eq!(
            RequiredFieldValidator.missing_fields(EntityType::FuelEntries, &candidate),
            vec!["liters"]
        );
    }

    #[test]
    fn test_missing_field_fails_gate() {
        let candidate = fields(json!({"make_type": "Toyota"}));
        assert!(!RequiredFieldValidator.passes(EntityType::Vehicles, &candidate));
        assert!(RequiredFieldValidator.passes(
            EntityType::Vehicles,
            &fields(json!({"registration_number": "X-1"}))
        ));
    }
}

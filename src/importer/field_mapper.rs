// ==========================================
// 车队台账导入导出系统 - 字段映射器实现
// ==========================================
// 职责: 源列 → 标准字段映射 + 取值转换
// 优先级: 模式顺序优先，同一模式内最左列优先；空单元格不算命中
// ==========================================

use crate::domain::{CellValue, EntityType, Fields};
use crate::importer::field_rules::field_rules;
use crate::importer::sheet_importer_trait::FieldMapper as FieldMapperTrait;
use crate::importer::value_coercer::ValueCoercer;

pub struct PatternFieldMapper {
    coercer: ValueCoercer,
}

impl PatternFieldMapper {
    pub fn new() -> Self {
        Self {
            coercer: ValueCoercer,
        }
    }

    /// 查找字段来源单元格: 第一个 (模式, 列) 命中且单元格非空者
    fn locate<'a>(
        &self,
        patterns: &[&str],
        headers: &[String],
        row: &'a [CellValue],
    ) -> Option<&'a CellValue> {
        patterns.iter().find_map(|pattern| {
            headers
                .iter()
                .zip(row.iter())
                .find(|(header, cell)| header.contains(pattern) && !cell.is_blank())
                .map(|(_, cell)| cell)
        })
    }
}

impl Default for PatternFieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapperTrait for PatternFieldMapper {
    fn map_row(&self, entity: EntityType, headers: &[String], row: &[CellValue]) -> Fields {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let mut fields = Fields::new();
        for rule in field_rules(entity) {
            let Some(cell) = self.locate(rule.patterns, &lowered, row) else {
                continue;
            };
            if let Some(value) = self.coercer.coerce(rule.field, cell) {
                fields.insert(rule.field.to_string(), value);
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_map_vehicle_row() {
        let mapper = PatternFieldMapper::new();
        let fields = mapper.map_row(
            EntityType::Vehicles,
            &headers(&["Registration No", "Make & Type", "Colour", "Odometer"]),
            &[
                text("ABC-123"),
                text("Toyota Corolla"),
                text("White"),
                CellValue::Number(45000.0),
            ],
        );

        assert_eq!(fields["registration_number"], json!("ABC-123"));
        assert_eq!(fields["make_type"], json!("Toyota Corolla"));
        assert_eq!(fields["color"], json!("White"));
        assert_eq!(fields["current_odometer"], json!(45000.0));
        assert!(!fields.contains_key("chassis_number"));
    }

    #[test]
    fn test_leftmost_column_wins() {
        let mapper = PatternFieldMapper::new();
        let fields = mapper.map_row(
            EntityType::Drivers,
            &headers(&["Name", "Father Name"]),
            &[text("Ali"), text("Ahmed")],
        );
        assert_eq!(fields["name"], json!("Ali"));
    }

    #[test]
    fn test_blank_cell_falls_through_to_next_column() {
        let mapper = PatternFieldMapper::new();
        let fields = mapper.map_row(
            EntityType::Drivers,
            &headers(&["Name", "Full Name"]),
            &[text("  "), text("Bilal Khan")],
        );
        assert_eq!(fields["name"], json!("Bilal Khan"));
    }

    #[test]
    fn test_earlier_pattern_beats_leftmost_column() {
        // fuel_type: "fuel type" 先于 "type"
        let mapper = PatternFieldMapper::new();
        let fields = mapper.map_row(
            EntityType::FuelPrices,
            &headers(&["Type", "Fuel Type", "Price"]),
            &[text("Premium"), text("Diesel"), CellValue::Number(280.0)],
        );
        assert_eq!(fields["fuel_type"], json!("Diesel"));
        assert_eq!(fields["price_per_liter"], json!("280"));
    }

    #[test]
    fn test_short_row_ignores_missing_cells() {
        let mapper = PatternFieldMapper::new();
        let fields = mapper.map_row(
            EntityType::Routes,
            &headers(&["Route", "From", "To"]),
            &[text("R-1")],
        );
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["route_name"], json!("R-1"));
    }
}

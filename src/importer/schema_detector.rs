// ==========================================
// 车队台账导入导出系统 - 实体识别器
// ==========================================
// 规则:
//   1. 表名（小写）包含某实体的表名模式 → 按声明顺序第一个命中者胜出
//   2. 否则按列覆盖率打分: 命中字段数 / 该实体字段总数
//      字段命中 = 任一表头模式是任一表头（小写）的子串
//   3. 最高分严格大于阈值才采纳，否则 unknown；同分保留靠前实体
// ==========================================

use crate::domain::{EntityType, SheetAnalysis, SheetGrid};
use crate::importer::field_rules::{field_rules, sheet_name_patterns};
use crate::importer::sheet_importer_trait::EntityDetector;
use tracing::debug;

/// 列覆盖率默认阈值
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.3;

pub struct SchemaDetector {
    threshold: f64,
}

impl SchemaDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// 表名匹配
    pub fn detect_by_name(&self, sheet_name: &str) -> Option<EntityType> {
        let lowered = sheet_name.to_lowercase();
        EntityType::ALL.into_iter().find(|entity| {
            sheet_name_patterns(*entity)
                .iter()
                .any(|pattern| lowered.contains(pattern))
        })
    }

    /// 列覆盖率得分 [0, 1]
    pub fn column_score(&self, entity: EntityType, lowered_headers: &[String]) -> f64 {
        let rules = field_rules(entity);
        if rules.is_empty() {
            return 0.0;
        }
        let hits = rules
            .iter()
            .filter(|rule| {
                rule.patterns.iter().any(|pattern| {
                    lowered_headers
                        .iter()
                        .any(|header| !header.is_empty() && header.contains(pattern))
                })
            })
            .count();
        hits as f64 / rules.len() as f64
    }

    /// 按列打分选出最佳实体
    pub fn detect_by_columns(&self, headers: &[String]) -> Option<EntityType> {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let mut best: Option<(EntityType, f64)> = None;
        for entity in EntityType::ALL {
            let score = self.column_score(entity, &lowered);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((entity, score));
            }
        }

        best.filter(|(_, score)| *score > self.threshold)
            .map(|(entity, _)| entity)
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTION_THRESHOLD)
    }
}

impl EntityDetector for SchemaDetector {
    fn detect(&self, sheet_name: &str, headers: &[String]) -> Option<EntityType> {
        if let Some(entity) = self.detect_by_name(sheet_name) {
            debug!(sheet = %sheet_name, entity = %entity, "表名命中");
            return Some(entity);
        }
        let detected = self.detect_by_columns(headers);
        debug!(sheet = %sheet_name, entity = ?detected, "列覆盖率识别");
        detected
    }

    fn analyze_sheet(&self, grid: &SheetGrid, preview_rows: usize) -> SheetAnalysis {
        let preview = grid
            .rows
            .iter()
            .take(preview_rows)
            .map(|row| {
                (0..grid.column_count())
                    .map(|idx| {
                        row.get(idx)
                            .map(|cell| cell.to_display_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        SheetAnalysis {
            columns: grid.headers.clone(),
            row_count: grid.row_count(),
            preview,
            detected_entity: self.detect(&grid.name, &grid.headers),
            column_count: grid.column_count(),
            error: None,
        }
    }
}

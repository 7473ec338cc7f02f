// ==========================================
// 车队台账导入导出系统 - 表格导出器
// ==========================================
// 职责: 分表存储 → xlsx，每张表一个工作表
// 规则: 剔除系统字段；列 = 各记录字段并集（首次出现顺序）；空表也生成空工作表
// 容错: 单表失败记入摘要，其余表继续导出
// ==========================================

use crate::domain::{is_system_field, EntityType, ExportOutcome, Record, TableExportStatus};
use crate::exporter::error::{ExportError, ExportResult};
use crate::i18n::t_with_args;
use crate::importer::suggestion::export_suggestion;
use crate::repository::RecordRepository;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

// ==========================================
// WorkbookExporter
// ==========================================
pub struct WorkbookExporter<R>
where
    R: RecordRepository,
{
    repo: Arc<R>,
}

impl<R> WorkbookExporter<R>
where
    R: RecordRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 导出指定表（None = 全部十张表）到 xlsx 文件
    ///
    /// 永不返回 Err: 单表失败记为 TableExportStatus::Failed，
    /// 文件写出失败体现为 success=false
    #[instrument(skip(self, output_path, tables), fields(output = %output_path.display()))]
    pub async fn export(&self, output_path: &Path, tables: Option<&[String]>) -> ExportOutcome {
        let requested = requested_tables(tables);

        let mut workbook = Workbook::new();
        let mut summary = BTreeMap::new();
        for table in &requested {
            let status = match self.export_table(&mut workbook, table).await {
                Ok(count) => TableExportStatus::Exported(count),
                Err(e) => {
                    warn!(table = %table, error = %e, "数据表导出失败");
                    TableExportStatus::Failed(format!("Error: {}", e))
                }
            };
            summary.insert(table.clone(), status);
        }

        let file_path = output_path.display().to_string();
        match save_workbook(&mut workbook, output_path).await {
            Ok(()) => {
                info!(tables = summary.len(), "导出完成");
                ExportOutcome {
                    success: true,
                    message: t_with_args("export.completed", &[("path", &file_path)]),
                    summary,
                    file_path,
                    suggestion: None,
                }
            }
            Err(e) => {
                error!(error = %e, "导出文件写出失败");
                ExportOutcome {
                    success: false,
                    message: t_with_args("export.failed", &[("error", &e.to_string())]),
                    summary,
                    file_path,
                    suggestion: Some(export_suggestion()),
                }
            }
        }
    }

    /// 导出单张表；仅在整张表写入成功后才加入工作簿
    async fn export_table(&self, workbook: &mut Workbook, table: &str) -> ExportResult<usize> {
        let entity: EntityType = table
            .parse()
            .map_err(|_| ExportError::UnknownTable(table.to_string()))?;
        let records = self.repo.find_all(table).await?;

        let worksheet = build_worksheet(&entity.sheet_title(), &records)?;
        workbook.push_worksheet(worksheet);
        Ok(records.len())
    }
}

/// 请求的表名（去重，保持顺序）；未指定时为全部十张表
fn requested_tables(tables: Option<&[String]>) -> Vec<String> {
    match tables {
        Some(names) if !names.is_empty() => {
            let mut seen = Vec::with_capacity(names.len());
            for name in names {
                if !seen.contains(name) {
                    seen.push(name.clone());
                }
            }
            seen
        }
        _ => EntityType::ALL
            .iter()
            .map(|e| e.as_str().to_string())
            .collect(),
    }
}

/// 列 = 所有记录业务字段的并集，按首次出现顺序
pub fn export_columns(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.fields.keys() {
            if !is_system_field(key) && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn build_worksheet(name: &str, records: &[Record]) -> ExportResult<Worksheet> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(name)?;

    let columns = export_columns(records);
    for (col, header) in columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, header) in columns.iter().enumerate() {
            let col = col as u16;
            match record.fields.get(header) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => {
                    worksheet.write_string(row, col, s)?;
                }
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        worksheet.write_number(row, col, f)?;
                    }
                    None => {
                        worksheet.write_string(row, col, n.to_string())?;
                    }
                },
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Some(other) => {
                    worksheet.write_string(row, col, other.to_string())?;
                }
            }
        }
    }
    Ok(worksheet)
}

async fn save_workbook(workbook: &mut Workbook, output_path: &Path) -> ExportResult<()> {
    let buffer = workbook.save_to_buffer()?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output_path, buffer).await?;
    Ok(())
}

// ==========================================
// 车队台账导入导出系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls/.ods) / CSV (.csv)
// 输出: Workbook（每个工作表 = 首行表头 + 数据行）
// 约定: 表头 trim 后保留空表头；整行空白的数据行跳过
// ==========================================

use crate::domain::{CellValue, SheetGrid, Workbook};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_importer_trait::WorkbookReader;
use crate::importer::value_coercer::parse_datetime;
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Excel 类扩展名
pub const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 小写扩展名
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 解析前的输入校验: 存在 / 扩展名受支持 / 大小不超限
///
/// # 返回
/// - Ok(u64): 文件字节数
pub fn validate_input(path: &Path, max_file_size: u64) -> ImportResult<u64> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = extension_of(path);
    if ext != "csv" && !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }

    let size = std::fs::metadata(path)?.len();
    if size > max_file_size {
        return Err(ImportError::FileTooLarge {
            size,
            limit: max_file_size,
        });
    }
    Ok(size)
}

/// 去掉整行空白的数据行
fn keep_row(row: &[CellValue]) -> bool {
    !row.iter().all(CellValue::is_blank)
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 整个文件视为一个工作表，表名 = 文件名（不含扩展名）
pub struct CsvParser;

impl WorkbookReader for CsvParser {
    fn read_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        let sheet_name = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Sheet1".to_string());

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_path(file_path)?;

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(first) => first?.iter().map(|h| h.trim().to_string()).collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for result in records {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|value| {
                    if value.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(value.to_string())
                    }
                })
                .collect();
            if keep_row(&row) {
                rows.push(row);
            }
        }

        debug!(sheet = %sheet_name, rows = rows.len(), "CSV 解析完成");
        let grid = SheetGrid {
            name: sheet_name.clone(),
            headers,
            rows,
        };
        Ok(Workbook {
            sheet_names: vec![sheet_name.clone()],
            sheets: HashMap::from([(sheet_name, grid)]),
            sheet_errors: HashMap::new(),
            file_size: std::fs::metadata(file_path)?.len(),
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn grid_from_range(name: &str, range: &Range<Data>) -> SheetGrid {
        let mut rows_iter = range.rows();
        let headers: Vec<String> = rows_iter
            .next()
            .map(|header_row| {
                header_row
                    .iter()
                    .map(|cell| cell_value(cell).to_display_string().trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let rows = rows_iter
            .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
            .filter(|row| keep_row(row))
            .collect();

        SheetGrid {
            name: name.to_string(),
            headers,
            rows,
        }
    }
}

impl WorkbookReader for ExcelParser {
    fn read_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();

        let mut sheets = HashMap::new();
        let mut sheet_errors = HashMap::new();
        for name in &sheet_names {
            match workbook.worksheet_range(name) {
                Ok(range) => {
                    let grid = Self::grid_from_range(name, &range);
                    debug!(sheet = %name, rows = grid.row_count(), cols = grid.column_count(), "工作表解析完成");
                    sheets.insert(name.clone(), grid);
                }
                Err(e) => {
                    warn!(sheet = %name, error = %e, "工作表读取失败");
                    sheet_errors.insert(name.clone(), e.to_string());
                }
            }
        }

        Ok(Workbook {
            sheet_names,
            sheets,
            sheet_errors,
            file_size: std::fs::metadata(file_path)?.len(),
        })
    }
}

/// calamine 单元格 → CellValue；错误单元格视为空
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_datetime(s) {
            Some(naive) => CellValue::DateTime(naive),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl WorkbookReader for UniversalFileParser {
    fn read_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        let ext = extension_of(file_path);
        match ext.as_str() {
            "csv" => CsvParser.read_workbook(file_path),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.read_workbook(file_path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file(&["Registration, Make ,Year", "ABC-123,Toyota,2020", "DEF-456,Honda,2019"]);

        let workbook = CsvParser.read_workbook(file.path()).unwrap();
        assert_eq!(workbook.sheet_names.len(), 1);

        let grid = &workbook.sheets[&workbook.sheet_names[0]];
        assert_eq!(grid.headers, vec!["Registration", "Make", "Year"]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.rows[0][0], CellValue::Text("ABC-123".to_string()));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let file = csv_file(&["Name,Phone", "Ali,555", ",", "Bilal,777"]);

        let workbook = UniversalFileParser.read_workbook(file.path()).unwrap();
        let grid = &workbook.sheets[&workbook.sheet_names[0]];
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn test_validate_input_rejects_missing_and_unsupported() {
        assert!(matches!(
            validate_input(Path::new("non_existent.xlsx"), 1024),
            Err(ImportError::FileNotFound(_))
        ));

        let txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            validate_input(txt.path(), 1024),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn test_validate_input_rejects_oversized() {
        let file = csv_file(&["Name", "Ali"]);
        assert!(matches!(
            validate_input(file.path(), 3),
            Err(ImportError::FileTooLarge { limit: 3, .. })
        ));
        assert!(validate_input(file.path(), 1024).is_ok());
    }

    #[test]
    fn test_cell_value_mapping() {
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_value(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Empty
        );
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-01-15T08:00:00".to_string())).to_display_string(),
            "2024-01-15T08:00:00"
        );
    }
}

// ==========================================
// 车队台账导入导出系统 - 表格导入器实现
// ==========================================
// 职责: 整合导入流程，从表格文件到分表存储
// 流程: 校验/解析 → (可选) 清空全部表 → 逐表: 识别 → 映射 → 必填校验 → 批量落库
// 容错: 工作表之间互不影响；行级问题计数后丢弃；无跨表原子性
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{
    EntityType, ImportOutcome, ImportRequest, SheetAnalysis, SheetImportSummary, Workbook,
    WorkbookAnalysis, UNKNOWN_ENTITY,
};
use crate::i18n::t_with_args;
use crate::importer::dq_validator::RequiredFieldValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::PatternFieldMapper;
use crate::importer::file_parser::{validate_input, UniversalFileParser};
use crate::importer::schema_detector::SchemaDetector;
use crate::importer::sheet_importer_trait::{
    DqValidator, EntityDetector, FieldMapper, SpreadsheetImporter, WorkbookReader,
};
use crate::importer::suggestion::suggestion_for_error;
use crate::repository::RecordRepository;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// 摘要中保留的 id 样本数
pub const INSERTED_ID_SAMPLE: usize = 5;

// ==========================================
// SheetImporterImpl - 表格导入器实现
// ==========================================
pub struct SheetImporterImpl<R, C>
where
    R: RecordRepository,
    C: ImportConfigReader,
{
    // 数据访问层（与导出器共享同一存储实例）
    repo: Arc<R>,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Arc<dyn WorkbookReader>,
    entity_detector: Box<dyn EntityDetector>,
    field_mapper: Box<dyn FieldMapper>,
    dq_validator: Box<dyn DqValidator>,
}

impl<R, C> SheetImporterImpl<R, C>
where
    R: RecordRepository,
    C: ImportConfigReader,
{
    /// 创建新的导入器实例
    ///
    /// # 参数
    /// - repo: 记录仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - entity_detector: 实体识别器
    /// - field_mapper: 字段映射器
    /// - dq_validator: 必填校验器
    pub fn new(
        repo: Arc<R>,
        config: C,
        file_parser: Arc<dyn WorkbookReader>,
        entity_detector: Box<dyn EntityDetector>,
        field_mapper: Box<dyn FieldMapper>,
        dq_validator: Box<dyn DqValidator>,
    ) -> Self {
        Self {
            repo,
            config,
            file_parser,
            entity_detector,
            field_mapper,
            dq_validator,
        }
    }

    /// 使用默认组件创建（识别阈值取自配置）
    pub fn with_defaults(repo: Arc<R>, config: C) -> Self {
        let detector = SchemaDetector::new(config.detection_threshold());
        Self::new(
            repo,
            config,
            Arc::new(UniversalFileParser),
            Box::new(detector),
            Box::new(PatternFieldMapper::new()),
            Box::new(RequiredFieldValidator),
        )
    }

    /// 校验并解析文件（阻塞 IO 放到 blocking 线程池）
    async fn load_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        let parser = Arc::clone(&self.file_parser);
        let max_file_size = self.config.max_file_size();
        let path = file_path.to_path_buf();

        tokio::task::spawn_blocking(move || -> ImportResult<Workbook> {
            validate_input(&path, max_file_size)?;
            parser.read_workbook(&path)
        })
        .await
        .map_err(|e| ImportError::InternalError(format!("解析任务异常终止: {}", e)))?
    }

    /// 解析工作表的目标实体
    ///
    /// # 返回
    /// - Ok(None): 跳过该工作表（显式 unknown 或识别失败）
    /// - Err: 覆写值无效 / 工作表网格不可读
    fn resolve_entity(
        &self,
        workbook: &Workbook,
        sheet_name: &str,
        request: &ImportRequest,
    ) -> ImportResult<Option<EntityType>> {
        let overridden = match request.entity_overrides.get(sheet_name).map(String::as_str) {
            Some(UNKNOWN_ENTITY) => return Ok(None),
            Some(name) => Some(name.parse::<EntityType>().map_err(|_| {
                ImportError::UnknownEntityOverride {
                    sheet: sheet_name.to_string(),
                    entity: name.to_string(),
                }
            })?),
            None => None,
        };

        let grid = workbook
            .sheets
            .get(sheet_name)
            .ok_or_else(|| ImportError::SheetReadError {
                sheet: sheet_name.to_string(),
                message: workbook
                    .sheet_errors
                    .get(sheet_name)
                    .cloned()
                    .unwrap_or_default(),
            })?;

        Ok(overridden.or_else(|| self.entity_detector.detect(&grid.name, &grid.headers)))
    }

    /// 导入单个工作表
    ///
    /// # 返回
    /// - Ok(None): 工作表被跳过
    /// - Ok(Some(summary)): 已处理（record_count 可能为 0）
    #[instrument(skip(self, workbook, request))]
    async fn import_sheet(
        &self,
        workbook: &Workbook,
        sheet_name: &str,
        request: &ImportRequest,
    ) -> ImportResult<Option<SheetImportSummary>> {
        if !workbook.contains(sheet_name) {
            warn!("工作表不存在，跳过");
            return Ok(None);
        }

        let Some(entity) = self.resolve_entity(workbook, sheet_name, request)? else {
            debug!("未识别实体，跳过");
            return Ok(None);
        };
        let Some(grid) = workbook.sheets.get(sheet_name) else {
            return Ok(None);
        };

        // === 映射 + 必填校验 ===
        let mut valid = Vec::with_capacity(grid.row_count());
        let mut skipped_rows = 0;
        for (idx, row) in grid.rows.iter().enumerate() {
            let candidate = self.field_mapper.map_row(entity, &grid.headers, row);
            if self.dq_validator.passes(entity, &candidate) {
                valid.push(candidate);
            } else {
                skipped_rows += 1;
                debug!(
                    row = idx + 1,
                    missing = ?self.dq_validator.missing_fields(entity, &candidate),
                    "必填字段缺失，丢弃该行"
                );
            }
        }

        // === 批量落库 ===
        let inserted_ids = if valid.is_empty() {
            Vec::new()
        } else {
            self.repo.insert_many(entity.as_str(), valid).await?
        };

        info!(
            entity = %entity,
            total_rows = grid.row_count(),
            imported = inserted_ids.len(),
            skipped = skipped_rows,
            "工作表导入完成"
        );

        Ok(Some(SheetImportSummary {
            entity_type: entity,
            record_count: inserted_ids.len(),
            inserted_ids: inserted_ids.into_iter().take(INSERTED_ID_SAMPLE).collect(),
            total_rows: grid.row_count(),
            skipped_rows,
        }))
    }
}

#[async_trait]
impl<R, C> SpreadsheetImporter for SheetImporterImpl<R, C>
where
    R: RecordRepository,
    C: ImportConfigReader,
{
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    async fn analyze(&self, file_path: &Path) -> ImportResult<WorkbookAnalysis> {
        let workbook = self.load_workbook(file_path).await?;
        let preview_rows = self.config.preview_rows();

        let sheets_info: BTreeMap<String, SheetAnalysis> = workbook
            .sheet_names
            .iter()
            .map(|name| {
                let analysis = match workbook.sheets.get(name) {
                    Some(grid) => self.entity_detector.analyze_sheet(grid, preview_rows),
                    None => SheetAnalysis::unreadable(
                        workbook.sheet_errors.get(name).cloned().unwrap_or_default(),
                    ),
                };
                (name.clone(), analysis)
            })
            .collect();

        info!(sheets = workbook.sheet_names.len(), "表格分析完成");
        Ok(WorkbookAnalysis {
            total_sheets: workbook.sheet_names.len(),
            sheets: workbook.sheet_names,
            sheets_info,
            file_size: workbook.file_size,
        })
    }

    #[instrument(skip(self, file_path, request), fields(file = %file_path.display()))]
    async fn import(&self, file_path: &Path, request: &ImportRequest) -> ImportOutcome {
        let start_time = Instant::now();

        // === 步骤 0: 参数校验（无副作用）===
        if request.selected_sheets.is_empty() {
            warn!("未选择任何工作表");
            return ImportOutcome::setup_failure(
                crate::i18n::t("import.no_sheets_selected"),
                vec![ImportError::NoSheetsSelected.to_string()],
                None,
            );
        }

        // === 步骤 1: 解析文件 ===
        let workbook = match self.load_workbook(file_path).await {
            Ok(workbook) => workbook,
            Err(e) => {
                error!(error = %e, "文件解析失败");
                let error_text = e.to_string();
                return ImportOutcome::setup_failure(
                    t_with_args("import.failed", &[("error", &error_text)]),
                    vec![error_text],
                    Some(suggestion_for_error(&e)),
                );
            }
        };

        // === 步骤 2: 可选清空（先于任何新行写入）===
        if request.clear_existing {
            if let Err(e) = self.repo.clear_all().await {
                error!(error = %e, "清空现有数据失败");
                let error_text = e.to_string();
                return ImportOutcome::setup_failure(
                    t_with_args("import.clear_failed", &[("error", &error_text)]),
                    vec![error_text],
                    None,
                );
            }
            info!("已清空全部数据表");
        }

        // === 步骤 3: 逐表导入 ===
        let mut outcome = ImportOutcome {
            success: true,
            ..Default::default()
        };
        for sheet_name in &request.selected_sheets {
            match self.import_sheet(&workbook, sheet_name, request).await {
                Ok(Some(summary)) => {
                    outcome.total_imported += summary.record_count;
                    outcome.summary.insert(sheet_name.clone(), summary);
                }
                Ok(None) => {}
                Err(e) => {
                    error!(sheet = %sheet_name, error = %e, "工作表导入失败");
                    outcome.errors.push(t_with_args(
                        "import.sheet_error",
                        &[("sheet", sheet_name), ("error", &e.to_string())],
                    ));
                }
            }
        }

        outcome.message = t_with_args(
            "import.completed",
            &[("count", &outcome.total_imported.to_string())],
        );
        info!(
            total_imported = outcome.total_imported,
            sheets = outcome.summary.len(),
            errors = outcome.errors.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "导入完成"
        );
        outcome
    }
}

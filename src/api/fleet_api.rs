// ==========================================
// 车队台账导入导出系统 - 业务 API 门面
// ==========================================
// 职责: 装配存储/导入器/导出器，向外提供 分析 / 导入 / 导出 / 统计 / 清空
// 生命周期: open（初始化存储）→ 调用 → close（等待进行中的写入）
// ==========================================

use crate::api::error::ApiResult;
use crate::config::AppConfig;
use crate::domain::{ExportOutcome, ImportOutcome, ImportRequest, StoreStats, WorkbookAnalysis};
use crate::exporter::WorkbookExporter;
use crate::i18n;
use crate::importer::{suggestion_for_error, SheetImporterImpl, SpreadsheetImporter};
use crate::repository::{JsonTableStore, RecordRepository};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 分析API响应
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    /// 成功时展开为 sheets / sheets_info / total_sheets / file_size
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<WorkbookAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// 车队台账 API
pub struct FleetApi {
    config: AppConfig,
    store: Arc<JsonTableStore>,
    importer: SheetImporterImpl<JsonTableStore, AppConfig>,
    exporter: WorkbookExporter<JsonTableStore>,
}

impl FleetApi {
    /// 打开存储并装配组件
    ///
    /// # 参数
    /// - config: 应用配置（存储目录/阈值/语言等）
    pub async fn open(config: AppConfig) -> ApiResult<Self> {
        if !i18n::set_locale(&config.locale) {
            warn!(locale = %config.locale, "不支持的语言，保持当前语言");
        }

        let store = Arc::new(JsonTableStore::new(&config.data_dir));
        store.initialize().await?;

        let importer = SheetImporterImpl::with_defaults(Arc::clone(&store), config.clone());
        let exporter = WorkbookExporter::new(Arc::clone(&store));

        info!(data_dir = %config.data_dir.display(), "API 初始化完成");
        Ok(Self {
            config,
            store,
            importer,
            exporter,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 底层存储（供直接 CRUD 使用）
    pub fn store(&self) -> &Arc<JsonTableStore> {
        &self.store
    }

    /// 只读分析表格文件
    pub async fn analyze(&self, file_path: &Path) -> AnalyzeResponse {
        match self.importer.analyze(file_path).await {
            Ok(analysis) => AnalyzeResponse {
                success: true,
                analysis: Some(analysis),
                error: None,
                suggestion: None,
            },
            Err(e) => AnalyzeResponse {
                success: false,
                analysis: None,
                error: Some(i18n::t_with_args(
                    "analyze.failed",
                    &[("error", &e.to_string())],
                )),
                suggestion: Some(suggestion_for_error(&e)),
            },
        }
    }

    /// 导入选中的工作表
    pub async fn import(&self, file_path: &Path, request: &ImportRequest) -> ImportOutcome {
        self.importer.import(file_path, request).await
    }

    /// 导出到 xlsx（tables 为 None 时导出全部十张表）
    pub async fn export(&self, output_path: &Path, tables: Option<&[String]>) -> ExportOutcome {
        self.exporter.export(output_path, tables).await
    }

    pub async fn stats(&self) -> ApiResult<StoreStats> {
        Ok(self.store.stats().await?)
    }

    /// 清空单张表
    pub async fn clear_table(&self, table: &str) -> ApiResult<bool> {
        let cleared = self.store.clear_table(table).await?;
        info!("{}", i18n::t_with_args("store.cleared", &[("table", table)]));
        Ok(cleared)
    }

    /// 清空全部十张表
    pub async fn clear_all(&self) -> ApiResult<()> {
        self.store.clear_all().await?;
        info!("{}", i18n::t("store.cleared_all"));
        Ok(())
    }

    /// 关闭: 等待进行中的写入完成
    pub async fn close(&self) {
        self.store.close().await;
    }
}

// ==========================================
// 车队台账导入导出系统 - 配置层
// ==========================================
// 职责: 应用配置加载（环境变量 + 默认值）
// ==========================================

pub mod app_config;
pub mod import_config_trait;

// 重导出核心配置
pub use app_config::{config_keys, AppConfig};
pub use import_config_trait::ImportConfigReader;

// ==========================================
// 车队台账导入导出系统 - 应用配置
// ==========================================
// 来源: 环境变量（缺失或无法解析时取默认值）
// 红线: 配置只读，加载后不再变化
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::importer::schema_detector::DEFAULT_DETECTION_THRESHOLD;
use crate::logging::LogFormat;
use std::path::PathBuf;
use tracing::warn;

// ==========================================
// 配置键（环境变量名）
// ==========================================
pub mod config_keys {
    pub const DATA_DIR: &str = "FLEET_DATA_DIR";
    pub const MAX_UPLOAD_MB: &str = "FLEET_MAX_UPLOAD_MB";
    pub const DETECTION_THRESHOLD: &str = "FLEET_DETECTION_THRESHOLD";
    pub const PREVIEW_ROWS: &str = "FLEET_PREVIEW_ROWS";
    pub const LOCALE: &str = "FLEET_LOCALE";
    pub const LOG_FORMAT: &str = "FLEET_LOG_FORMAT";
}

/// 默认存储目录名
pub const DATA_DIR_NAME: &str = "fleetManagementSystem";

pub const DEFAULT_MAX_UPLOAD_MB: u64 = 50;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_LOCALE: &str = "zh-CN";

// ==========================================
// AppConfig
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub max_upload_mb: u64,
    pub detection_threshold: f64,
    pub preview_rows: usize,
    pub locale: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            locale: DEFAULT_LOCALE.to_string(),
            log_format: LogFormat::Plain,
        }
    }
}

impl AppConfig {
    /// 从进程环境变量加载
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（测试使用）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = get(config_keys::DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let max_upload_mb = parse_or(
            get(config_keys::MAX_UPLOAD_MB),
            config_keys::MAX_UPLOAD_MB,
            defaults.max_upload_mb,
        );

        let detection_threshold = parse_or(
            get(config_keys::DETECTION_THRESHOLD),
            config_keys::DETECTION_THRESHOLD,
            defaults.detection_threshold,
        );
        let detection_threshold = if (0.0..=1.0).contains(&detection_threshold) {
            detection_threshold
        } else {
            warn!(value = detection_threshold, "识别阈值超出 [0, 1]，使用默认值");
            defaults.detection_threshold
        };

        let preview_rows = parse_or(
            get(config_keys::PREVIEW_ROWS),
            config_keys::PREVIEW_ROWS,
            defaults.preview_rows,
        );

        let locale = match get(config_keys::LOCALE) {
            Some(locale) if crate::i18n::SUPPORTED_LOCALES.contains(&locale.as_str()) => locale,
            Some(locale) => {
                warn!(locale = %locale, "不支持的语言，使用默认语言");
                defaults.locale
            }
            None => defaults.locale,
        };

        let log_format = get(config_keys::LOG_FORMAT)
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or(defaults.log_format);

        Self {
            data_dir,
            max_upload_mb,
            detection_threshold,
            preview_rows,
            locale,
            log_format,
        }
    }

    /// 指定存储目录，其余取默认值
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

impl ImportConfigReader for AppConfig {
    fn detection_threshold(&self) -> f64 {
        self.detection_threshold
    }

    fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    fn max_file_size(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn parse_or<T: std::str::FromStr + Copy>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(key = %key, value = %value, "配置值无法解析，使用默认值");
            default
        }),
        None => default,
    }
}

/// 默认存储目录: <文档目录>/fleetManagementSystem
fn default_data_dir() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.max_upload_mb, 50);
        assert_eq!(config.detection_threshold, 0.3);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.locale, "zh-CN");
        assert_eq!(config.log_format, LogFormat::Plain);
        assert!(config.data_dir.ends_with(DATA_DIR_NAME));
        assert_eq!(config.max_file_size(), 50 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (config_keys::DATA_DIR, "/tmp/fleet"),
            (config_keys::MAX_UPLOAD_MB, "10"),
            (config_keys::DETECTION_THRESHOLD, "0.5"),
            (config_keys::PREVIEW_ROWS, "3"),
            (config_keys::LOCALE, "en"),
            (config_keys::LOG_FORMAT, "json"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/fleet"));
        assert_eq!(config.max_upload_mb, 10);
        assert_eq!(config.detection_threshold, 0.5);
        assert_eq!(config.preview_rows, 3);
        assert_eq!(config.locale, "en");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            (config_keys::MAX_UPLOAD_MB, "lots"),
            (config_keys::DETECTION_THRESHOLD, "1.5"),
            (config_keys::LOCALE, "fr"),
            (config_keys::LOG_FORMAT, "xml"),
        ]);
        assert_eq!(config.max_upload_mb, 50);
        assert_eq!(config.detection_threshold, 0.3);
        assert_eq!(config.locale, "zh-CN");
        assert_eq!(config.log_format, LogFormat::Plain);
    }
}

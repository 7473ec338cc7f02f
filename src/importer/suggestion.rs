// ==========================================
// 车队台账导入导出系统 - 失败处理建议
// ==========================================
// 职责: 按失败原因给出可读建议（文本经 i18n 翻译）
// 规则: 已知错误变体直接对应；其余按错误文本小写后的关键字查表
// ==========================================

use crate::i18n::t;
use crate::importer::error::ImportError;

// 关键字 → 建议键（按顺序匹配，先命中者胜出）
const KEYWORD_SUGGESTIONS: &[(&[&str], &str)] = &[
    (&["permission"], "suggestion.permission"),
    (&["corrupted", "invalid"], "suggestion.corrupted"),
    (&["sheet"], "suggestion.sheet"),
    (&["encoding"], "suggestion.encoding"),
    (&["memory"], "suggestion.memory"),
];

/// 按错误文本查找建议
pub fn suggestion_for(error_text: &str) -> String {
    let lowered = error_text.to_lowercase();
    let key = KEYWORD_SUGGESTIONS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, key)| *key)
        .unwrap_or("suggestion.default");
    t(key)
}

/// 按导入错误查找建议
pub fn suggestion_for_error(err: &ImportError) -> String {
    match err {
        ImportError::FileNotFound(_) => t("suggestion.file_not_found"),
        ImportError::UnsupportedFormat(_) => t("suggestion.corrupted"),
        ImportError::FileTooLarge { .. } => t("suggestion.memory"),
        other => suggestion_for(&other.to_string()),
    }
}

/// 导出失败的固定建议
pub fn export_suggestion() -> String {
    t("suggestion.export_permission")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{set_locale, LOCALE_TEST_LOCK};

    #[test]
    fn test_keyword_lookup() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("en");

        assert!(suggestion_for("Permission denied (os error 13)").contains("close Excel"));
        assert!(suggestion_for("Invalid zip header").contains("corrupted"));
        assert!(suggestion_for("Sheet 'X' not found").contains("expected sheets"));
        assert!(suggestion_for("bad encoding").contains("new Excel"));
        assert!(suggestion_for("out of memory").contains("smaller files"));
        assert!(suggestion_for("something else").contains("valid Excel"));

        set_locale("zh-CN");
    }

    #[test]
    fn test_variant_lookup() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("en");

        let not_found = ImportError::FileNotFound("/tmp/x.xlsx".to_string());
        assert!(suggestion_for_error(&not_found).contains("file path"));

        let too_large = ImportError::FileTooLarge { size: 10, limit: 1 };
        assert!(suggestion_for_error(&too_large).contains("smaller files"));

        set_locale("zh-CN");
    }
}

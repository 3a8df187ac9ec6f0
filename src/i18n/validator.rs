//! Translation quality validation module.
//!
//! Remote translations of UI strings must keep interpolation placeholders,
//! links and numbers intact, otherwise the rendered page breaks or shows
//! wrong figures. Validation never rejects a translation; the resolver logs
//! what it finds.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing warnings about a translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean
    pub fn is_clean(&self) -> bool {
        !self.has_warnings()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern}: {e}"))
    })
}

impl TranslationValidator {
    /// Validate that a translation preserves important elements from the original.
    ///
    /// Checks `{placeholder}` tokens, URLs and ASCII digit runs. Order is not
    /// compared for placeholders since target grammar may move them.
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let mut orig_placeholders = Self::extract_placeholders(original);
        let mut trans_placeholders = Self::extract_placeholders(translated);
        orig_placeholders.sort();
        trans_placeholders.sort();
        if orig_placeholders != trans_placeholders {
            report.warnings.push(format!(
                "Placeholder mismatch: original has {:?}, translation has {:?}",
                orig_placeholders, trans_placeholders
            ));
        }

        let orig_urls = Self::extract_urls(original);
        let trans_urls = Self::extract_urls(translated);
        if orig_urls != trans_urls {
            report.warnings.push(format!(
                "URL mismatch: original has {} URLs, translation has {} URLs",
                orig_urls.len(),
                trans_urls.len()
            ));
        }

        let orig_numbers = Self::extract_numbers(original);
        let trans_numbers = Self::extract_numbers(translated);
        if !orig_numbers.is_empty() && orig_numbers != trans_numbers {
            report.warnings.push(format!(
                "Number mismatch: original has {:?}, translation has {:?}",
                orig_numbers, trans_numbers
            ));
        }

        report
    }

    /// Extract all `{name}` interpolation placeholders from text
    fn extract_placeholders(text: &str) -> Vec<String> {
        compiled(&PLACEHOLDER_REGEX, r"\{[a-zA-Z0-9_]+\}")
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Extract all URLs from text
    fn extract_urls(text: &str) -> Vec<String> {
        compiled(&URL_REGEX, r"https?://[^\s)\]]+")
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Extract ASCII digit runs (e.g. "85" in "85% attendance")
    fn extract_numbers(text: &str) -> Vec<String> {
        compiled(&NUMBER_REGEX, r"[0-9]+")
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Extraction Tests ====================

    #[test]
    fn test_extract_placeholders() {
        let text = "Hello {name}, you have {count} new assignments";
        assert_eq!(
            TranslationValidator::extract_placeholders(text),
            vec!["{name}", "{count}"]
        );
    }

    #[test]
    fn test_extract_placeholders_none() {
        assert!(TranslationValidator::extract_placeholders("No placeholders").is_empty());
    }

    #[test]
    fn test_extract_urls_multiple() {
        let text = "Check https://example.com and http://test.org";
        assert_eq!(
            TranslationValidator::extract_urls(text),
            vec!["https://example.com", "http://test.org"]
        );
    }

    #[test]
    fn test_extract_numbers() {
        let text = "Scored 92 out of 100";
        assert_eq!(TranslationValidator::extract_numbers(text), vec!["92", "100"]);
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_clean_translation() {
        let original = "Hello {name}, see https://example.com";
        let translated = "नमस्ते {name}, देखें https://example.com";
        assert!(TranslationValidator::validate(original, translated).is_clean());
    }

    #[test]
    fn test_validate_reordered_placeholders_are_fine() {
        let original = "{count} assignments for {name}";
        let translated = "{name} के लिए {count} असाइनमेंट";
        assert!(TranslationValidator::validate(original, translated).is_clean());
    }

    #[test]
    fn test_validate_missing_placeholder() {
        let report = TranslationValidator::validate("Hello {name}", "नमस्ते");
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("Placeholder mismatch"));
    }

    #[test]
    fn test_validate_missing_url() {
        let report = TranslationValidator::validate("Read https://example.com", "पढ़ें");
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("URL mismatch"));
    }

    #[test]
    fn test_validate_localized_digits_are_flagged() {
        let report = TranslationValidator::validate("85% attendance", "८५% उपस्थिति");
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("Number mismatch"));
    }

    #[test]
    fn test_validation_report_default_is_clean() {
        let report = ValidationReport::default();
        assert!(report.is_clean());
        assert!(!report.has_warnings());
    }
}

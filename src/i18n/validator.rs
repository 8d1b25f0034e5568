//! Phrase table quality validation.
//!
//! Every phrase is checked once its collection is compiled. Errors abort the
//! build (the renderer cannot emit a non-text translation); warnings are
//! logged and counted.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::compile::object::Attributes;
use crate::i18n::{Language, LanguageRegistry};

/// Validation report containing errors and warnings about a phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make the phrase unusable
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for phrase table entries.
pub struct PhraseValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl PhraseValidator {
    /// Validate one phrase's raw attributes (language code to text).
    ///
    /// Errors:
    /// - a registered language's text that is neither a string nor null
    /// - no text in the canonical language
    ///
    /// Warnings:
    /// - a key that is not a registered language code
    /// - blank canonical text
    /// - an enabled language with no translation
    /// - `{placeholders}` that differ between a translation and the canonical text
    pub fn validate(phrase: &Attributes, canonical: Language) -> ValidationReport {
        let mut report = ValidationReport::new();
        let registry = LanguageRegistry::get();

        for (code, text) in phrase {
            if registry.get_by_code(code).is_none() {
                report
                    .warnings
                    .push(format!("Unknown language code: '{}'", code));
            } else if !matches!(text, Value::String(_) | Value::Null) {
                report
                    .errors
                    .push(format!("Text for '{}' must be a string, found {}", code, text));
            }
        }

        let canonical_text = match phrase.get(canonical.code()).and_then(Value::as_str) {
            Some(text) => text,
            None => {
                report.errors.push(format!(
                    "Missing {} text (default language '{}')",
                    canonical.name(),
                    canonical.code()
                ));
                return report;
            }
        };
        if canonical_text.trim().is_empty() {
            report
                .warnings
                .push(format!("Blank {} text", canonical.name()));
        }

        let canonical_placeholders = Self::extract_placeholders(canonical_text);
        for lang in Language::all_enabled() {
            if lang == canonical {
                continue;
            }
            match phrase.get(lang.code()).and_then(Value::as_str) {
                None => report
                    .warnings
                    .push(format!("Missing translation for {} ('{}')", lang.name(), lang.code())),
                Some(text) => {
                    let placeholders = Self::extract_placeholders(text);
                    if placeholders != canonical_placeholders {
                        report.warnings.push(format!(
                            "Placeholder mismatch for '{}': {} has {:?}, translation has {:?}",
                            lang.code(),
                            canonical.name(),
                            canonical_placeholders,
                            placeholders
                        ));
                    }
                }
            }
        }

        report
    }

    /// Extract all `{placeholder}` fields from text, sorted
    fn extract_placeholders(text: &str) -> Vec<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"\{([A-Za-z0-9_]*)\}").expect("placeholder pattern is a valid regex")
        });

        let mut found: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        found.sort();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn phrase(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn complete() -> Value {
        json!({"en": "Mayor", "es": "Alcalde", "tl": "Alkalde", "zh": "市長"})
    }

    // ==================== Placeholder Extraction Tests ====================

    #[test]
    fn test_extract_placeholders_sorted() {
        let found = PhraseValidator::extract_placeholders("{b} then {a} then {b}");
        assert_eq!(found, vec!["{a}", "{b}", "{b}"]);
    }

    #[test]
    fn test_extract_placeholders_none() {
        assert!(PhraseValidator::extract_placeholders("No fields here").is_empty());
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_complete_phrase() {
        let report = PhraseValidator::validate(&phrase(complete()), Language::ENGLISH);
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_validate_missing_translation() {
        let report = PhraseValidator::validate(
            &phrase(json!({"en": "Mayor", "es": "Alcalde", "zh": "市長"})),
            Language::ENGLISH,
        );
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Filipino"));
    }

    #[test]
    fn test_validate_missing_canonical_text() {
        let report =
            PhraseValidator::validate(&phrase(json!({"es": "Alcalde"})), Language::ENGLISH);
        assert!(report.has_errors());
        assert!(report.errors[0].contains("English"));
    }

    #[test]
    fn test_validate_non_string_text() {
        let mut value = complete();
        value["es"] = json!(["Alcalde"]);
        let report = PhraseValidator::validate(&phrase(value), Language::ENGLISH);
        assert!(report.has_errors());
        assert!(report.errors[0].contains("'es'"));
    }

    #[test]
    fn test_validate_blank_canonical_text() {
        let mut value = complete();
        value["en"] = json!("  ");
        let report = PhraseValidator::validate(&phrase(value), Language::ENGLISH);
        assert!(!report.has_errors());
        assert!(report.warnings.iter().any(|w| w.contains("Blank")));
    }

    #[test]
    fn test_validate_placeholder_mismatch() {
        let report = PhraseValidator::validate(
            &phrase(json!({
                "en": "District {district_code}",
                "es": "Distrito {district_code}",
                "tl": "Distrito",
                "zh": "{district_code} 區",
            })),
            Language::ENGLISH,
        );
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Placeholder mismatch for 'tl'"));
    }

    #[test]
    fn test_validate_unknown_language_code() {
        let mut value = complete();
        value["fr"] = json!(["Maire"]);
        let report = PhraseValidator::validate(&phrase(value), Language::ENGLISH);
        assert!(!report.has_errors());
        assert_eq!(report.warnings, vec!["Unknown language code: 'fr'".to_string()]);
    }

    #[test]
    fn test_validate_against_other_default_language() {
        let spanish = Language::from_code("es").unwrap();
        let report = PhraseValidator::validate(
            &phrase(json!({"en": "Mayor", "es": "Alcalde", "tl": "Alkalde"})),
            spanish,
        );
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Chinese"));
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_validation_report_with_error() {
        let mut report = ValidationReport::new();
        report.errors.push("Test error".to_string());

        assert!(!report.is_clean());
        assert!(report.has_errors());
        assert!(!report.has_warnings());
    }
}

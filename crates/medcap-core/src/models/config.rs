//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{MedcapError, Result};

/// Main configuration for the medcap pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedcapConfig {
    /// Page classification configuration.
    pub classifier: ClassifierConfig,

    /// Identity extraction configuration.
    pub identity: IdentityConfig,

    /// CSV/JSON export configuration.
    pub export: ExportConfig,
}

/// Keywords and markers used to recognise medical portal pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Substrings that mark a page title or URL as medical.
    pub domain_keywords: Vec<String>,

    /// Renderings of the MediCloud system name. The first one is also
    /// matched against the logo element.
    pub system_names: Vec<String>,

    /// Function tab labels that only appear on MediCloud pages.
    pub function_tabs: Vec<String>,

    /// Selector for the site logo link.
    pub logo_selector: String,

    /// Selector for function tab links.
    pub tab_selector: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            domain_keywords: strings(&[
                "醫療", "健保", "medicloud", "病歷", "藥品", "診所", "醫院", "門診",
            ]),
            system_names: strings(&["健保醫療資訊雲端查詢系統", "NHI MediCloud System"]),
            function_tabs: strings(&["西醫用藥", "中醫醫療", "牙科處置紀錄", "過敏紀錄", "檢查與檢驗"]),
            logo_selector: ".logo a".to_string(),
            tab_selector: ".function-tab a".to_string(),
        }
    }
}

/// Where the patient header fields live on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Selector for the ID number element.
    pub id_number_selector: String,

    /// Selector for the name element.
    pub name_selector: String,

    /// Selector for the birth date element.
    pub birth_selector: String,

    /// Selector for the gender element.
    pub gender_selector: String,

    /// Scan the whole page text when the selectors find nothing.
    pub text_fallback: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            id_number_selector: ".idno".to_string(),
            name_selector: ".name".to_string(),
            birth_selector: ".birth".to_string(),
            gender_selector: ".sex".to_string(),
            text_fallback: true,
        }
    }
}

/// Export encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Replacement for line breaks inside CSV values.
    pub line_separator: String,

    /// Folder name used when no patient name was extracted.
    pub default_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            line_separator: " | ".to_string(),
            default_name: "醫療資料".to_string(),
        }
    }
}

impl MedcapConfig {
    /// Parse configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.classifier.domain_keywords.iter().any(|k| k.is_empty()) {
            return Err(MedcapError::Config(
                "classifier.domain_keywords must not contain empty strings".to_string(),
            ));
        }
        if self.classifier.system_names.is_empty() {
            return Err(MedcapError::Config(
                "classifier.system_names must name at least one system".to_string(),
            ));
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MedcapConfig::from_json(r#"{"export": {"line_separator": " / "}}"#).unwrap();
        assert_eq!(config.export.line_separator, " / ");
        assert_eq!(config.export.default_name, "醫療資料");
        assert_eq!(config.identity.id_number_selector, ".idno");
        assert_eq!(config.classifier.domain_keywords.len(), 8);
    }

    #[test]
    fn test_rejects_empty_keyword() {
        let err = MedcapConfig::from_json(r#"{"classifier": {"domain_keywords": [""]}}"#).unwrap_err();
        assert!(matches!(err, MedcapError::Config(_)));
    }

    #[test]
    fn test_round_trips_through_json() {
        let json = MedcapConfig::default().to_json_pretty().unwrap();
        let back = MedcapConfig::from_json(&json).unwrap();
        assert_eq!(back.classifier.system_names, MedcapConfig::default().classifier.system_names);
    }
}

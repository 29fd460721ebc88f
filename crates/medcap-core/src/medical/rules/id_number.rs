//! National ID number extraction.

use super::patterns::{ID_LABEL_PREFIX, ID_NUMBER, LABELED_ID_NUMBER};
use super::{ExtractionMatch, FieldExtractor};

/// Clean the text of a dedicated ID element.
///
/// Uses the first well-formed ID inside the text if there is one, otherwise
/// the text with any leading `身分證號：` label removed.
pub fn normalize_id_number(text: &str) -> String {
    let text = text.trim();
    match ID_NUMBER.find(text) {
        Some(m) => m.as_str().to_string(),
        None => ID_LABEL_PREFIX.replace(text, "").into_owned(),
    }
}

/// Extractor for `身分證號：A12***789` labels in running text.
pub struct IdNumberExtractor;

impl IdNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IdNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IdNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        LABELED_ID_NUMBER
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                Some(
                    ExtractionMatch::new(caps[1].to_string(), full.as_str())
                        .with_position(full.start(), full.end()),
                )
            })
            .collect()
    }
}

//! Identity fields found by scanning the page text.

use tracing::debug;

use super::IdentityStrategy;
use crate::document::Document;
use crate::medical::rules::{EraDateExtractor, FieldExtractor, IdNumberExtractor};
use crate::models::IdentityFields;

/// Looks for a labeled ID number and an era-prefixed birth date anywhere
/// in the body text. Used when the page has no patient banner.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStrategy;

impl IdentityStrategy for TextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, doc: &Document) -> IdentityFields {
        let text = doc.body_text();
        let mut fields = IdentityFields::default();

        if let Some(found) = IdNumberExtractor::new().extract(&text) {
            debug!("ID number found in page text at {:?}", found.position);
            fields.id_number = Some(found.value);
        }

        if let Some(found) = EraDateExtractor::new().extract(&text) {
            debug!("Birth date found in page text at {:?}", found.position);
            fields.birth_date = Some(found.value.display);
            fields.birth_date_ad = Some(found.value.ad);
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scans_body_text() {
        let doc = Document::parse(
            "<body><p>病患資料 身分證號: C12***456 出生 民  80/7/4</p></body>",
        );
        let fields = TextStrategy.extract(&doc);
        assert_eq!(fields.id_number.as_deref(), Some("C12***456"));
        assert_eq!(fields.birth_date.as_deref(), Some("民 80/7/4"));
        assert_eq!(fields.birth_date_ad.as_deref(), Some("1991/07/04"));
        assert_eq!(fields.name, None);
    }

    #[test]
    fn test_nothing_found() {
        let doc = Document::parse("<body><p>A123456789 1991/07/04</p></body>");
        assert!(TextStrategy.extract(&doc).is_empty());
    }
}

//! Identity fields read from dedicated header elements.

use scraper::Selector;
use tracing::debug;

use super::{non_empty, IdentityStrategy};
use crate::document::{compile_selector, element_text, Document};
use crate::error::Result;
use crate::medical::rules::{normalize_id_number, EraDateExtractor, FieldExtractor};
use crate::models::{IdentityConfig, IdentityFields};

/// Reads the patient banner (`.idno`, `.name`, `.birth`, `.sex`).
#[derive(Debug)]
pub struct SelectorStrategy {
    id_number: Selector,
    name: Selector,
    birth: Selector,
    gender: Selector,
}

impl SelectorStrategy {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        Ok(Self {
            id_number: compile_selector("identity.id_number_selector", &config.id_number_selector)?,
            name: compile_selector("identity.name_selector", &config.name_selector)?,
            birth: compile_selector("identity.birth_selector", &config.birth_selector)?,
            gender: compile_selector("identity.gender_selector", &config.gender_selector)?,
        })
    }

    fn text_of(&self, doc: &Document, selector: &Selector) -> Option<String> {
        doc.select_first(selector)
            .map(|el| element_text(el).trim().to_string())
    }
}

impl IdentityStrategy for SelectorStrategy {
    fn name(&self) -> &'static str {
        "selector"
    }

    fn extract(&self, doc: &Document) -> IdentityFields {
        let mut fields = IdentityFields::default();

        if let Some(text) = self.text_of(doc, &self.id_number) {
            fields.id_number = non_empty(normalize_id_number(&text));
            debug!("ID element found: {:?}", fields.id_number);
        }

        fields.name = self.text_of(doc, &self.name).and_then(non_empty);

        if let Some(text) = self.text_of(doc, &self.birth) {
            fields.birth_date_ad = EraDateExtractor::new().extract(&text).map(|m| m.value.ad);
            fields.birth_date = non_empty(text);
        }

        fields.gender = self.text_of(doc, &self.gender).and_then(non_empty);
        fields
    }
}

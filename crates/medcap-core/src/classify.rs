//! Page classification.
//!
//! Every downstream stage reads the single [`Mode`] produced here instead of
//! re-checking page keywords on its own.

use std::fmt;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{compile_selector, element_text, Document};
use crate::error::Result;
use crate::models::ClassifierConfig;

/// Known medical portal families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// NHI MediCloud query system (健保醫療資訊雲端查詢系統).
    MediCloud,
    /// A medical page from an unrecognised system.
    Other,
}

/// How a page should be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Not a medical page.
    Generic,
    /// A medical page, possibly from a known system.
    Domain(Variant),
}

impl Mode {
    /// Whether extracted records go through the MediCloud post-processor.
    pub fn post_processes(&self) -> bool {
        matches!(self, Mode::Domain(Variant::MediCloud))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Generic => write!(f, "generic"),
            Mode::Domain(Variant::MediCloud) => write!(f, "medicloud"),
            Mode::Domain(Variant::Other) => write!(f, "medical"),
        }
    }
}

/// Decides the [`Mode`] of a page from its title, URL and DOM markers.
#[derive(Debug)]
pub struct Classifier {
    keywords: Vec<String>,
    system_names: Vec<String>,
    function_tabs: Vec<String>,
    logo: Selector,
    tabs: Selector,
}

impl Classifier {
    /// Build a classifier, compiling the configured selectors.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        Ok(Self {
            keywords: config.domain_keywords.iter().map(|k| k.to_lowercase()).collect(),
            system_names: config.system_names.clone(),
            function_tabs: config.function_tabs.clone(),
            logo: compile_selector("classifier.logo_selector", &config.logo_selector)?,
            tabs: compile_selector("classifier.tab_selector", &config.tab_selector)?,
        })
    }

    pub fn classify(&self, doc: &Document) -> Mode {
        let mode = if !self.is_domain_document(doc) {
            Mode::Generic
        } else if self.is_known_variant(doc) {
            Mode::Domain(Variant::MediCloud)
        } else {
            Mode::Domain(Variant::Other)
        };
        debug!("Classified page as {:?}", mode);
        mode
    }

    /// Title or URL contains a medical keyword, ignoring case.
    pub fn is_domain_document(&self, doc: &Document) -> bool {
        let title = doc.title().to_lowercase();
        let url = doc.url().unwrap_or_default().to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| title.contains(keyword.as_str()) || url.contains(keyword.as_str()))
    }

    /// Title, logo or function tabs identify the MediCloud system.
    pub fn is_known_variant(&self, doc: &Document) -> bool {
        let title = doc.title();
        if self.system_names.iter().any(|name| title.contains(name.as_str())) {
            return true;
        }

        if let (Some(logo), Some(name)) = (doc.select_first(&self.logo), self.system_names.first()) {
            if element_text(logo).contains(name.as_str()) {
                return true;
            }
        }

        let tab_texts: Vec<String> = doc.select_all(&self.tabs).into_iter().map(element_text).collect();
        self.function_tabs
            .iter()
            .any(|tab| tab_texts.iter().any(|text| text.contains(tab.as_str())))
    }
}

//! Patient identity extraction.
//!
//! Strategies run in order and the first one returning a non-empty field
//! set wins. Whichever wins, the result is stamped with the extraction
//! instant and the page source.

mod selector;
mod text;

pub use selector::SelectorStrategy;
pub use text::TextStrategy;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::document::Document;
use crate::error::Result;
use crate::models::{IdentityConfig, IdentityFields, IdentityInfo};

/// One way of finding identity fields on a page.
pub trait IdentityStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fields this strategy can find. Empty when it finds nothing.
    fn extract(&self, doc: &Document) -> IdentityFields;
}

/// Runs identity strategies in priority order.
pub struct IdentityExtractor {
    strategies: Vec<Box<dyn IdentityStrategy>>,
}

impl IdentityExtractor {
    /// Selector strategy first, then the page text scan if enabled.
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let mut strategies: Vec<Box<dyn IdentityStrategy>> =
            vec![Box::new(SelectorStrategy::new(config)?)];
        if config.text_fallback {
            strategies.push(Box::new(TextStrategy));
        }
        Ok(Self { strategies })
    }

    /// Use an explicit strategy list.
    pub fn with_strategies(strategies: Vec<Box<dyn IdentityStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract identity fields, stamped with the current instant.
    pub fn extract(&self, doc: &Document) -> Option<IdentityInfo> {
        self.extract_at(doc, Utc::now())
    }

    /// Extract identity fields, stamped with `now`.
    pub fn extract_at(&self, doc: &Document, now: DateTime<Utc>) -> Option<IdentityInfo> {
        let source = doc.source();
        for strategy in &self.strategies {
            let fields = strategy.extract(doc);
            if let Some(info) = fields.stamp(now, source.clone()) {
                info!("Identity found by {} strategy", strategy.name());
                return Some(info);
            }
            debug!("{} strategy found no identity fields", strategy.name());
        }
        None
    }
}

/// `Some` for non-empty text.
pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_selector_wins_over_text() {
        let doc = Document::parse(
            r#"<title>健保醫療資訊雲端查詢系統</title>
               <body><span class="name">林美華</span><p>身分證號：Z99***999</p></body>"#,
        );
        let info = IdentityExtractor::new(&IdentityConfig::default())
            .unwrap()
            .extract_at(&doc, now())
            .unwrap();
        assert_eq!(info.name.as_deref(), Some("林美華"));
        assert_eq!(info.id_number, None);
        assert_eq!(info.source, "健保醫療資訊雲端查詢系統");
        assert_eq!(info.extracted_at, now());
    }

    #[test]
    fn test_falls_back_to_text() {
        let doc = Document::parse("<body><p>身分證號：Z99***999</p></body>")
            .with_url("https://medcloud.example/patient");
        let info = IdentityExtractor::new(&IdentityConfig::default())
            .unwrap()
            .extract_at(&doc, now())
            .unwrap();
        assert_eq!(info.id_number.as_deref(), Some("Z99***999"));
        assert_eq!(info.source, "https://medcloud.example/patient");
    }

    #[test]
    fn test_text_fallback_can_be_disabled() {
        let doc = Document::parse("<body><p>身分證號：Z99***999</p></body>");
        let config = IdentityConfig {
            text_fallback: false,
            ..Default::default()
        };
        assert!(IdentityExtractor::new(&config).unwrap().extract_at(&doc, now()).is_none());
    }

    #[test]
    fn test_none_when_nothing_found() {
        let doc = Document::parse("<title>Report</title><body><p>nothing</p></body>");
        assert!(IdentityExtractor::new(&IdentityConfig::default())
            .unwrap()
            .extract_at(&doc, now())
            .is_none());
    }

    #[test]
    fn test_custom_strategies() {
        struct Fixed;
        impl IdentityStrategy for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn extract(&self, _doc: &Document) -> IdentityFields {
                IdentityFields {
                    gender: Some("女".into()),
                    ..Default::default()
                }
            }
        }

        let extractor = IdentityExtractor::with_strategies(vec![Box::new(TextStrategy), Box::new(Fixed)]);
        let info = extractor.extract_at(&Document::parse(""), now()).unwrap();
        assert_eq!(info.gender.as_deref(), Some("女"));
    }
}

//! Pipeline orchestration: classify, extract the table, post-process, then
//! read the patient identity.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::classify::{Classifier, Mode};
use crate::document::Document;
use crate::error::Result;
use crate::identity::IdentityExtractor;
use crate::medical::post_process;
use crate::models::{ExtractionResult, MedcapConfig, RecordSet};
use crate::table::{default_strategies, extract, TableStrategy};

/// Extraction pipeline configured once and run against any number of pages.
///
/// Runs are independent: the pipeline keeps no state between documents.
pub struct Pipeline {
    config: MedcapConfig,
    strategies: Vec<Box<dyn TableStrategy>>,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(MedcapConfig::default())
    }

    /// Create a pipeline with the given configuration.
    pub fn with_config(config: MedcapConfig) -> Self {
        Self {
            config,
            strategies: default_strategies(),
        }
    }

    /// Replace the table strategies, tried in the given order.
    pub fn with_table_strategies(mut self, strategies: Vec<Box<dyn TableStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &MedcapConfig {
        &self.config
    }

    /// Check that every configured stage can be built.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        Classifier::new(&self.config.classifier)?;
        IdentityExtractor::new(&self.config.identity)?;
        Ok(())
    }

    /// Run the pipeline, stamping identity with the current instant.
    pub fn run(&self, doc: &Document) -> ExtractionResult {
        self.run_at(doc, Utc::now())
    }

    /// Run the pipeline, stamping identity with `now`.
    ///
    /// Faults are reported in the returned result and never propagate.
    pub fn run_at(&self, doc: &Document, now: DateTime<Utc>) -> ExtractionResult {
        let start = Instant::now();
        let result = match self.try_run(doc, now) {
            Ok(result) => result,
            Err(e) => {
                warn!("Extraction failed: {}", e);
                ExtractionResult::failed(format!("extraction failed: {e}"))
            }
        };
        debug!("Pipeline finished in {:?}: {}", start.elapsed(), result.message);
        result
    }

    fn try_run(&self, doc: &Document, now: DateTime<Utc>) -> Result<ExtractionResult> {
        let mode = Classifier::new(&self.config.classifier)?.classify(doc);
        info!("Processing page {:?} as {:?}", doc.source(), mode);

        let mut records = self.extract_table(doc, mode);
        if mode.post_processes() {
            records = records.map(|records| post_process(&records));
        }

        let identity = match IdentityExtractor::new(&self.config.identity) {
            Ok(extractor) => extractor.extract_at(doc, now),
            Err(e) => {
                warn!("Identity extraction skipped: {}", e);
                None
            }
        };

        Ok(ExtractionResult::completed(mode, records, identity))
    }

    /// Try each table strategy in turn, keeping the first non-empty result.
    ///
    /// When every located table is empty, a MediCloud page still yields the
    /// empty set (its query returned no rows). Any other page yields `None`.
    pub fn extract_table(&self, doc: &Document, mode: Mode) -> Option<RecordSet> {
        let mut fallback = None;
        for strategy in &self.strategies {
            let Some(handle) = strategy.locate(doc) else {
                continue;
            };
            match extract(handle) {
                Some(records) if !records.is_empty() => {
                    info!("Extracted {} records with {} layout", records.len(), strategy.name());
                    return Some(records);
                }
                Some(records) => {
                    debug!("{} layout produced no records", strategy.name());
                    fallback = Some(records);
                }
                None => debug!("{} layout has no rows", strategy.name()),
            }
        }
        let fallback = fallback.filter(|_| mode.post_processes());
        if fallback.is_none() {
            warn!("No table data found");
        }
        fallback
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the default pipeline over an HTML string.
pub fn extract_html(html: &str, url: Option<&str>) -> ExtractionResult {
    let mut doc = Document::parse(html);
    if let Some(url) = url {
        doc = doc.with_url(url);
    }
    Pipeline::new().run(&doc)
}

//! Combined pipeline output.

use serde::{Deserialize, Serialize};

use super::identity::IdentityInfo;
use super::record::RecordSet;
use crate::classify::Mode;

/// Outcome of one pipeline run, as handed back to the capture trigger.
///
/// `success` tracks only whether a record set was obtained; identity
/// extraction can succeed or fail independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    pub records: Option<RecordSet>,
    pub identity: Option<IdentityInfo>,
    /// Human-readable status line.
    pub message: String,
    /// How the page was classified, when classification completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
}

impl ExtractionResult {
    /// A completed run. `success` follows `records`.
    pub fn completed(
        mode: Mode,
        records: Option<RecordSet>,
        identity: Option<IdentityInfo>,
    ) -> Self {
        let message = match &records {
            Some(records) => format!("extracted {} records", records.len()),
            None => "no table data found".to_string(),
        };
        Self {
            success: records.is_some(),
            records,
            identity,
            message,
            mode: Some(mode),
        }
    }

    /// A run aborted by a fault. Nothing partial is returned.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            records: None,
            identity: None,
            message: message.into(),
            mode: None,
        }
    }

    /// Number of extracted records, zero when none were found.
    pub fn record_count(&self) -> usize {
        self.records.as_ref().map_or(0, RecordSet::len)
    }
}

//! JSON encoding of pipeline output.

use crate::error::Result;
use crate::models::{ExtractionResult, IdentityInfo, RecordSet};

/// Records as a pretty-printed array of ordered objects.
pub fn records_to_json(records: &RecordSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Identity as written to `personal-info.json`.
pub fn identity_to_json(identity: &IdentityInfo) -> Result<String> {
    Ok(serde_json::to_string_pretty(identity)?)
}

/// The full pipeline result.
pub fn result_to_json(result: &ExtractionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

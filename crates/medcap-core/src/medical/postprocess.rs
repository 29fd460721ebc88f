//! Field transforms for MediCloud query tables.

use tracing::debug;

use super::rules::convert_roc_date;
use crate::models::{Record, RecordSet};

/// Marker for columns holding ROC dates (`就醫日期`, `調劑日期`, ...).
pub const DATE_MARKER: &str = "日期";

/// Composite column packing institution, visit type and code on three lines.
pub const SOURCE_FIELD: &str = "來源";

/// Fields derived from [`SOURCE_FIELD`], in segment order.
pub const SOURCE_PARTS: [&str; 3] = ["醫院名稱", "門診類型", "機構代碼"];

/// Apply the MediCloud transforms to every record, producing a new set.
pub fn post_process(records: &RecordSet) -> RecordSet {
    let processed: RecordSet = records.iter().map(post_process_record).collect();
    debug!("Post-processed {} MediCloud records", processed.len());
    processed
}

/// Apply the MediCloud transforms to a single record.
pub fn post_process_record(record: &Record) -> Record {
    let mut record = record.clone();
    convert_date_fields(&mut record);
    split_source_field(&mut record);
    record
}

/// Rewrite ROC dates in every date column to the common era.
pub fn convert_date_fields(record: &mut Record) {
    for (key, value) in record.iter_mut() {
        if key.contains(DATE_MARKER) && !value.is_empty() {
            *value = convert_roc_date(value);
        }
    }
}

/// Derive institution fields from a multi-line source column.
///
/// Segments past the third are ignored. The source column is left intact.
pub fn split_source_field(record: &mut Record) {
    let segments: Vec<String> = match record.get(SOURCE_FIELD) {
        Some(source) => source.split('\n').map(str::to_string).collect(),
        None => return,
    };
    if segments.len() < SOURCE_PARTS.len() {
        return;
    }
    for (key, segment) in SOURCE_PARTS.iter().zip(segments) {
        record.insert(*key, segment);
    }
}

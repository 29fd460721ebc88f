//! CSV encoding of record sets.
//!
//! The header row is the first record's keys joined with commas. Every
//! value is flattened to one line and always double-quoted. Rows are joined
//! with `\n` and there is no trailing newline.

use crate::models::{ExportConfig, Record, RecordSet};

/// Encode records with the default ` | ` line separator.
pub fn to_csv(records: &RecordSet) -> String {
    to_csv_with(records, &ExportConfig::default())
}

/// Encode records using the configured line separator.
pub fn to_csv_with(records: &RecordSet, config: &ExportConfig) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(records.headers().join(","));
    lines.extend(records.iter().map(|record| encode_row(record, &config.line_separator)));
    lines.join("\n")
}

/// One CSV row in the record's own key order.
fn encode_row(record: &Record, line_separator: &str) -> String {
    record
        .values()
        .map(|value| encode_value(value, line_separator))
        .collect::<Vec<_>>()
        .join(",")
}

/// Flatten a value to a single trimmed line and quote it.
pub fn encode_value(value: &str, line_separator: &str) -> String {
    let flattened = value.replace('\n', line_separator).replace('\r', "");
    let collapsed = flattened.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("\"{}\"", collapsed.replace('"', "\"\""))
}

//! Converts located tables into header-keyed records.

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};
use tracing::debug;

use super::locator::{GenericTable, TableHandle, WidgetTable, TD, TR};
use super::normalize::{header_text, normalize_cell};
use crate::models::{Record, RecordSet};

lazy_static! {
    static ref TH: Selector = Selector::parse("th").unwrap();
    static ref TBODY: Selector = Selector::parse("tbody").unwrap();
    static ref THEAD_TH: Selector = Selector::parse("thead th").unwrap();
    static ref TABLE_TBODY: Selector = Selector::parse("table tbody").unwrap();
}

/// Extract records from a located table.
///
/// Returns `None` when the table has no identifiable rows, and an empty set
/// when rows exist but none of them has data cells.
pub fn extract(handle: TableHandle<'_>) -> Option<RecordSet> {
    match handle {
        TableHandle::Widget(widget) => extract_widget(&widget),
        TableHandle::Generic(generic) => extract_generic(&generic),
    }
}

fn extract_widget(widget: &WidgetTable<'_>) -> Option<RecordSet> {
    let mut headers: Vec<String> = widget
        .scroll_head
        .map(|head| head.select(&TH).map(header_text).collect())
        .unwrap_or_default();

    if headers.is_empty() {
        if let Some(table) = widget.embedded_table() {
            headers = table.select(&THEAD_TH).map(header_text).collect();
            debug!("Headers from embedded table: {:?}", headers);
        }
    } else {
        debug!("Headers from scroll head: {:?}", headers);
    }

    let mut rows: Vec<ElementRef<'_>> = widget
        .scroll_body
        .and_then(|body| body.select(&TBODY).next())
        .map(|tbody| tbody.select(&TR).collect())
        .unwrap_or_default();

    if rows.is_empty() {
        rows = widget
            .wrapper
            .select(&TABLE_TBODY)
            .next()
            .map(|tbody| tbody.select(&TR).collect())
            .unwrap_or_default();
    }

    if rows.is_empty() {
        debug!("DataTables widget has no body rows");
        return None;
    }

    debug!("DataTables widget has {} body rows", rows.len());
    Some(records_from_rows(&headers, rows))
}

fn extract_generic(generic: &GenericTable<'_>) -> Option<RecordSet> {
    let rows: Vec<ElementRef<'_>> = generic.table.select(&TR).collect();
    let (header_row, data_rows) = rows.split_first()?;

    let mut headers: Vec<String> = header_row.select(&TH).map(header_text).collect();
    if headers.is_empty() {
        headers = header_row.select(&TD).map(header_text).collect();
    }
    debug!("Generic table headers: {:?}", headers);

    Some(records_from_rows(&headers, data_rows.iter().copied()))
}

fn records_from_rows<'a>(
    headers: &[String],
    rows: impl IntoIterator<Item = ElementRef<'a>>,
) -> RecordSet {
    rows.into_iter()
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
            if cells.is_empty() {
                return None;
            }
            let record: Record = cells
                .into_iter()
                .enumerate()
                .map(|(index, cell)| (column_key(headers, index), normalize_cell(cell)))
                .collect();
            Some(record)
        })
        .collect()
}

/// Header for a column, or `column<index>` when it has none.
fn column_key(headers: &[String], index: usize) -> String {
    match headers.get(index) {
        Some(header) if !header.is_empty() => header.clone(),
        _ => format!("column{index}"),
    }
}

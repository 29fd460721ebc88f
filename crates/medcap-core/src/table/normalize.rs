//! Cell and header text cleanup.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Node, Selector};

use crate::document::element_text;

lazy_static! {
    static ref BR: Selector = Selector::parse("br").unwrap();

    // Screen-reader suffix DataTables appends to sortable headers
    static ref SORT_SUFFIX: Regex = Regex::new(r"(?i):\s*activate to sort.*$").unwrap();
}

/// Normalize a table cell to its display text.
///
/// Cells containing `<br>` keep one `\n` per break and drop all other
/// markup. Other cells use their plain text. Both are trimmed.
pub fn normalize_cell(cell: ElementRef<'_>) -> String {
    if cell.select(&BR).next().is_none() {
        return element_text(cell).trim().to_string();
    }

    let mut text = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Header text with the sortable-column suffix removed.
pub fn clean_header(text: &str) -> String {
    SORT_SUFFIX.replace(text.trim(), "").into_owned()
}

/// Header key for a cell element.
pub fn header_text(cell: ElementRef<'_>) -> String {
    clean_header(&element_text(cell))
}

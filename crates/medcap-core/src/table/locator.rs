//! Table location strategies.

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::document::Document;

lazy_static! {
    static ref WRAPPER: Selector = Selector::parse(".dataTables_wrapper").unwrap();
    static ref SCROLL_HEAD: Selector = Selector::parse(".dataTables_scrollHead").unwrap();
    static ref SCROLL_BODY: Selector = Selector::parse(".dataTables_scrollBody").unwrap();
    pub(crate) static ref TABLE: Selector = Selector::parse("table").unwrap();
    pub(crate) static ref TR: Selector = Selector::parse("tr").unwrap();
    pub(crate) static ref TD: Selector = Selector::parse("td").unwrap();
}

/// A table found in a document, ready for extraction.
#[derive(Debug, Clone, Copy)]
pub enum TableHandle<'a> {
    /// DataTables widget with optionally decoupled scroll regions.
    Widget(WidgetTable<'a>),
    /// Plain `<table>` with contiguous header and body rows.
    Generic(GenericTable<'a>),
}

/// Regions of a DataTables widget.
#[derive(Debug, Clone, Copy)]
pub struct WidgetTable<'a> {
    /// The `.dataTables_wrapper` element.
    pub wrapper: ElementRef<'a>,
    /// Scrolling header region, present when the widget scrolls.
    pub scroll_head: Option<ElementRef<'a>>,
    /// Scrolling body region, present when the widget scrolls.
    pub scroll_body: Option<ElementRef<'a>>,
}

impl<'a> WidgetTable<'a> {
    /// First table inside the wrapper, used when scroll regions are missing.
    pub fn embedded_table(&self) -> Option<ElementRef<'a>> {
        self.wrapper.select(&TABLE).next()
    }
}

/// A plain data table.
#[derive(Debug, Clone, Copy)]
pub struct GenericTable<'a> {
    pub table: ElementRef<'a>,
}

/// One way of finding a table in a document.
pub trait TableStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Find this strategy's table, if the document has one.
    fn locate<'a>(&self, doc: &'a Document) -> Option<TableHandle<'a>>;
}

/// Finds DataTables widgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetLayout;

impl TableStrategy for WidgetLayout {
    fn name(&self) -> &'static str {
        "widget"
    }

    fn locate<'a>(&self, doc: &'a Document) -> Option<TableHandle<'a>> {
        let Some(wrapper) = doc.select_first(&WRAPPER) else {
            debug!("No DataTables wrapper found");
            return None;
        };

        let widget = WidgetTable {
            wrapper,
            scroll_head: wrapper.select(&SCROLL_HEAD).next(),
            scroll_body: wrapper.select(&SCROLL_BODY).next(),
        };
        debug!(
            "Found DataTables wrapper (scroll head: {}, scroll body: {})",
            widget.scroll_head.is_some(),
            widget.scroll_body.is_some()
        );
        Some(TableHandle::Widget(widget))
    }
}

/// Finds the first plain table that looks like data.
///
/// A table qualifies with more than one row and at least one `td`, which
/// skips single-row layout tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericLayout;

impl TableStrategy for GenericLayout {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn locate<'a>(&self, doc: &'a Document) -> Option<TableHandle<'a>> {
        let tables = doc.select_all(&TABLE);
        if tables.is_empty() {
            debug!("Document has no tables");
            return None;
        }

        let found = tables
            .into_iter()
            .find(|table| table.select(&TR).count() > 1 && table.select(&TD).next().is_some());

        match found {
            Some(table) => {
                debug!("Using generic table with {} rows", table.select(&TR).count());
                Some(TableHandle::Generic(GenericTable { table }))
            }
            None => {
                debug!("No table qualifies as a data table");
                None
            }
        }
    }
}

/// Strategies in the order they are tried.
pub fn default_strategies() -> Vec<Box<dyn TableStrategy>> {
    vec![Box::new(WidgetLayout), Box::new(GenericLayout)]
}

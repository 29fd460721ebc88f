//! Table location and extraction.
//!
//! Two layouts are recognised, tried in order:
//! - DataTables widgets (`.dataTables_wrapper`), whose header and body may
//!   live in separate scrolling regions
//! - plain `<table>` elements with more than one row and at least one `td`

mod extractor;
pub mod locator;
pub mod normalize;

pub use extractor::extract;
pub use locator::{
    default_strategies, GenericLayout, GenericTable, TableHandle, TableStrategy,
    WidgetLayout, WidgetTable,
};
pub use normalize::{clean_header, normalize_cell};

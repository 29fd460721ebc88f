//! Export encoders. These build file contents only; writing them is up to
//! the caller.

pub mod csv;
pub mod json;

pub use self::csv::{to_csv, to_csv_with};
pub use self::json::{identity_to_json, records_to_json, result_to_json};

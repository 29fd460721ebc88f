//! MediCloud-specific rules and record post-processing.

pub mod postprocess;
pub mod rules;

pub use postprocess::{post_process, post_process_record, DATE_MARKER, SOURCE_FIELD, SOURCE_PARTS};

//! Core library for capturing medical record tables from saved web pages.
//!
//! This crate provides:
//! - Page classification (generic, medical, NHI MediCloud)
//! - Table location and extraction for DataTables widgets and plain tables
//! - ROC calendar date conversion and source field splitting
//! - Patient identity extraction
//! - CSV and JSON encoders for the extracted data

pub mod classify;
pub mod document;
pub mod error;
pub mod export;
pub mod identity;
pub mod medical;
pub mod models;
pub mod pipeline;
pub mod table;

pub use classify::{Classifier, Mode, Variant};
pub use document::Document;
pub use error::{MedcapError, Result};
pub use export::{to_csv, to_csv_with};
pub use medical::rules::convert_roc_date;
pub use models::{ExtractionResult, IdentityInfo, MedcapConfig, Record, RecordSet};
pub use pipeline::{extract_html, Pipeline};

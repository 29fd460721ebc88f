//! Data models shared by the pipeline stages and exporters.

pub mod config;
pub mod identity;
pub mod record;
pub mod result;

pub use config::{ClassifierConfig, ExportConfig, IdentityConfig, MedcapConfig};
pub use identity::{IdentityFields, IdentityInfo};
pub use record::{Record, RecordSet};
pub use result::ExtractionResult;

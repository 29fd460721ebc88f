//! WASM bindings for medical portal capture.
//!
//! This crate provides WebAssembly bindings for use in browser extensions
//! and Node.js. The host passes the page HTML and URL; results come back as
//! plain JS objects.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use medcap_core::{Document, ExtractionResult, MedcapConfig, Pipeline, RecordSet};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Run the default pipeline over a page.
///
/// Always returns an extraction result object; failures are reported in
/// its `success` and `message` fields.
#[wasm_bindgen]
pub fn extract(html: &str, url: Option<String>) -> Result<JsValue, JsValue> {
    run_pipeline(&Pipeline::new(), html, url)
}

/// Encode an array of record objects as CSV text.
#[wasm_bindgen]
pub fn to_csv(records: JsValue) -> Result<String, JsValue> {
    let records: RecordSet = serde_wasm_bindgen::from_value(records).map_err(to_js_error)?;
    Ok(medcap_core::to_csv(&records))
}

/// Convert a ROC calendar date (`114/05/31`) to the common era.
///
/// Anything else is returned unchanged.
#[wasm_bindgen]
pub fn convert_roc_date(value: &str) -> String {
    medcap_core::convert_roc_date(value)
}

/// Configured pipeline for repeated captures.
#[wasm_bindgen]
pub struct Medcap {
    pipeline: Pipeline,
}

#[wasm_bindgen]
impl Medcap {
    /// Create a pipeline, optionally from a JSON configuration string.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Medcap, JsValue> {
        let config = match config_json {
            Some(json) => MedcapConfig::from_json(&json).map_err(to_js_error)?,
            None => MedcapConfig::default(),
        };
        let pipeline = Pipeline::with_config(config);
        pipeline.validate().map_err(to_js_error)?;
        Ok(Self { pipeline })
    }

    /// Extract records and identity from a page.
    #[wasm_bindgen]
    pub fn extract(&self, html: &str, url: Option<String>) -> Result<JsValue, JsValue> {
        run_pipeline(&self.pipeline, html, url)
    }

    /// Encode records as CSV using the configured line separator.
    #[wasm_bindgen]
    pub fn to_csv(&self, records: JsValue) -> Result<String, JsValue> {
        let records: RecordSet = serde_wasm_bindgen::from_value(records).map_err(to_js_error)?;
        Ok(medcap_core::to_csv_with(&records, &self.pipeline.config().export))
    }

    /// Current configuration as pretty-printed JSON.
    #[wasm_bindgen]
    pub fn config(&self) -> Result<String, JsValue> {
        self.pipeline.config().to_json_pretty().map_err(to_js_error)
    }
}

impl Default for Medcap {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::new(),
        }
    }
}

fn run_pipeline(pipeline: &Pipeline, html: &str, url: Option<String>) -> Result<JsValue, JsValue> {
    let mut doc = Document::parse(html);
    if let Some(url) = url {
        doc = doc.with_url(url);
    }

    let result = pipeline.run_at(&doc, js_now());
    if !result.success {
        web_sys::console::warn_1(&JsValue::from_str(&result.message));
    }
    to_js_value(&result)
}

/// Capture instant from the JS host clock.
fn js_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Convert to a plain JS object, with maps as objects rather than `Map`s.
fn to_js_value(result: &ExtractionResult) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    result.serialize(&serializer).map_err(to_js_error)
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_convert_roc_date() {
        assert_eq!(convert_roc_date("114/05/31"), "2025/05/31");
        assert_eq!(convert_roc_date("2025/05/31"), "2025/05/31");
    }

    #[wasm_bindgen_test]
    fn test_extract_reports_success() {
        let html = "<table><tr><th>H1</th></tr><tr><td>1</td></tr></table>";
        let value = extract(html, None).unwrap();
        let success = js_sys::Reflect::get(&value, &JsValue::from_str("success")).unwrap();
        assert_eq!(success.as_bool(), Some(true));
    }

    #[wasm_bindgen_test]
    fn test_to_csv_from_js_records() {
        let value = extract("<table><tr><th>A</th></tr><tr><td>x</td></tr></table>", None).unwrap();
        let records = js_sys::Reflect::get(&value, &JsValue::from_str("records")).unwrap();
        assert_eq!(to_csv(records).unwrap(), "A\n\"x\"");
    }

    #[wasm_bindgen_test]
    fn test_invalid_config_is_rejected() {
        assert!(Medcap::new(Some("{\"classifier\": {\"system_names\": []}}".into())).is_err());
        assert!(Medcap::new(None).is_ok());
    }
}

//! Personal identity fields read from a patient page header.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Substantive identity fields found by one extraction strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityFields {
    /// National ID number, possibly masked (`A12***789`).
    pub id_number: Option<String>,
    pub name: Option<String>,
    /// Birth date as displayed, usually ROC era (`民 75/01/02`).
    pub birth_date: Option<String>,
    /// Birth date converted to the common era (`1986/01/02`).
    pub birth_date_ad: Option<String>,
    pub gender: Option<String>,
}

impl IdentityFields {
    /// True when no substantive field carries a non-empty value.
    pub fn is_empty(&self) -> bool {
        [
            &self.id_number,
            &self.name,
            &self.birth_date,
            &self.birth_date_ad,
            &self.gender,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(str::is_empty))
    }

    /// Stamp provenance onto the fields, yielding `None` if nothing was found.
    pub fn stamp(self, extracted_at: DateTime<Utc>, source: String) -> Option<IdentityInfo> {
        if self.is_empty() {
            return None;
        }
        Some(IdentityInfo {
            id_number: self.id_number,
            name: self.name,
            birth_date: self.birth_date,
            birth_date_ad: self.birth_date_ad,
            gender: self.gender,
            extracted_at,
            source,
        })
    }
}

/// Identity record returned to the capture trigger.
///
/// Serializes with the key names of the `personal-info.json` export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(rename = "birthDateAD", default, skip_serializing_if = "Option::is_none")]
    pub birth_date_ad: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// When the extraction ran. Serialized with millisecond precision.
    #[serde(serialize_with = "serialize_millis")]
    pub extracted_at: DateTime<Utc>,

    /// Page title, or URL when the page has no title.
    pub source: String,
}

fn serialize_millis<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

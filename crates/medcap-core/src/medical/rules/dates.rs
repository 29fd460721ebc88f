//! ROC (Minguo) calendar date conversion.

use super::patterns::{ROC_DATE, ROC_ERA_DATE};
use super::{ExtractionMatch, FieldExtractor};

/// Offset between ROC years and common-era years.
pub const ROC_YEAR_OFFSET: u32 = 1911;

/// Render ROC date parts as `YYYY/MM/DD` in the common era.
///
/// Parts are not range-checked. Returns `None` only if a part is not a
/// decimal number.
pub fn roc_parts_to_ad(year: &str, month: &str, day: &str) -> Option<String> {
    let year: u32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    Some(format!("{}/{:02}/{:02}", year + ROC_YEAR_OFFSET, month, day))
}

/// Convert a value that is exactly `{yyy}/{m}/{d}` in ROC years.
///
/// Anything else, including dates already in the common era, is returned
/// unchanged.
pub fn convert_roc_date(value: &str) -> String {
    ROC_DATE
        .captures(value)
        .and_then(|caps| roc_parts_to_ad(&caps[1], &caps[2], &caps[3]))
        .unwrap_or_else(|| value.to_string())
}

/// An era-prefixed date found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraDate {
    /// Canonical rendering, `民 {y}/{m}/{d}` with the digits as found.
    pub display: String,
    /// Common-era date, `YYYY/MM/DD`.
    pub ad: String,
}

/// Extractor for `民 yyy/mm/dd` birth dates.
pub struct EraDateExtractor;

impl EraDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EraDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EraDateExtractor {
    type Output = ExtractionMatch<EraDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ROC_ERA_DATE
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let ad = roc_parts_to_ad(&caps[1], &caps[2], &caps[3])?;
                let date = EraDate {
                    display: format!("民 {}/{}/{}", &caps[1], &caps[2], &caps[3]),
                    ad,
                };
                Some(ExtractionMatch::new(date, full.as_str()).with_position(full.start(), full.end()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_roc_date() {
        assert_eq!(convert_roc_date("114/05/31"), "2025/05/31");
        assert_eq!(convert_roc_date("99/1/2"), "2010/01/02");
    }

    #[test]
    fn test_convert_leaves_other_values() {
        assert_eq!(convert_roc_date("2025/05/31"), "2025/05/31");
        assert_eq!(convert_roc_date(""), "");
        assert_eq!(convert_roc_date("114-05-31"), "114-05-31");
        assert_eq!(convert_roc_date("114/05/31\n114/06/01"), "114/05/31\n114/06/01");
    }

    #[test]
    fn test_convert_is_idempotent() {
        let once = convert_roc_date("114/5/3");
        assert_eq!(once, "2025/05/03");
        assert_eq!(convert_roc_date(&once), once);
    }

    #[test]
    fn test_extract_era_date() {
        let found = EraDateExtractor::new().extract("出生日期：民 75/1/2 (39歲)").unwrap();
        assert_eq!(found.value.display, "民 75/1/2");
        assert_eq!(found.value.ad, "1986/01/02");
        assert_eq!(found.source, "民 75/1/2");
    }

    #[test]
    fn test_extract_era_date_without_space() {
        let found = EraDateExtractor::new().extract("民075/12/31").unwrap();
        assert_eq!(found.value.display, "民 075/12/31");
        assert_eq!(found.value.ad, "1986/12/31");
    }

    #[test]
    fn test_extract_era_date_missing() {
        assert!(EraDateExtractor::new().extract("1986/01/02").is_none());
    }
}

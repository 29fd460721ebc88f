//! Common regex patterns for Taiwanese medical portal pages.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ROC calendar date filling a whole table cell: 114/05/31
    pub static ref ROC_DATE: Regex = Regex::new(
        r"^([0-9]{2,3})/([0-9]{1,2})/([0-9]{1,2})$"
    ).unwrap();

    // Era-prefixed ROC date anywhere in text: 民 75/01/02
    pub static ref ROC_ERA_DATE: Regex = Regex::new(
        r"民\s*([0-9]{2,3})/([0-9]{1,2})/([0-9]{1,2})"
    ).unwrap();

    // National ID, either masked (A12***789) or full (A123456789)
    pub static ref ID_NUMBER: Regex = Regex::new(
        r"[A-Z][0-9]{2}\*{3}[0-9]{3}|[A-Z][0-9]{9}"
    ).unwrap();

    pub static ref ID_LABEL_PREFIX: Regex = Regex::new(
        r"^身分證號[：:]\s*"
    ).unwrap();

    // Labeled national ID inside running page text
    pub static ref LABELED_ID_NUMBER: Regex = Regex::new(
        r"身分證號[：:]\s*([A-Z][0-9]{2}\*{3}[0-9]{3}|[A-Z][0-9]{9})"
    ).unwrap();
}

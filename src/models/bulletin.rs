use crate::models::Period;
use crate::utils::constants::COMMODITY_CODE_WIDTH;
use serde::{Deserialize, Serialize};

/// A weight or value field as published: trimmed source text, decimal comma
/// included. The numeric reading is taken on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measure(String);

impl Measure {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the field carries the official non-disclosure marker.
    pub fn is_suppressed(&self, marker: char) -> bool {
        self.0.contains(marker)
    }

    pub fn value(&self) -> Option<f64> {
        parse_locale_decimal(&self.0)
    }
}

/// Parse a number written with a decimal comma. Anything that is not a
/// finite number after the comma fix is treated as missing.
pub fn parse_locale_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Left-pad a commodity code with zeros to eight digits.
///
/// Codes read back from numeric spreadsheets sometimes carry a trailing
/// `.0`; that is stripped first. Returns `None` for anything that is not a
/// digit string of at most eight characters.
pub fn normalize_commodity_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);

    if digits.is_empty()
        || digits.len() > COMMODITY_CODE_WIDTH
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    Some(format!("{:0>width$}", digits, width = COMMODITY_CODE_WIDTH))
}

/// Canonical form of a raw country identifier used as the join key.
///
/// Numeric identifiers lose their leading zeros so that `031` and `31`
/// refer to the same partner.
pub fn normalize_country_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

/// One row of a yearly bulletin member after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBulletinRecord {
    pub year: i32,
    pub month: u32,
    pub commodity_code: String,
    pub country_id: String,
    pub net_weight: Measure,
    pub fob: Measure,
}

impl RawBulletinRecord {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

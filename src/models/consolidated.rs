use crate::models::{Measure, Period, SeriesKey};
use serde::{Deserialize, Serialize};

/// A bulletin row whose commodity survived the allow-list, before the
/// country join.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    pub year: i32,
    pub month: u32,
    pub ticker: String,
    pub country_id: String,
    pub net_weight: Measure,
    pub fob: Measure,
}

/// A row of the consolidated intermediate table.
///
/// Field names and order follow the published table layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    #[serde(rename = "ANO")]
    pub year: i32,
    #[serde(rename = "MES")]
    pub month: u32,
    #[serde(rename = "COD_COMM")]
    pub ticker: String,
    #[serde(rename = "COD_COUNTRY")]
    pub country_code: Option<String>,
    #[serde(rename = "PNET")]
    pub net_weight: Measure,
    #[serde(rename = "FOB")]
    pub fob: Measure,
}

impl ConsolidatedRecord {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }

    /// Combined series key; rows with no resolved country have none.
    pub fn series_key(&self) -> Option<SeriesKey> {
        self.country_code
            .as_ref()
            .map(|country| SeriesKey::new(self.ticker.clone(), country.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: Option<&str>) -> ConsolidatedRecord {
        ConsolidatedRecord {
            year: 2024,
            month: 3,
            ticker: "COS".to_string(),
            country_code: country.map(str::to_string),
            net_weight: Measure::new("100,5"),
            fob: Measure::new("10"),
        }
    }

    #[test]
    fn test_series_key() {
        assert_eq!(
            record(Some("AR")).series_key().map(|k| k.to_string()),
            Some("COS_AR".to_string())
        );
        assert!(record(None).series_key().is_none());
    }
}

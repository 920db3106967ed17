use crate::error::{ProcessingError, Result};
use crate::models::bulletin::{normalize_commodity_code, normalize_country_id};
use crate::utils::constants::{DEFAULT_COMMODITIES, NAMESPACE_SEPARATOR, SERIES_KEY_SEPARATOR};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Normalized eight-digit commodity code to short ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommodityMapping {
    tickers: BTreeMap<String, String>,
}

impl CommodityMapping {
    pub fn from_entries<I, C, T>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, T)>,
        C: AsRef<str>,
        T: AsRef<str>,
    {
        let mut tickers = BTreeMap::new();

        for (code, ticker) in entries {
            let code = code.as_ref();
            let ticker = ticker.as_ref().trim();

            let normalized = normalize_commodity_code(code).ok_or_else(|| {
                ProcessingError::reference("commodity mapping", format!("invalid code '{}'", code))
            })?;

            if ticker.is_empty()
                || ticker.contains(SERIES_KEY_SEPARATOR)
                || ticker.contains(NAMESPACE_SEPARATOR)
            {
                return Err(ProcessingError::reference(
                    "commodity mapping",
                    format!("invalid ticker '{}' for code {}", ticker, normalized),
                ));
            }

            if let Some(previous) = tickers.insert(normalized.clone(), ticker.to_string()) {
                if previous != ticker {
                    return Err(ProcessingError::reference(
                        "commodity mapping",
                        format!(
                            "code {} mapped to both '{}' and '{}'",
                            normalized, previous, ticker
                        ),
                    ));
                }
            }
        }

        if tickers.is_empty() {
            return Err(ProcessingError::reference(
                "commodity mapping",
                "no commodities configured",
            ));
        }

        Ok(Self { tickers })
    }

    /// Ticker for an already normalized commodity code.
    pub fn ticker_for(&self, code: &str) -> Option<&str> {
        self.tickers.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl Default for CommodityMapping {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_COMMODITIES
                .iter()
                .map(|(code, ticker)| (code.to_string(), ticker.to_string()))
                .collect(),
        }
    }
}

/// Raw partner identifier to canonical country code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryLookupTable {
    codes: HashMap<String, String>,
}

impl CountryLookupTable {
    /// Later entries for the same identifier replace earlier ones.
    pub fn from_pairs<I, R, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
        R: AsRef<str>,
        C: AsRef<str>,
    {
        let codes = pairs
            .into_iter()
            .map(|(raw, code)| {
                (
                    normalize_country_id(raw.as_ref()),
                    code.as_ref().trim().to_string(),
                )
            })
            .filter(|(raw, code)| !raw.is_empty() && !code.is_empty())
            .collect();

        Self { codes }
    }

    pub fn resolve(&self, raw_id: &str) -> Option<&str> {
        self.codes
            .get(&normalize_country_id(raw_id))
            .map(String::as_str)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.codes.values().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Authoritative catalog of published `ticker_country` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesAllowList {
    keys: HashSet<String>,
}

impl SeriesAllowList {
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.as_ref().trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Everything the pipeline reads but never writes.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub commodities: CommodityMapping,
    pub countries: CountryLookupTable,
    pub allowed_series: SeriesAllowList,
}

impl ReferenceData {
    pub fn new(
        commodities: CommodityMapping,
        countries: CountryLookupTable,
        allowed_series: SeriesAllowList,
    ) -> Self {
        Self {
            commodities,
            countries,
            allowed_series,
        }
    }

    /// The world marker must never be mistaken for a real country.
    pub fn check_world_marker(&self, world_marker: &str) -> Result<()> {
        if self.countries.contains_code(world_marker) {
            return Err(ProcessingError::reference(
                "country lookup",
                format!(
                    "world marker '{}' collides with a canonical country code",
                    world_marker
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let mapping = CommodityMapping::default();
        assert_eq!(mapping.len(), 6);
        assert_eq!(mapping.ticker_for("01012100"), Some("COS"));
        assert_eq!(mapping.ticker_for("10019900"), Some("WHS"));
        assert_eq!(mapping.ticker_for("99999999"), None);
    }

    #[test]
    fn test_mapping_normalizes_codes() {
        let mapping = CommodityMapping::from_entries([("1012100", "COS")]).unwrap();
        assert_eq!(mapping.ticker_for("01012100"), Some("COS"));
    }

    #[test]
    fn test_mapping_rejects_bad_entries() {
        assert!(CommodityMapping::from_entries([("01012100", "CO_S")]).is_err());
        assert!(CommodityMapping::from_entries([("01012100", "")]).is_err());
        assert!(CommodityMapping::from_entries([("abc", "COS")]).is_err());
        assert!(CommodityMapping::from_entries([("01012100", "COS"), ("1012100", "SBM")]).is_err());
        assert!(CommodityMapping::from_entries(Vec::<(&str, &str)>::new()).is_err());
    }

    #[test]
    fn test_country_lookup_resolution() {
        let lookup = CountryLookupTable::from_pairs([("031", "BR"), ("X", "AR")]);
        assert_eq!(lookup.resolve("31"), Some("BR"));
        assert_eq!(lookup.resolve(" X "), Some("AR"));
        assert_eq!(lookup.resolve("999"), None);
        assert!(lookup.contains_code("AR"));
    }

    #[test]
    fn test_allow_list_trims() {
        let allowed = SeriesAllowList::from_keys([" COS_AR ", "", "SBM_BR"]);
        assert_eq!(allowed.len(), 2);
        assert!(allowed.contains("COS_AR"));
    }

    #[test]
    fn test_world_marker_collision() {
        let reference = ReferenceData::new(
            CommodityMapping::default(),
            CountryLookupTable::from_pairs([("1", "WO")]),
            SeriesAllowList::default(),
        );
        assert!(reference.check_world_marker("WO").is_err());
        assert!(reference.check_world_marker("WLD").is_ok());
    }
}

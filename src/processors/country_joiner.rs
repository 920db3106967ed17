use crate::models::{ConsolidatedRecord, CountryLookupTable, MappedRecord};
use tracing::debug;

/// Left join of mapped rows against the country lookup. Every input row
/// yields exactly one output row; unmatched identifiers leave the country
/// empty.
pub struct CountryJoiner<'a> {
    lookup: &'a CountryLookupTable,
}

impl<'a> CountryJoiner<'a> {
    pub fn new(lookup: &'a CountryLookupTable) -> Self {
        Self { lookup }
    }

    /// Returns the joined rows and the number left without a country.
    pub fn join(&self, records: Vec<MappedRecord>) -> (Vec<ConsolidatedRecord>, usize) {
        let mut unmatched = 0;

        let joined = records
            .into_iter()
            .map(|record| {
                let country_code = self.lookup.resolve(&record.country_id).map(str::to_string);
                if country_code.is_none() {
                    unmatched += 1;
                    debug!("No country code for raw identifier '{}'", record.country_id);
                }

                ConsolidatedRecord {
                    year: record.year,
                    month: record.month,
                    ticker: record.ticker,
                    country_code,
                    net_weight: record.net_weight,
                    fob: record.fob,
                }
            })
            .collect();

        (joined, unmatched)
    }
}

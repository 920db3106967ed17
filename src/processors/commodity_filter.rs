use crate::models::{CommodityMapping, MappedRecord, RawBulletinRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub unknown_commodity: usize,
    pub suppressed: usize,
    pub kept: usize,
}

/// Keeps rows whose commodity is mapped and swaps the code for its ticker.
/// Rows with an undisclosed weight or value are dropped.
pub struct CommodityFilter<'a> {
    mapping: &'a CommodityMapping,
    suppression_marker: char,
}

impl<'a> CommodityFilter<'a> {
    pub fn new(mapping: &'a CommodityMapping, suppression_marker: char) -> Self {
        Self {
            mapping,
            suppression_marker,
        }
    }

    pub fn apply(&self, records: Vec<RawBulletinRecord>) -> (Vec<MappedRecord>, FilterStats) {
        let mut stats = FilterStats::default();
        let mut mapped = Vec::with_capacity(records.len());

        for record in records {
            let ticker = match self.mapping.ticker_for(&record.commodity_code) {
                Some(ticker) => ticker.to_string(),
                None => {
                    stats.unknown_commodity += 1;
                    continue;
                }
            };

            if record.net_weight.is_suppressed(self.suppression_marker)
                || record.fob.is_suppressed(self.suppression_marker)
            {
                stats.suppressed += 1;
                continue;
            }

            mapped.push(MappedRecord {
                year: record.year,
                month: record.month,
                ticker,
                country_id: record.country_id,
                net_weight: record.net_weight,
                fob: record.fob,
            });
        }

        stats.kept = mapped.len();
        (mapped, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Measure;

    fn raw(code: &str, weight: &str, fob: &str) -> RawBulletinRecord {
        RawBulletinRecord {
            year: 2024,
            month: 3,
            commodity_code: code.to_string(),
            country_id: "X".to_string(),
            net_weight: Measure::new(weight),
            fob: Measure::new(fob),
        }
    }

    #[test]
    fn test_maps_known_commodities() {
        let mapping = CommodityMapping::default();
        let filter = CommodityFilter::new(&mapping, 's');
        let (mapped, stats) = filter.apply(vec![raw("01012100", "1", "2"), raw("12019000", "3", "4")]);

        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].ticker, "COS");
        assert_eq!(mapped[1].ticker, "SBS");
        assert_eq!(stats.kept, 2);
    }

    #[test]
    fn test_drops_unknown_commodities() {
        let mapping = CommodityMapping::default();
        let filter = CommodityFilter::new(&mapping, 's');
        let (mapped, stats) = filter.apply(vec![raw("99999999", "1", "2")]);

        assert!(mapped.is_empty());
        assert_eq!(stats.unknown_commodity, 1);
    }

    #[test]
    fn test_drops_suppressed_rows() {
        let mapping = CommodityMapping::default();
        let filter = CommodityFilter::new(&mapping, 's');
        let (mapped, stats) = filter.apply(vec![
            raw("01012100", "s", "2"),
            raw("01012100", "1", "s"),
            raw("01012100", "1", "2"),
        ]);

        assert_eq!(mapped.len(), 1);
        assert_eq!(stats.suppressed, 2);
    }
}

use crate::models::{ConsolidatedRecord, SeriesAllowList, SeriesPoint};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Sum that does not depend on the order values arrived in.
pub(crate) fn order_independent_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}

#[derive(Debug, Default)]
pub(crate) struct Totals {
    kgl: Vec<f64>,
    fob: Vec<f64>,
}

impl Totals {
    pub(crate) fn add(&mut self, kgl: Option<f64>, fob: Option<f64>) {
        if let Some(v) = kgl {
            self.kgl.push(v);
        }
        if let Some(v) = fob {
            self.fob.push(v);
        }
    }

    pub(crate) fn finish(self) -> (f64, f64) {
        (
            order_independent_sum(self.kgl),
            order_independent_sum(self.fob),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesBuild {
    pub points: Vec<SeriesPoint>,
    pub missing_country: usize,
    pub outside_catalog: usize,
}

/// Aggregates consolidated rows into one point per published series and
/// month.
pub struct SeriesBuilder<'a> {
    allowed: &'a SeriesAllowList,
    namespace: &'a str,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(allowed: &'a SeriesAllowList, namespace: &'a str) -> Self {
        Self { allowed, namespace }
    }

    pub fn build(&self, records: &[ConsolidatedRecord]) -> SeriesBuild {
        let mut build = SeriesBuild::default();
        let mut grouped: BTreeMap<(String, NaiveDate), Totals> = BTreeMap::new();

        for record in records {
            let key = match record.series_key() {
                Some(key) => key,
                None => {
                    build.missing_country += 1;
                    continue;
                }
            };

            if !self.allowed.contains(&key.to_string()) {
                build.outside_catalog += 1;
                continue;
            }

            let date = match record.period().first_day() {
                Some(date) => date,
                None => continue,
            };

            // Missing values are left out of the sums rather than zeroed.
            grouped
                .entry((key.identifier(self.namespace), date))
                .or_default()
                .add(record.net_weight.value(), record.fob.value());
        }

        build.points = grouped
            .into_iter()
            .map(|((series, date), totals)| {
                let (kgl, fob) = totals.finish();
                SeriesPoint {
                    series,
                    date,
                    kgl,
                    fob,
                }
            })
            .collect();

        build
    }
}

use crate::models::{SeriesKey, SeriesPoint};
use crate::processors::series_builder::Totals;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Derives one world series per commodity by summing every country for
/// each month.
pub struct WorldAggregator<'a> {
    namespace: &'a str,
    world_marker: &'a str,
}

impl<'a> WorldAggregator<'a> {
    pub fn new(namespace: &'a str, world_marker: &'a str) -> Self {
        Self {
            namespace,
            world_marker,
        }
    }

    pub fn world_points(&self, points: &[SeriesPoint]) -> Vec<SeriesPoint> {
        let mut grouped: BTreeMap<(String, NaiveDate), Totals> = BTreeMap::new();

        for point in points {
            if let Some(ticker) = point.ticker() {
                grouped
                    .entry((ticker.to_string(), point.date))
                    .or_default()
                    .add(Some(point.kgl), Some(point.fob));
            }
        }

        grouped
            .into_iter()
            .map(|((ticker, date), totals)| {
                let (kgl, fob) = totals.finish();
                SeriesPoint {
                    series: SeriesKey::new(ticker, self.world_marker.to_string())
                        .identifier(self.namespace),
                    date,
                    kgl,
                    fob,
                }
            })
            .collect()
    }

    /// Country series plus world series, ordered by identifier then date.
    pub fn combine(&self, mut points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
        let world = self.world_points(&points);
        points.extend(world);
        points.sort_by(|a, b| a.series.cmp(&b.series).then_with(|| a.date.cmp(&b.date)));
        points
    }
}

use crate::error::Result;
use crate::models::SeriesPoint;
use crate::utils::constants::{SNAPSHOT_DELIMITER, SNAPSHOT_HEADER, VALUE_DECIMALS};
use crate::writers::persist_atomically;
use csv::WriterBuilder;
use std::path::Path;
use tracing::info;

/// Writes IPV snapshots: `<cod>,<data>,<KGL>,<FOB>` with values fixed at
/// three decimals.
#[derive(Debug, Clone, Default)]
pub struct SnapshotWriter;

impl SnapshotWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, path: &Path, points: &[SeriesPoint]) -> Result<()> {
        persist_atomically(path, |w| {
            let mut writer = WriterBuilder::new()
                .delimiter(SNAPSHOT_DELIMITER)
                .has_headers(false)
                .from_writer(w);

            writer.write_record(SNAPSHOT_HEADER)?;
            for point in points {
                writer.write_record([
                    point.series.clone(),
                    point.date_label(),
                    format_value(point.kgl),
                    format_value(point.fob),
                ])?;
            }
            writer.flush()?;
            Ok(())
        })?;

        info!("Wrote {} series rows to {}", points.len(), path.display());
        Ok(())
    }
}

pub fn format_value(value: f64) -> String {
    format!("{:.*}", VALUE_DECIMALS, value)
}

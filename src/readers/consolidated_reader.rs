use crate::error::Result;
use crate::models::ConsolidatedRecord;
use crate::utils::constants::BULLETIN_DELIMITER;
use csv::{ReaderBuilder, Trim};
use std::path::Path;

/// Read a consolidated intermediate table written by an earlier extract.
pub fn read_consolidated_table(path: &Path) -> Result<Vec<ConsolidatedRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(BULLETIN_DELIMITER)
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: ConsolidatedRecord = result?;
        records.push(record);
    }
    Ok(records)
}

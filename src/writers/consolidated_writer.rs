use crate::error::Result;
use crate::models::ConsolidatedRecord;
use crate::utils::constants::BULLETIN_DELIMITER;
use crate::writers::persist_atomically;
use csv::WriterBuilder;
use std::path::Path;
use tracing::info;

/// Write the consolidated table: `;`-delimited with columns
/// `ANO;MES;COD_COMM;COD_COUNTRY;PNET;FOB`.
pub fn write_consolidated_table(path: &Path, records: &[ConsolidatedRecord]) -> Result<()> {
    persist_atomically(path, |w| {
        let mut writer = WriterBuilder::new()
            .delimiter(BULLETIN_DELIMITER)
            .has_headers(false)
            .from_writer(w);

        writer.write_record(["ANO", "MES", "COD_COMM", "COD_COUNTRY", "PNET", "FOB"])?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    })?;

    info!(
        "Wrote {} consolidated rows to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

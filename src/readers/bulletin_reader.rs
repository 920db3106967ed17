use crate::error::Result;
use crate::models::bulletin::{normalize_commodity_code, Measure, RawBulletinRecord};
use crate::readers::read_latin1;
use crate::utils::constants::{BULLETIN_COLUMN_COUNT, BULLETIN_DELIMITER};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::{debug, warn};

/// Rows of one bulletin member that passed normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    pub records: Vec<RawBulletinRecord>,
    pub rows_read: usize,
    pub rejected: usize,
}

/// Parses the positional six-column bulletin layout:
/// year; month; commodity; country; net weight; FOB value.
/// The header row is skipped and its names are ignored.
#[derive(Debug, Clone, Default)]
pub struct BulletinReader;

impl BulletinReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<NormalizedTable> {
        let text = read_latin1(path)?;
        let table = self.parse_str(&text)?;

        if table.rejected > 0 {
            warn!(
                "{}: rejected {} of {} rows",
                path.display(),
                table.rejected,
                table.rows_read
            );
        }

        Ok(table)
    }

    pub fn parse_str(&self, text: &str) -> Result<NormalizedTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(BULLETIN_DELIMITER)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut table = NormalizedTable::default();

        for result in reader.records() {
            let record = result?;
            table.rows_read += 1;

            match self.parse_record(&record) {
                Some(parsed) => table.records.push(parsed),
                None => {
                    table.rejected += 1;
                    debug!(
                        "Rejected bulletin row at line {}: {:?}",
                        record.position().map_or(0, |p| p.line()),
                        record
                    );
                }
            }
        }

        Ok(table)
    }

    fn parse_record(&self, record: &StringRecord) -> Option<RawBulletinRecord> {
        if record.len() != BULLETIN_COLUMN_COUNT {
            return None;
        }

        let year = record[0].parse::<i32>().ok()?;
        let month = record[1].parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
        let commodity_code = normalize_commodity_code(&record[2])?;

        let country_id = record[3].to_string();
        if country_id.is_empty() {
            return None;
        }

        Some(RawBulletinRecord {
            year,
            month,
            commodity_code,
            country_id,
            net_weight: Measure::new(&record[4]),
            fob: Measure::new(&record[5]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Año;Mes;NCM;Pdes;Pnet(kg);FOB(u$s)";

    #[test]
    fn test_parse_trims_and_pads() -> Result<()> {
        let text = format!("{}\n 2024 ; 03 ; 1012100 ; 212 ; 100,5 ; 2000,25 \n", HEADER);
        let table = BulletinReader::new().parse_str(&text)?;

        assert_eq!(table.rows_read, 1);
        assert_eq!(table.rejected, 0);
        let record = &table.records[0];
        assert_eq!(record.year, 2024);
        assert_eq!(record.month, 3);
        assert_eq!(record.commodity_code, "01012100");
        assert_eq!(record.country_id, "212");
        assert_eq!(record.net_weight.as_str(), "100,5");
        assert_eq!(record.fob.value(), Some(2000.25));
        Ok(())
    }

    #[test]
    fn test_wrong_column_count_rejected() -> Result<()> {
        let text = format!(
            "{}\n2024;3;01012100;212;1;2\n2024;3;01012100;212;1\n2024;3;01012100;212;1;2;extra\n",
            HEADER
        );
        let table = BulletinReader::new().parse_str(&text)?;

        assert_eq!(table.rows_read, 3);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.rejected, 2);
        Ok(())
    }

    #[test]
    fn test_invalid_month_and_code_rejected() -> Result<()> {
        let text = format!(
            "{}\n2024;13;01012100;212;1;2\n2024;1;ABC;212;1;2\n2024;1;01012100;;1;2\n",
            HEADER
        );
        let table = BulletinReader::new().parse_str(&text)?;
        assert!(table.records.is_empty());
        assert_eq!(table.rejected, 3);
        Ok(())
    }

    #[test]
    fn test_suppressed_values_are_kept_as_text() -> Result<()> {
        let text = format!("{}\n2024;3;01012100;212;s;s\n", HEADER);
        let table = BulletinReader::new().parse_str(&text)?;
        assert_eq!(table.records.len(), 1);
        assert!(table.records[0].net_weight.is_suppressed('s'));
        Ok(())
    }

    #[test]
    fn test_read_latin1_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"A\xf1o;Mes;NCM;Pdes;Pnet;FOB\r\n2023;12;23040010;203;50,0;10,0\r\n")?;
        file.flush()?;

        let table = BulletinReader::new().read(file.path())?;
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].commodity_code, "23040010");
        Ok(())
    }
}

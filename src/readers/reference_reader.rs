use crate::error::{ProcessingError, Result};
use crate::models::{CommodityMapping, CountryLookupTable, ReferenceData, SeriesAllowList};
use crate::readers::read_latin1;
use crate::settings::PipelineConfig;
use crate::utils::constants::{
    BULLETIN_DELIMITER, LOOKUP_COUNTRY_CODE_COLUMN, LOOKUP_RAW_COUNTRY_COLUMN,
};
use csv::{ReaderBuilder, Trim};
use std::path::Path;
use tracing::info;

fn source_name(path: &Path) -> String {
    path.display().to_string()
}

fn read_source(path: &Path) -> Result<String> {
    read_latin1(path)
        .map_err(|e| ProcessingError::reference(source_name(path), format!("cannot read: {}", e)))
}

/// Load the auxiliary country table, locating the raw identifier and the
/// canonical code columns by header name.
pub fn read_country_lookup(path: &Path) -> Result<CountryLookupTable> {
    let text = read_source(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(BULLETIN_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ProcessingError::reference(source_name(path), e.to_string()))?
        .clone();
    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            ProcessingError::reference(source_name(path), format!("missing column {}", name))
        })
    };
    let raw_index = column(LOOKUP_RAW_COUNTRY_COLUMN)?;
    let code_index = column(LOOKUP_COUNTRY_CODE_COLUMN)?;

    let mut pairs = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| ProcessingError::reference(source_name(path), e.to_string()))?;
        if let (Some(raw), Some(code)) = (record.get(raw_index), record.get(code_index)) {
            pairs.push((raw.to_string(), code.to_string()));
        }
    }

    let lookup = CountryLookupTable::from_pairs(pairs);
    if lookup.is_empty() {
        return Err(ProcessingError::reference(
            source_name(path),
            "no country mappings found",
        ));
    }

    info!("Loaded {} country mappings from {}", lookup.len(), path.display());
    Ok(lookup)
}

/// Load the newline-delimited catalog of published series keys.
pub fn read_series_allow_list(path: &Path) -> Result<SeriesAllowList> {
    let text = read_source(path)?;
    let allowed = SeriesAllowList::from_keys(text.lines());

    if allowed.is_empty() {
        return Err(ProcessingError::reference(
            source_name(path),
            "series list is empty",
        ));
    }

    info!("Loaded {} series keys from {}", allowed.len(), path.display());
    Ok(allowed)
}

/// Load a `NCM;COD_COMM` mapping file. The first row is a header.
pub fn read_commodity_mapping(path: &Path) -> Result<CommodityMapping> {
    let text = read_source(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(BULLETIN_DELIMITER)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut entries = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| ProcessingError::reference(source_name(path), e.to_string()))?;
        match (record.get(0), record.get(1)) {
            (Some(code), Some(ticker)) => entries.push((code.to_string(), ticker.to_string())),
            _ => {
                return Err(ProcessingError::reference(
                    source_name(path),
                    format!("expected two columns, got {:?}", record),
                ))
            }
        }
    }

    CommodityMapping::from_entries(entries).map_err(|e| match e {
        ProcessingError::ReferenceData { message, .. } => {
            ProcessingError::reference(source_name(path), message)
        }
        other => other,
    })
}

/// Load every reference input named by the configuration. Any failure
/// here is fatal for the run.
pub fn load_reference_data(config: &PipelineConfig) -> Result<ReferenceData> {
    let commodities = match &config.commodity_mapping_path {
        Some(path) => read_commodity_mapping(path)?,
        None => CommodityMapping::from_entries(
            config
                .commodities
                .iter()
                .map(|entry| (entry.code.as_str(), entry.ticker.as_str())),
        )?,
    };
    let countries = read_country_lookup(&config.country_lookup_path)?;
    let allowed_series = read_series_allow_list(&config.series_list_path)?;

    let reference = ReferenceData::new(commodities, countries, allowed_series);
    reference.check_world_marker(&config.world_marker)?;
    Ok(reference)
}

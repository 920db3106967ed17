pub mod bulletin_reader;
pub mod consolidated_reader;
pub mod reference_reader;

pub use bulletin_reader::{BulletinReader, NormalizedTable};
pub use consolidated_reader::read_consolidated_table;
pub use reference_reader::{
    load_reference_data, read_commodity_mapping, read_country_lookup, read_series_allow_list,
};

use crate::error::Result;
use encoding_rs::WINDOWS_1252;
use std::path::Path;

/// Read a Latin-1 encoded text file. A UTF-8 byte order mark, when present,
/// takes precedence.
pub fn read_latin1(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_latin1(&bytes))
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

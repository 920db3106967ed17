/// Bulletin archive source
pub const DEFAULT_SOURCE_URL_TEMPLATE: &str =
    "https://comex.indec.gob.ar/files/zips/exports_{year}_M.zip";
pub const YEAR_PLACEHOLDER: &str = "{year}";
pub const ARCHIVE_FILE_TEMPLATE: &str = "exports_{year}_M.zip";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Archive member naming
pub const DEFAULT_SCHEMA_BREAK_YEAR: i32 = 2018;
pub const LEGACY_MEMBER_STEM: &str = "expom";
pub const REVISED_MEMBER_STEMS: [&str; 2] = ["exponm", "expopm"];
pub const MEMBER_EXTENSION: &str = ".csv";

/// Bulletin table layout
pub const BULLETIN_DELIMITER: u8 = b';';
pub const BULLETIN_COLUMN_COUNT: usize = 6;
pub const COMMODITY_CODE_WIDTH: usize = 8;
pub const DEFAULT_SUPPRESSION_MARKER: char = 's';

/// Country lookup columns
pub const LOOKUP_RAW_COUNTRY_COLUMN: &str = "ARG_PAIS_CO";
pub const LOOKUP_COUNTRY_CODE_COLUMN: &str = "COD_COUNTRY";

/// Series identifiers
pub const DEFAULT_NAMESPACE: &str = "INDEC";
pub const DEFAULT_WORLD_MARKER: &str = "WO";
pub const SERIES_KEY_SEPARATOR: char = '_';
pub const NAMESPACE_SEPARATOR: char = ':';

/// Output formatting
pub const SNAPSHOT_DELIMITER: u8 = b',';
pub const SNAPSHOT_HEADER: [&str; 4] = ["<cod>", "<data>", "<KGL>", "<FOB>"];
pub const SNAPSHOT_EXTENSION: &str = "ipv";
pub const DEFAULT_SNAPSHOT_PREFIX: &str = "historical_indec_exp";
pub const DEFAULT_CONSOLIDATED_FILE: &str = "final_exp_table.csv";
pub const VALUE_DECIMALS: usize = 3;

/// Directory and file defaults
pub const DEFAULT_STAGING_DIR: &str = "data/raw";
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";
pub const DEFAULT_OUTPUT_DIR: &str = "data/ipvs";
pub const DEFAULT_CURSOR_PATH: &str = "data/logs/update_log.json";
pub const DEFAULT_COUNTRY_LOOKUP_PATH: &str = "data/auxiliar/aux_17.csv";
pub const DEFAULT_SERIES_LIST_PATH: &str = "data/auxiliar/series_list.csv";
pub const DEFAULT_CONFIG_FILE: &str = "indec-ipv.toml";
pub const ENV_PREFIX: &str = "INDEC_IPV";

/// Processing defaults
pub const DEFAULT_LOOKBACK_YEARS: i32 = 3;

/// Reference commodity mapping (NCM code, ticker)
pub const DEFAULT_COMMODITIES: [(&str, &str); 6] = [
    ("01012100", "COS"),
    ("23040010", "SBM"),
    ("12019000", "SBS"),
    ("15071000", "SBO"),
    ("11010010", "WHM"),
    ("10019900", "WHS"),
];

use crate::error::{ProcessingError, Result};
use crate::utils::constants::*;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommodityEntry {
    #[validate(length(min = 1, max = 8))]
    pub code: String,

    #[validate(length(min = 1))]
    pub ticker: String,
}

/// Runtime settings, layered from defaults, an optional TOML file and
/// `INDEC_IPV_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(length(min = 1))]
    pub source_url_template: String,

    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,

    #[validate(range(min = 0, max = 20))]
    pub lookback_years: i32,

    #[validate(range(min = 1900, max = 2999))]
    pub schema_break_year: i32,

    #[validate(length(min = 1))]
    pub legacy_stem: String,

    #[validate(length(min = 1))]
    pub revised_stems: Vec<String>,

    #[validate(length(min = 1))]
    pub member_extension: String,

    #[validate(length(min = 1))]
    pub namespace: String,

    #[validate(length(min = 1))]
    pub world_marker: String,

    #[validate(length(equal = 1))]
    pub suppression_marker: String,

    pub staging_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub output_dir: PathBuf,
    pub cursor_path: PathBuf,
    pub country_lookup_path: PathBuf,
    pub series_list_path: PathBuf,
    pub commodity_mapping_path: Option<PathBuf>,

    #[validate(nested)]
    pub commodities: Vec<CommodityEntry>,

    #[validate(length(min = 1))]
    pub snapshot_prefix: String,

    #[validate(length(min = 1))]
    pub consolidated_file_name: String,

    pub require_new_period: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url_template: DEFAULT_SOURCE_URL_TEMPLATE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            schema_break_year: DEFAULT_SCHEMA_BREAK_YEAR,
            legacy_stem: LEGACY_MEMBER_STEM.to_string(),
            revised_stems: REVISED_MEMBER_STEMS.iter().map(|s| s.to_string()).collect(),
            member_extension: MEMBER_EXTENSION.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            world_marker: DEFAULT_WORLD_MARKER.to_string(),
            suppression_marker: DEFAULT_SUPPRESSION_MARKER.to_string(),
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            processed_dir: PathBuf::from(DEFAULT_PROCESSED_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            cursor_path: PathBuf::from(DEFAULT_CURSOR_PATH),
            country_lookup_path: PathBuf::from(DEFAULT_COUNTRY_LOOKUP_PATH),
            series_list_path: PathBuf::from(DEFAULT_SERIES_LIST_PATH),
            commodity_mapping_path: None,
            commodities: DEFAULT_COMMODITIES
                .iter()
                .map(|(code, ticker)| CommodityEntry {
                    code: code.to_string(),
                    ticker: ticker.to_string(),
                })
                .collect(),
            snapshot_prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
            consolidated_file_name: DEFAULT_CONSOLIDATED_FILE.to_string(),
            require_new_period: true,
        }
    }
}

impl PipelineConfig {
    /// Load settings. An explicit `path` must exist; without one the
    /// default file is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(path) => File::from(path).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let settings = Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("revised_stems"),
            )
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Field validation plus the cross-field rules derive cannot express.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if !self.source_url_template.contains(YEAR_PLACEHOLDER) {
            return Err(ProcessingError::Config(format!(
                "source_url_template must contain {}",
                YEAR_PLACEHOLDER
            )));
        }

        if self.namespace.contains(NAMESPACE_SEPARATOR) {
            return Err(ProcessingError::Config(format!(
                "namespace must not contain '{}'",
                NAMESPACE_SEPARATOR
            )));
        }

        if self.world_marker.contains(SERIES_KEY_SEPARATOR) {
            return Err(ProcessingError::Config(format!(
                "world_marker must not contain '{}'",
                SERIES_KEY_SEPARATOR
            )));
        }

        if self.revised_stems.iter().any(|s| s.is_empty()) {
            return Err(ProcessingError::Config(
                "revised_stems must not contain empty entries".to_string(),
            ));
        }

        Ok(())
    }

    pub fn suppression_marker(&self) -> char {
        self.suppression_marker
            .chars()
            .next()
            .unwrap_or(DEFAULT_SUPPRESSION_MARKER)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn consolidated_path(&self) -> PathBuf {
        self.processed_dir.join(&self.consolidated_file_name)
    }

    /// Inclusive year window ending at `current_year`.
    pub fn year_window(&self, current_year: i32) -> Vec<i32> {
        ((current_year - self.lookback_years)..=current_year).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.suppression_marker(), 's');
        assert_eq!(config.commodities.len(), 6);
    }

    #[test]
    fn test_year_window() {
        let config = PipelineConfig::default();
        assert_eq!(config.year_window(2024), vec![2021, 2022, 2023, 2024]);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "namespace = \"TEST\"")?;
        writeln!(file, "lookback_years = 1")?;
        writeln!(file, "[[commodities]]")?;
        writeln!(file, "code = \"01012100\"")?;
        writeln!(file, "ticker = \"COS\"")?;
        file.flush()?;

        let config = PipelineConfig::load(Some(file.path()))?;
        assert_eq!(config.namespace, "TEST");
        assert_eq!(config.lookback_years, 1);
        assert_eq!(config.commodities.len(), 1);
        assert_eq!(config.world_marker, DEFAULT_WORLD_MARKER);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = PipelineConfig::load(Some(Path::new("/nonexistent/indec-ipv.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let config = PipelineConfig {
            source_url_template: "https://example.org/exports.zip".to_string(),
            ..PipelineConfig::default()
        };
        assert!(config.check().is_err());

        let config = PipelineConfig {
            world_marker: "W_O".to_string(),
            ..PipelineConfig::default()
        };
        assert!(config.check().is_err());

        let config = PipelineConfig {
            suppression_marker: "ss".to_string(),
            ..PipelineConfig::default()
        };
        assert!(config.check().is_err());
    }
}

pub mod fetcher;
pub mod resolver;
pub mod staging;

pub use fetcher::{ArchiveFetcher, DirectoryArchiveFetcher, HttpArchiveFetcher, StaticArchiveFetcher};
pub use resolver::{ArchiveMemberResolver, ResolvedMember};
pub use staging::StagingArea;

use crate::settings::PipelineConfig;
use crate::utils::filename::year_suffix;
use serde::{Deserialize, Serialize};

/// Member naming conventions used by the yearly export archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberNaming {
    /// Before the schema break: `expomYY.csv`
    Legacy,
    /// From the schema break on: `exponmYY.csv` or `expopmYY.csv`
    Revised,
}

impl MemberNaming {
    pub fn display_name(&self) -> &'static str {
        match self {
            MemberNaming::Legacy => "legacy",
            MemberNaming::Revised => "revised",
        }
    }
}

impl std::fmt::Display for MemberNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Selects the naming convention for a year and knows the stems of each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingSchedule {
    schema_break_year: i32,
    legacy_stems: Vec<String>,
    revised_stems: Vec<String>,
    extension: String,
}

impl NamingSchedule {
    pub fn new(
        schema_break_year: i32,
        legacy_stem: impl Into<String>,
        revised_stems: Vec<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            schema_break_year,
            legacy_stems: vec![legacy_stem.into()],
            revised_stems,
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.schema_break_year,
            config.legacy_stem.clone(),
            config.revised_stems.clone(),
            config.member_extension.clone(),
        )
    }

    pub fn naming_for(&self, year: i32) -> MemberNaming {
        if year < self.schema_break_year {
            MemberNaming::Legacy
        } else {
            MemberNaming::Revised
        }
    }

    pub fn stems(&self, naming: MemberNaming) -> &[String] {
        match naming {
            MemberNaming::Legacy => &self.legacy_stems,
            MemberNaming::Revised => &self.revised_stems,
        }
    }

    /// Accepted member name endings for a year, e.g. `exponm24.csv`.
    pub fn member_suffixes(&self, year: i32) -> Vec<String> {
        let suffix = year_suffix(year);
        self.stems(self.naming_for(year))
            .iter()
            .map(|stem| format!("{}{}{}", stem, suffix, self.extension))
            .collect()
    }

    pub fn matches(&self, year: i32, member_name: &str) -> bool {
        self.member_suffixes(year)
            .iter()
            .any(|suffix| member_name.ends_with(suffix.as_str()))
    }
}

impl Default for NamingSchedule {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearStatus {
    Loaded { member: String },
    NotPublished,
    NoMatchingMember,
    Failed(String),
}

impl fmt::Display for YearStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearStatus::Loaded { member } => write!(f, "loaded {}", member),
            YearStatus::NotPublished => write!(f, "not published"),
            YearStatus::NoMatchingMember => write!(f, "no matching member"),
            YearStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// What one year of the window contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSummary {
    pub year: i32,
    pub status: YearStatus,
    pub rows_read: usize,
    pub rows_rejected: usize,
    pub unknown_commodity: usize,
    pub suppressed: usize,
    pub unmatched_country: usize,
    pub rows_kept: usize,
}

impl YearSummary {
    pub fn new(year: i32, status: YearStatus) -> Self {
        Self {
            year,
            status,
            rows_read: 0,
            rows_rejected: 0,
            unknown_commodity: 0,
            suppressed: 0,
            unmatched_country: 0,
            rows_kept: 0,
        }
    }

    pub fn contributed(&self) -> bool {
        self.rows_kept > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub years: Vec<YearSummary>,
    pub consolidated_rows: usize,
    pub missing_country: usize,
    pub outside_catalog: usize,
    pub series_points: usize,
    pub world_points: usize,
}

impl RunReport {
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Bulletin Run Report ===\n");
        for year in &self.years {
            summary.push_str(&format!("{}: {}\n", year.year, year.status));
            if matches!(year.status, YearStatus::Loaded { .. }) {
                summary.push_str(&format!(
                    "  read {} | rejected {} | unknown commodity {} | suppressed {} | unmatched country {} | kept {}\n",
                    year.rows_read,
                    year.rows_rejected,
                    year.unknown_commodity,
                    year.suppressed,
                    year.unmatched_country,
                    year.rows_kept
                ));
            }
        }

        summary.push_str(&format!("Consolidated Rows: {}\n", self.consolidated_rows));
        if self.consolidated_rows > 0 {
            summary.push_str(&format!(
                "Excluded From Series: {} without country, {} outside catalog\n",
                self.missing_country, self.outside_catalog
            ));
            summary.push_str(&format!(
                "Series Rows: {} ({} world)\n",
                self.series_points + self.world_points,
                self.world_points
            ));
        }

        summary
    }
}

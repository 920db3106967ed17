use crate::models::Period;
use crate::utils::constants::{ARCHIVE_FILE_TEMPLATE, SNAPSHOT_EXTENSION, YEAR_PLACEHOLDER};
use std::path::{Path, PathBuf};

/// Snapshot file name with format: {prefix}_{YYYY}_{MM}.ipv
pub fn snapshot_file_name(prefix: &str, period: Period) -> String {
    format!(
        "{}_{:04}_{:02}.{}",
        prefix, period.year, period.month, SNAPSHOT_EXTENSION
    )
}

pub fn snapshot_path(output_dir: &Path, prefix: &str, period: Period) -> PathBuf {
    output_dir.join(snapshot_file_name(prefix, period))
}

/// Staged member name: the original file name prefixed by its year.
///
/// Any directory components of the archive entry are dropped.
pub fn staged_member_name(year: i32, member_name: &str) -> String {
    let base = member_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(member_name);
    format!("{}_{}", year, base)
}

/// Local archive name for a year, e.g. exports_2024_M.zip
pub fn archive_file_name(year: i32) -> String {
    ARCHIVE_FILE_TEMPLATE.replace(YEAR_PLACEHOLDER, &year.to_string())
}

/// Two-digit year suffix used in member names.
pub fn year_suffix(year: i32) -> String {
    format!("{:02}", year.rem_euclid(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_file_name() {
        let name = snapshot_file_name("historical_indec_exp", Period::new(2024, 3).unwrap());
        assert_eq!(name, "historical_indec_exp_2024_03.ipv");
    }

    #[test]
    fn test_staged_member_name_strips_directories() {
        assert_eq!(staged_member_name(2024, "exponm24.csv"), "2024_exponm24.csv");
        assert_eq!(
            staged_member_name(2016, "datos/expom16.csv"),
            "2016_expom16.csv"
        );
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name(2021), "exports_2021_M.zip");
    }

    #[test]
    fn test_year_suffix() {
        assert_eq!(year_suffix(2024), "24");
        assert_eq!(year_suffix(2005), "05");
        assert_eq!(year_suffix(2100), "00");
    }
}

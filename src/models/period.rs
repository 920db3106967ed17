use crate::error::{ProcessingError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bulletin month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ProcessingError::InvalidFormat(format!(
                "Month must be between 1 and 12, got: {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// The following month; December rolls into January of the next year.
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps_december() {
        let period = Period::new(2023, 12).unwrap();
        assert_eq!(period.next(), Period::new(2024, 1).unwrap());
    }

    #[test]
    fn test_next_within_year() {
        let period = Period::new(2024, 5).unwrap();
        assert_eq!(period.next(), Period::new(2024, 6).unwrap());
    }

    #[test]
    fn test_invalid_month() {
        assert!(Period::new(2024, 0).is_err());
        assert!(Period::new(2024, 13).is_err());
    }

    #[test]
    fn test_first_day_and_display() {
        let period = Period::new(2024, 3).unwrap();
        assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(period.to_string(), "2024-03");
    }
}

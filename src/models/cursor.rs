use crate::error::{ProcessingError, Result};
use crate::models::Period;
use serde::{Deserialize, Serialize};

/// The latest period already incorporated into published snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCursor {
    last_updated: Period,
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorDocument {
    #[serde(rename = "LAST_UPDATED")]
    last_updated: CursorEntry,
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorEntry {
    #[serde(rename = "MONTH")]
    month: String,
    #[serde(rename = "YEAR")]
    year: String,
}

impl UpdateCursor {
    pub fn new(last_updated: Period) -> Self {
        Self { last_updated }
    }

    pub fn last_updated(&self) -> Period {
        self.last_updated
    }

    /// Period the next snapshot is labelled with.
    pub fn next_period(&self) -> Period {
        self.last_updated.next()
    }

    /// Cursor after the next period has been published.
    pub fn advanced(&self) -> Self {
        Self::new(self.next_period())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CursorDocument = serde_json::from_str(json)
            .map_err(|e| ProcessingError::Cursor(format!("Malformed cursor document: {}", e)))?;

        let month = document
            .last_updated
            .month
            .trim()
            .parse::<u32>()
            .map_err(|_| {
                ProcessingError::Cursor(format!(
                    "Invalid MONTH value: '{}'",
                    document.last_updated.month
                ))
            })?;
        let year = document
            .last_updated
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| {
                ProcessingError::Cursor(format!(
                    "Invalid YEAR value: '{}'",
                    document.last_updated.year
                ))
            })?;

        let period = Period::new(year, month).map_err(|e| ProcessingError::Cursor(e.to_string()))?;
        Ok(Self::new(period))
    }

    pub fn to_json_string(&self) -> Result<String> {
        let document = CursorDocument {
            last_updated: CursorEntry {
                month: format!("{:02}", self.last_updated.month),
                year: format!("{:04}", self.last_updated.year),
            },
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

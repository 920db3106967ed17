use crate::error::{ProcessingError, Result};
use crate::models::UpdateCursor;
use crate::writers::persist_atomically;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The persisted `update_log.json` document.
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable cursor is fatal.
    pub fn load(&self) -> Result<UpdateCursor> {
        let json = fs::read_to_string(&self.path).map_err(|e| {
            ProcessingError::Cursor(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        UpdateCursor::from_json_str(&json)
    }

    pub fn commit(&self, cursor: &UpdateCursor) -> Result<()> {
        let json = cursor.to_json_string()?;
        persist_atomically(&self.path, |w| {
            w.write_all(json.as_bytes())?;
            Ok(())
        })?;
        info!(
            "Advanced update cursor to {} in {}",
            cursor.last_updated(),
            self.path.display()
        );
        Ok(())
    }
}

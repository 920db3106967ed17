use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding the archive members extracted during one run.
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create the directory if needed and remove anything a previous run
    /// left behind.
    pub fn prepare(root: impl Into<PathBuf>) -> Result<Self> {
        let staging = Self { root: root.into() };
        fs::create_dir_all(&staging.root)?;
        let removed = staging.clear()?;
        debug!(
            "Prepared staging area {} ({} stale entries removed)",
            staging.root.display(),
            removed
        );
        Ok(staging)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn member_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            removed += 1;
        }
        Ok(removed)
    }

    pub fn staged_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("raw");
        let staging = StagingArea::prepare(&root)?;
        assert!(staging.path().is_dir());
        assert!(staging.staged_files()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_prepare_removes_stale_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("raw");
        fs::create_dir_all(root.join("nested"))?;
        fs::write(root.join("2023_exponm23.csv"), "stale")?;
        fs::write(root.join("nested").join("old.csv"), "stale")?;

        let staging = StagingArea::prepare(&root)?;
        assert!(staging.staged_files()?.is_empty());
        assert!(!root.join("nested").exists());
        Ok(())
    }
}

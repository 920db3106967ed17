pub mod consolidated_writer;
pub mod cursor_store;
pub mod snapshot_writer;

pub use consolidated_writer::write_consolidated_table;
pub use cursor_store::CursorStore;
pub use snapshot_writer::SnapshotWriter;

use crate::error::Result;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write through a temporary file in the destination directory and rename
/// it into place, so readers never observe a partial file.
pub(crate) fn persist_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}

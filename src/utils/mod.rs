pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{snapshot_file_name, snapshot_path, staged_member_name, year_suffix};
pub use progress::ProgressReporter;

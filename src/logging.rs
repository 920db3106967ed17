use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over the verbosity flags.
/// With `log_file` the events are appended there instead of stderr.
pub fn init(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .ok();
        }
        None => {
            builder.with_writer(std::io::stderr).try_init().ok();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_repeated_init_is_ignored() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("logs").join("indec-ipv.log");

        init(false, true, Some(&path))?;
        init(true, false, None)?;

        assert!(path.exists());
        Ok(())
    }
}

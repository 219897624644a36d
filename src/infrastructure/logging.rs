//! Tracing setup.
//!
//! The terminal belongs to the UI, so events are written to a file. The
//! filter comes from `RUST_LOG`, defaulting to `usrdir=debug`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "usrdir=debug";

/// Installs a global subscriber appending to `path`.
///
/// If a global subscriber is already installed it stays in place and a
/// warning is sent to it; the file is still created and `Ok` returned.
pub fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    if let Err(err) = installed {
        tracing::warn!(path = %path.display(), error = %err, "keeping existing tracing subscriber");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usrdir.log");

        init_logging(&path).unwrap();
        tracing::info!("hello from test");

        assert!(path.exists());
    }

    #[test]
    fn test_second_init_keeps_first_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");

        init_logging(&first).unwrap();
        init_logging(&second).unwrap();

        assert!(second.exists());
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("usrdir.log");

        assert!(init_logging(&path).is_err());
    }
}

use crate::domain::{UserDraft, ValidationError, validate_draft};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "usrdir.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("seed entry {index}: {source}")]
    InvalidSeed {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

/// Runtime settings, read from `usrdir.json` when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulated latency of every backend request
    pub latency_ms: u64,
    pub toast_duration_ms: u64,
    pub max_toasts: usize,
    /// Fail every Nth backend request; `None` never fails
    pub fail_every: Option<u32>,
    /// Where tracing output goes; logging is off when unset
    pub log_file: Option<PathBuf>,
    pub seed: Vec<UserDraft>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latency_ms: 1000,
            toast_duration_ms: 2000,
            max_toasts: 5,
            fail_every: None,
            log_file: None,
            seed: vec![
                UserDraft::new("John Doe", "john@example.com"),
                UserDraft::new("Jane Doe", "jane@example.com"),
            ],
        }
    }
}

impl Settings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

pub struct ConfigRepository;

impl ConfigRepository {
    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        let settings: Settings =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        for (index, draft) in settings.seed.iter().enumerate() {
            validate_draft(draft).map_err(|source| ConfigError::InvalidSeed { index, source })?;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ConfigRepository::load(dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.latency(), Duration::from_millis(1000));
        assert_eq!(settings.seed.len(), 2);
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let file = write_config(r#"{ "latency_ms": 50, "fail_every": 3 }"#);
        let settings = ConfigRepository::load(file.path()).unwrap();

        assert_eq!(settings.latency_ms, 50);
        assert_eq!(settings.fail_every, Some(3));
        assert_eq!(settings.toast_duration_ms, 2000);
        assert_eq!(settings.seed, Settings::default().seed);
    }

    #[test]
    fn test_seed_override() {
        let file = write_config(r#"{ "seed": [ { "username": "Ann", "email": "ann@x.com" } ] }"#);
        let settings = ConfigRepository::load(file.path()).unwrap();

        assert_eq!(settings.seed, [UserDraft::new("Ann", "ann@x.com")]);
    }

    #[test]
    fn test_malformed_json() {
        let file = write_config("{ latency_ms: ");
        let err = ConfigRepository::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_seed_entry() {
        let file = write_config(
            r#"{ "seed": [ { "username": "Ann", "email": "ann@x.com" }, { "username": "", "email": "b@x" } ] }"#,
        );
        let err = ConfigRepository::load(file.path()).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidSeed {
                index: 1,
                source: ValidationError::EmptyUsername
            }
        ));
    }
}

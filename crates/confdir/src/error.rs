//! Error type for every loader operation.
//!
//! Each variant keeps the path (or registered filename) it failed on and the
//! underlying I/O or YAML error as its `source`, so callers can print a useful
//! chain without re-deriving which file was involved.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`YamlLoader`](crate::YamlLoader).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The home directory could not be determined from the environment.
    #[error("could not determine home directory")]
    NoHomeDir,

    /// The root config directory could not be created.
    #[error("failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file registered with `error_on_missing` does not exist and has no example.
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    /// The config file exists but could not be opened or read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An example file or a saved config could not be written.
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML content is malformed or does not match the target struct.
    #[error("failed to parse config YAML {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The in-memory struct could not be serialized to YAML.
    #[error("failed to serialize config {filename}: {source}")]
    Serialize {
        filename: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The filename was never passed to `register_file`.
    #[error("config file {0:?} is not registered")]
    Unregistered(String),

    /// The caller still holds a borrow of the target struct.
    #[error("config target for {0:?} is already borrowed")]
    TargetBusy(String),

    /// The filename is absolute or climbs out of the root with `..`.
    #[error("config filename {0:?} must be a relative path inside the config directory")]
    InvalidFilename(String),

    /// The struct does not survive a YAML round-trip, so overlaying the file
    /// would reset fields that `Serialize` leaves out.
    #[error("config target for {path} would lose fields that are not serialized")]
    LossyTarget { path: PathBuf },
}

impl ConfigError {
    /// Returns `true` for the "required file is missing" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_not_found() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/home/u/.tools/config.yml"),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_variants_are_not_not_found() {
        assert!(!ConfigError::NoHomeDir.is_not_found());
        assert!(!ConfigError::Unregistered("x.yml".to_string()).is_not_found());
        assert!(!ConfigError::InvalidFilename("/x.yml".to_string()).is_not_found());
        let read = ConfigError::Read {
            path: PathBuf::from("/tmp/x.yml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        // An I/O NotFound during read is a read failure, not the policy error.
        assert!(!read.is_not_found());
    }

    #[test]
    fn test_display_includes_path() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/home/u/.tools/config.yml"),
        };
        assert_eq!(
            err.to_string(),
            "config file not found: /home/u/.tools/config.yml"
        );
    }

    #[test]
    fn test_unregistered_display_quotes_filename() {
        let err = ConfigError::Unregistered("missing.yml".to_string());
        assert_eq!(err.to_string(), "config file \"missing.yml\" is not registered");
    }

    #[test]
    fn test_invalid_filename_display_quotes_filename() {
        let err = ConfigError::InvalidFilename("../x.yml".to_string());
        assert_eq!(
            err.to_string(),
            "config filename \"../x.yml\" must be a relative path inside the config directory"
        );
    }

    #[test]
    fn test_io_source_is_exposed() {
        use std::error::Error as _;

        let err = ConfigError::Write {
            path: PathBuf::from("/tmp/x.yml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = err.source().expect("write error must carry its io source");
        assert_eq!(source.to_string(), "denied");
    }
}

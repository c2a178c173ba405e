//! The YAML loader: directory preparation, per-file policy, load and save.
//!
//! Files live at `HOME/<base_folder>/<filename>`, or directly under `HOME`
//! when `base_folder` is empty:
//!
//! ```text
//! ~/.tools/                 (created with mode 0700 when base_folder = ".tools")
//!   ├─ .secret.yml          (written from example content when missing, mode 0700)
//!   └─ config.yml           (skipped when missing, unless error_on_missing)
//! ```
//!
//! # Per-file decision during `load_all`
//!
//! | File on disk | Example given | `error_on_missing` | Result                    |
//! |--------------|---------------|--------------------|---------------------------|
//! | present      | –             | –                  | load                      |
//! | absent       | yes           | –                  | write example, then load  |
//! | absent       | no            | true               | `ConfigError::NotFound`   |
//! | absent       | no            | false              | skip, struct untouched    |
//!
//! Loading overlays the document onto the struct's current value, so keys
//! missing from the file keep whatever the caller set before loading.
//!
//! Filenames must stay inside the root: absolute names and names with a
//! `..` component are rejected with [`ConfigError::InvalidFilename`] before any
//! file is touched.
//!
//! The first error stops processing.  Files handled before it keep their
//! loaded values; files after it are not touched.

use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn, Level};

use crate::error::ConfigError;
use crate::options::{LogFn, LoaderOptions, RegisterOptions};
use crate::registry::{Registration, Registry, Shared, TargetError};

/// Permission bits for the root directory and example files (owner only).
#[cfg(unix)]
const PRIVATE_MODE: u32 = 0o700;

/// What `load_all` did with one registered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file existed and was read into its struct.
    Loaded,
    /// The file was missing, written from its example, then read.
    CreatedFromExample,
    /// The file was missing and optional; the struct was left alone.
    Skipped,
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileOutcome::Loaded => "loaded",
            FileOutcome::CreatedFromExample => "created from example",
            FileOutcome::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Per-file outcomes of a successful `load_all`, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    outcomes: Vec<(String, FileOutcome)>,
}

impl LoadReport {
    pub fn outcome(&self, filename: &str) -> Option<FileOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, outcome)| *outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FileOutcome)> {
        self.outcomes.iter().map(|(name, outcome)| (name.as_str(), *outcome))
    }

    /// Number of files that ended with `outcome`.
    pub fn count(&self, outcome: FileOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Loads and saves a set of registered YAML files under one root directory.
pub struct YamlLoader {
    base_folder: String,
    root: PathBuf,
    log_fn: Option<LogFn>,
    registry: Registry,
}

impl YamlLoader {
    /// Creates a loader rooted at `HOME/base_folder` (or `HOME` when empty).
    ///
    /// Nothing is touched on disk until [`load_all`](Self::load_all).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDir`] when the home provider in `options`
    /// cannot resolve a home directory.
    pub fn new(
        base_folder: impl Into<String>,
        options: LoaderOptions,
    ) -> Result<Self, ConfigError> {
        let base_folder = base_folder.into();
        let home = options.home.home_dir().ok_or(ConfigError::NoHomeDir)?;
        let root = if base_folder.is_empty() {
            home
        } else {
            home.join(&base_folder)
        };

        Ok(Self {
            base_folder,
            root,
            log_fn: options.log_fn,
            registry: Registry::new(),
        })
    }

    /// Creates a loader with default options (`$HOME`, no log callback).
    pub fn with_defaults(base_folder: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(base_folder, LoaderOptions::default())
    }

    /// Registers `target` to be filled from `filename` (relative to the root).
    ///
    /// Registering the same filename again replaces the earlier record.
    ///
    /// A load overlays the file onto the struct's YAML form and decodes the
    /// result.  Fields that `Serialize` leaves out (`#[serde(skip)]`,
    /// `skip_serializing`) cannot survive that, so when such a field holds
    /// anything other than what decoding would rebuild, the load fails with
    /// [`ConfigError::LossyTarget`] and the struct is left as it was.
    pub fn register_file<T>(
        &mut self,
        filename: impl Into<String>,
        target: Shared<T>,
        options: RegisterOptions,
    ) where
        T: Serialize + DeserializeOwned + PartialEq + 'static,
    {
        self.registry.register(filename, target, options);
    }

    /// The resolved directory all registered filenames are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_folder(&self) -> &str {
        &self.base_folder
    }

    /// Path a registered (or would-be) filename resolves to under the root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFilename`] for empty or absolute names and
    /// for names containing a `..` component.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, ConfigError> {
        Ok(self.root.join(relative_name(filename)?))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Loads every registered file, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first of: [`ConfigError::CreateDir`],
    /// [`ConfigError::InvalidFilename`], [`ConfigError::Write`] (example
    /// creation), [`ConfigError::NotFound`], [`ConfigError::Read`],
    /// [`ConfigError::Parse`], [`ConfigError::LossyTarget`],
    /// [`ConfigError::TargetBusy`].
    pub fn load_all(&self) -> Result<LoadReport, ConfigError> {
        self.prepare_root()?;

        let mut report = LoadReport::default();
        for registration in self.registry.iter() {
            let outcome = self.load_registration(registration)?;
            report.outcomes.push((registration.filename.clone(), outcome));
        }
        Ok(report)
    }

    /// Applies the `load_all` decision to a single registered file.
    ///
    /// # Errors
    ///
    /// As [`load_all`](Self::load_all), plus [`ConfigError::Unregistered`].
    pub fn load_file(&self, filename: &str) -> Result<FileOutcome, ConfigError> {
        let registration = self
            .registry
            .get(filename)
            .ok_or_else(|| ConfigError::Unregistered(filename.to_string()))?;

        self.prepare_root()?;
        self.load_registration(registration)
    }

    /// Writes the current value of `filename`'s struct back to disk as YAML.
    ///
    /// The file is created or truncated with default permissions.  The root
    /// directory is not created here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unregistered`], [`ConfigError::InvalidFilename`],
    /// [`ConfigError::Serialize`], [`ConfigError::TargetBusy`], or
    /// [`ConfigError::Write`].
    pub fn save_config(&self, filename: &str) -> Result<(), ConfigError> {
        let registration = self
            .registry
            .get(filename)
            .ok_or_else(|| ConfigError::Unregistered(filename.to_string()))?;

        let path = self.path_for(filename)?;
        self.log(Level::DEBUG, format_args!("saving config: {}", path.display()));

        let content = registration
            .target
            .to_yaml()
            .map_err(|e| target_error(e, filename, &path))?;

        fs::write(&path, content).map_err(|source| {
            self.log(Level::WARN, format_args!("failed to write {}: {source}", path.display()));
            ConfigError::Write {
                path: path.clone(),
                source,
            }
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    /// Ensures the root exists.  No-op when loading straight from `HOME`.
    fn prepare_root(&self) -> Result<(), ConfigError> {
        if self.base_folder.is_empty() {
            return Ok(());
        }

        create_private_dir(&self.root).map_err(|source| {
            self.log(
                Level::WARN,
                format_args!("prepare folder {} failed: {source}", self.root.display()),
            );
            ConfigError::CreateDir {
                path: self.root.clone(),
                source,
            }
        })
    }

    fn load_registration(&self, registration: &Registration) -> Result<FileOutcome, ConfigError> {
        let filename = registration.filename.as_str();
        let path = self.path_for(filename).map_err(|err| {
            self.log(Level::WARN, format_args!("refusing to load {filename:?}: {err}"));
            err
        })?;
        self.log(Level::DEBUG, format_args!("loading file: {}", path.display()));

        let mut outcome = FileOutcome::Loaded;
        if !file_exists(&path) {
            if let Some(example) = registration.options.example() {
                self.log(Level::INFO, format_args!("creating example config: {}", path.display()));
                write_private_file(&path, example).map_err(|source| ConfigError::Write {
                    path: path.clone(),
                    source,
                })?;
                outcome = FileOutcome::CreatedFromExample;
            } else if registration.options.is_error_on_missing() {
                self.log(Level::WARN, format_args!("required config missing: {}", path.display()));
                return Err(ConfigError::NotFound { path });
            } else {
                self.log(Level::DEBUG, format_args!("skipping missing config: {}", path.display()));
                return Ok(FileOutcome::Skipped);
            }
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        registration.target.apply_yaml(&content).map_err(|e| {
            let err = target_error(e, filename, &path);
            self.log(Level::WARN, format_args!("unexpected error when loading {filename}: {err}"));
            err
        })?;

        Ok(outcome)
    }

    /// Emits through `tracing` and, when set, the caller's log callback.
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if level == Level::WARN {
            warn!("{args}");
        } else if level == Level::INFO {
            info!("{args}");
        } else {
            debug!("{args}");
        }

        if let Some(log_fn) = &self.log_fn {
            log_fn(args);
        }
    }
}

impl fmt::Debug for YamlLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlLoader")
            .field("base_folder", &self.base_folder)
            .field("root", &self.root)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn target_error(err: TargetError, filename: &str, path: &Path) -> ConfigError {
    match err {
        TargetError::Busy => ConfigError::TargetBusy(filename.to_string()),
        TargetError::Encode(source) => ConfigError::Serialize {
            filename: filename.to_string(),
            source,
        },
        TargetError::Decode(source) => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        TargetError::Lossy => ConfigError::LossyTarget {
            path: path.to_path_buf(),
        },
    }
}

/// Accepts plain relative names only: no root, drive prefix, or `..`.
fn relative_name(filename: &str) -> Result<&Path, ConfigError> {
    let path = Path::new(filename);
    let inside_root = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)));

    if inside_root {
        Ok(path)
    } else {
        Err(ConfigError::InvalidFilename(filename.to_string()))
    }
}

/// Only "does not exist" counts as missing; other stat failures surface on read.
fn file_exists(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}

fn create_private_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PRIVATE_MODE);
    }
    builder.create(path)
}

fn write_private_file(path: &Path, content: &str) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PRIVATE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())
}

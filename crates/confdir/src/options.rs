//! Loader-level and per-file options.
//!
//! Both option types are plain data with builder-style setters:
//!
//! | Option                               | Default        |
//! |--------------------------------------|----------------|
//! | [`LoaderOptions::with_log_fn`]       | silent         |
//! | [`LoaderOptions::with_home`]         | [`EnvHome`]    |
//! | [`RegisterOptions::with_example`]    | no example     |
//! | [`RegisterOptions::error_on_missing`]| skip if absent |

use std::fmt;

use crate::home::{EnvHome, HomeDir};

/// Diagnostic callback.  Receives one already-formatted message per step.
pub type LogFn = Box<dyn Fn(fmt::Arguments<'_>)>;

/// Options applied once when constructing a [`YamlLoader`](crate::YamlLoader).
pub struct LoaderOptions {
    pub(crate) log_fn: Option<LogFn>,
    pub(crate) home: Box<dyn HomeDir>,
}

impl LoaderOptions {
    /// Reports every internal step through `f` in addition to `tracing`.
    pub fn with_log_fn(mut self, f: impl Fn(fmt::Arguments<'_>) + 'static) -> Self {
        self.log_fn = Some(Box::new(f));
        self
    }

    /// Resolves the home directory through `home` instead of `$HOME`.
    pub fn with_home(mut self, home: impl HomeDir + 'static) -> Self {
        self.home = Box::new(home);
        self
    }
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            log_fn: None,
            home: Box::new(EnvHome),
        }
    }
}

impl fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("log_fn", &self.log_fn.as_ref().map(|_| "<fn>"))
            .field("home", &self.home.home_dir())
            .finish()
    }
}

/// Load policy for one registered file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    pub(crate) example_content: Option<String>,
    pub(crate) error_on_missing: bool,
}

impl RegisterOptions {
    /// Writes `content` verbatim when the file is missing, then loads it.
    pub fn with_example(mut self, content: impl Into<String>) -> Self {
        self.example_content = Some(content.into());
        self
    }

    /// Fails `load_all` with a not-found error when the file is missing and
    /// no example content was given.
    pub fn error_on_missing(mut self) -> Self {
        self.error_on_missing = true;
        self
    }

    /// The example content, treating an empty string as "no example".
    pub fn example(&self) -> Option<&str> {
        self.example_content.as_deref().filter(|c| !c.is_empty())
    }

    pub fn is_error_on_missing(&self) -> bool {
        self.error_on_missing
    }
}

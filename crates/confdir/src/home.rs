//! Home directory resolution.
//!
//! The loader never reads `$HOME` itself; it asks a [`HomeDir`] provider.
//! Production code uses [`EnvHome`], while tests hand in a [`FixedHome`]
//! pointing at a scratch directory so the real environment is never touched.

use std::path::PathBuf;

/// Trait abstracting where the user's home directory lives.
#[cfg_attr(test, mockall::automock)]
pub trait HomeDir {
    /// Returns the home directory, or `None` when it cannot be determined.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Reads the home directory from the process environment.
///
/// - Unix / macOS: `$HOME`
/// - Windows: `$HOME`, falling back to `%USERPROFILE%`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvHome;

impl HomeDir for EnvHome {
    fn home_dir(&self) -> Option<PathBuf> {
        let home = std::env::var_os("HOME").filter(|h| !h.is_empty());

        #[cfg(target_os = "windows")]
        let home = home.or_else(|| std::env::var_os("USERPROFILE").filter(|h| !h.is_empty()));

        home.map(PathBuf::from)
    }
}

/// A home directory fixed at construction time.
#[derive(Debug, Clone)]
pub struct FixedHome(pub PathBuf);

impl FixedHome {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl HomeDir for FixedHome {
    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

//! # confdir
//!
//! Keeps a set of YAML configuration files under one directory relative to
//! the user's home (for example `~/.tools/`), and maps each file onto a typed
//! struct owned by the caller.
//!
//! # How it fits together
//!
//! - **`home`** – Where is "home"?  The [`HomeDir`] trait resolves it.  The
//!   default reads `$HOME`; tests inject a fixed directory instead.
//!
//! - **`options`** – Plain data structs that configure the loader
//!   ([`LoaderOptions`]) and each registered file ([`RegisterOptions`]).
//!
//! - **`registry`** – The ordered filename → registration table.  Each entry
//!   holds a shared handle to the caller's struct plus its load policy.
//!
//! - **`loader`** – [`YamlLoader`], which prepares the directory, decides per
//!   file whether to create an example, skip, or fail, and reads/writes YAML.
//!
//! ```no_run
//! use std::{cell::RefCell, rc::Rc};
//! use serde::{Deserialize, Serialize};
//! use confdir::{LoaderOptions, RegisterOptions, YamlLoader};
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! struct Secret {
//!     username: String,
//!     password: String,
//! }
//!
//! let mut loader = YamlLoader::new(".tools", LoaderOptions::default())?;
//! let secret = Rc::new(RefCell::new(Secret::default()));
//! loader.register_file(
//!     ".secret.yml",
//!     Rc::clone(&secret),
//!     RegisterOptions::default().with_example("username: a\npassword: b\n"),
//! );
//! loader.load_all()?;
//! assert_eq!(secret.borrow().username, "a");
//! # Ok::<(), confdir::ConfigError>(())
//! ```

pub mod error;
pub mod home;
pub mod loader;
pub mod options;
pub mod registry;

pub use error::ConfigError;
pub use home::{EnvHome, FixedHome, HomeDir};
pub use loader::{FileOutcome, LoadReport, YamlLoader};
pub use options::{LogFn, LoaderOptions, RegisterOptions};
pub use registry::{Registry, Shared};

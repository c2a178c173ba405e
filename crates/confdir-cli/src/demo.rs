//! The two config files the demo registers.
//!
//! - `.secret.yml` – credentials; created from a bundled example on first run.
//! - `config.yml`  – optional settings; left at their defaults when absent.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use confdir::{ConfigError, LoaderOptions, RegisterOptions, Shared, YamlLoader};
use serde::{Deserialize, Serialize};

pub const SECRET_FILE: &str = ".secret.yml";
pub const CONFIG_FILE: &str = "config.yml";

/// Example written to `.secret.yml` when it does not exist yet.
pub const EXAMPLE_SECRET: &str = include_str!("secret_config.yml");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub username: String,
    pub password: String,
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the password itself.
        write!(f, "username={} password=<{} chars>", self.username, self.password.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub stay_happy: bool,
    pub path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stay_happy: true,
            path: "/var/etc/sshd".to_string(),
        }
    }
}

/// A loader with both demo files registered, plus handles to their structs.
pub struct DemoConfigs {
    pub loader: YamlLoader,
    pub secret: Shared<Secret>,
    pub settings: Shared<Settings>,
}

impl DemoConfigs {
    /// Builds the loader under `HOME/folder` and registers both files.
    pub fn new(folder: &str, options: LoaderOptions) -> Result<Self, ConfigError> {
        let mut loader = YamlLoader::new(folder, options)?;
        let secret = Rc::new(RefCell::new(Secret::default()));
        let settings = Rc::new(RefCell::new(Settings::default()));

        loader.register_file(
            SECRET_FILE,
            Rc::clone(&secret),
            RegisterOptions::default().with_example(EXAMPLE_SECRET),
        );
        loader.register_file(CONFIG_FILE, Rc::clone(&settings), RegisterOptions::default());

        Ok(Self {
            loader,
            secret,
            settings,
        })
    }

    /// Replaces the stored credentials and writes `.secret.yml`.
    pub fn update_secret(&self, username: &str, password: &str) -> Result<(), ConfigError> {
        {
            let mut secret = self.secret.borrow_mut();
            secret.username = username.to_string();
            secret.password = password.to_string();
        }
        self.loader.save_config(SECRET_FILE)
    }
}

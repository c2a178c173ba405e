//! confdir demo binary.
//!
//! Shows the loader's two everyday flows against a real home directory:
//!
//! ```text
//! confdir [--folder <DIR>] [--verbose] load
//! confdir [--folder <DIR>] [--verbose] save --username <U> --password <P>
//! ```
//!
//! `load` registers `.secret.yml` (created from a bundled example on first
//! run) and `config.yml` (left at its defaults when absent), loads both, and
//! prints the result.  `save` does the same load, replaces the credentials,
//! and writes `.secret.yml` back.
//!
//! | Variable         | Default  | Description                          |
//! |------------------|----------|--------------------------------------|
//! | `CONFDIR_FOLDER` | `.tools` | Config folder relative to `$HOME`    |
//! | `RUST_LOG`       | `info`   | Log filter (`debug` shows each step) |

mod demo;

use anyhow::Context;
use clap::{Parser, Subcommand};
use confdir::LoaderOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use demo::{DemoConfigs, SECRET_FILE};

#[derive(Debug, Parser)]
#[command(
    name = "confdir",
    about = "Load and save YAML config files under the home directory",
    version
)]
struct Cli {
    /// Folder under `$HOME` holding the config files.  Empty means `$HOME` itself.
    #[arg(long, global = true, default_value = ".tools", env = "CONFDIR_FOLDER")]
    folder: String,

    /// Echo every loader step to stderr, independent of `RUST_LOG`.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load all registered files, creating examples where missing.
    Load,
    /// Load, replace the stored credentials, and save `.secret.yml`.
    Save {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut options = LoaderOptions::default();
    if cli.verbose {
        options = options.with_log_fn(|args| eprintln!("[confdir] {args}"));
    }

    let demo = DemoConfigs::new(&cli.folder, options)
        .context("failed to resolve config directory")?;
    info!("config root: {}", demo.loader.root().display());

    let report = demo
        .loader
        .load_all()
        .with_context(|| format!("failed to load configs from {}", demo.loader.root().display()))?;

    for (filename, outcome) in report.iter() {
        info!("{filename}: {outcome}");
    }

    match cli.command {
        Command::Load => {
            println!("secret config loaded: {}", demo.secret.borrow());
            println!("normal config: {:?}", demo.settings.borrow());
        }
        Command::Save { username, password } => {
            let path = demo.loader.path_for(SECRET_FILE)?;
            demo.update_secret(&username, &password)
                .with_context(|| format!("failed to save {}", path.display()))?;
            println!("saved {}", path.display());
        }
    }

    Ok(())
}

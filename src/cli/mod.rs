//! Command-line interface for rendering view models.
//!
//! The `vmrender` binary loads a views directory and an optional configuration
//! file, then forges and renders view models through the same
//! [`ViewModelFactory`](crate::viewmodel::ViewModelFactory) a host application
//! would use.
//!
//! # Commands
//!
//! - `render` - Forge a data-driven view model and print its output
//! - `templates` - List the templates found in the views directory
//!
//! # Examples
//!
//! ```bash
//! # Render views/user/profile.html with two variables
//! vmrender --views ./views render user/profile --var name=Ann --var age=42
//!
//! # Same, inside the `blog` module and without escaping
//! vmrender --module blog render user/profile --data profile.json --no-filter
//!
//! # Configuration from the environment
//! VIEWMODEL_CONFIG=./app.toml vmrender templates
//! ```
//!
//! # Configuration Discovery
//!
//! 1. `--config <FILE>` or `VIEWMODEL_CONFIG`
//! 2. `viewmodel.toml` in the working directory
//! 3. Built-in defaults
//!
//! Relative `views.path` values are resolved against the directory holding the
//! configuration file.

mod render;

pub use render::{DataView, RenderCommand, parse_key_value};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigStore, VIEWS_EXTENSION_KEY};
use crate::view::{DEFAULT_EXTENSION, TeraViewFactory};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "viewmodel.toml";

/// Main CLI structure for `vmrender`.
#[derive(Parser, Debug)]
#[command(
    name = "vmrender",
    about = "Render view models from a directory of Tera templates",
    version
)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "VIEWMODEL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the view templates (overrides `views.path`)
    #[arg(long, global = true)]
    views: Option<PathBuf>,

    /// Module handling the request; qualifies view model class names
    #[arg(short, long, global = true, default_value = "")]
    module: String,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a view model and print the result
    Render(RenderCommand),

    /// List the templates available in the views directory
    Templates,
}

/// Everything a command needs besides its own arguments.
pub struct CliContext {
    /// Loaded configuration
    pub config: ConfigStore,
    /// Templates from the views directory
    pub views: TeraViewFactory,
    /// Module the request is routed to
    pub module: String,
}

impl CliContext {
    /// Load configuration and templates.
    ///
    /// `working_dir` is where `viewmodel.toml` is looked for and what relative
    /// paths are resolved against when no configuration file is used.
    pub fn load(
        config_path: Option<&Path>,
        views_dir: Option<&Path>,
        module: &str,
        working_dir: &Path,
    ) -> Result<Self> {
        let discovered = working_dir.join(DEFAULT_CONFIG_FILE);
        let config_path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None if discovered.is_file() => Some(discovered),
            None => None,
        };

        let (config, base_dir) = match &config_path {
            Some(path) => {
                let config = ConfigStore::load(path)?;
                let base_dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map_or_else(|| working_dir.to_path_buf(), Path::to_path_buf);
                (config, base_dir)
            }
            None => (ConfigStore::new(), working_dir.to_path_buf()),
        };

        let views = match views_dir {
            Some(dir) => {
                let extension = config.get_str(VIEWS_EXTENSION_KEY).unwrap_or(DEFAULT_EXTENSION);
                TeraViewFactory::from_dir(&working_dir.join(dir), extension)?
            }
            None => TeraViewFactory::from_config(&config, &base_dir)?,
        };

        Ok(Self {
            config,
            views,
            module: module.to_string(),
        })
    }
}

impl Cli {
    /// Log filter implied by the verbosity flags.
    ///
    /// `RUST_LOG` applies when neither flag is given; the default is `warn`.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    }

    /// Configuration file given on the command line or through `VIEWMODEL_CONFIG`.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Initialize logging and run the command, printing its output.
    pub fn execute(self) -> Result<()> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();

        let working_dir = std::env::current_dir()?;
        let output = self.run(&working_dir)?;
        if output.is_empty() || output.ends_with('\n') {
            print!("{output}");
        } else {
            println!("{output}");
        }

        Ok(())
    }

    /// Run the command relative to `working_dir` and return what it prints.
    pub fn run(&self, working_dir: &Path) -> Result<String> {
        let context = CliContext::load(
            self.config.as_deref(),
            self.views.as_deref(),
            &self.module,
            working_dir,
        )?;

        match &self.command {
            Commands::Render(cmd) => cmd.execute(context),
            Commands::Templates => {
                let mut output = String::new();
                for path in context.views.template_paths() {
                    output.push_str(&path);
                    output.push('\n');
                }
                Ok(output)
            }
        }
    }
}

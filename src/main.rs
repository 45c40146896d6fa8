//! vmrender entry point
//!
//! Parses the command line, runs the requested command and reports failures
//! with a user-friendly message:
//! - `render` - Forge and render a view model from command-line data
//! - `templates` - List the available view templates

use anyhow::Result;
use clap::Parser;
use viewmodel_cli::cli;
use viewmodel_cli::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

//! Generic configuration parsing utilities.
//!
//! Reads a TOML file and deserializes it into any type implementing
//! [`serde::de::DeserializeOwned`], attaching the file path to every error.
//!
//! Example error output:
//! ```text
//! Failed to parse config file: /path/to/app.toml
//! Caused by:
//!     invalid TOML value, expected string
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into the specified type.
///
/// # Examples
///
/// ```rust,no_run
/// use viewmodel_cli::config::parse_config;
/// use serde::Deserialize;
/// use std::path::Path;
///
/// #[derive(Deserialize)]
/// struct Views {
///     path: String,
/// }
///
/// # fn example() -> anyhow::Result<()> {
/// let views: Views = parse_config(Path::new("views.toml"))?;
/// println!("Templates are loaded from {}", views.path);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does not
/// match the structure of `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

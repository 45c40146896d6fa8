//! Dotted-key configuration store.
//!
//! Values are kept in a TOML table and addressed with dotted keys, so
//! `security.auto_filter_view_data` reads the `auto_filter_view_data` entry of
//! the `[security]` table.

use anyhow::Result;
use std::path::Path;
use toml::{Table, Value};

use super::parser::parse_config;
use crate::core::ViewModelError;

/// Whether values set on views are escaped when no explicit flag is given.
pub const AUTO_FILTER_KEY: &str = "security.auto_filter_view_data";

/// Older spelling of [`AUTO_FILTER_KEY`], consulted when the new key is absent.
pub const LEGACY_AUTO_FILTER_KEY: &str = "security.auto_encode_view_data";

/// Directory holding the view templates.
pub const VIEWS_PATH_KEY: &str = "views.path";

/// File extension of view templates, without the dot.
pub const VIEWS_EXTENSION_KEY: &str = "views.extension";

/// Configuration store with dotted-key access.
///
/// # Examples
///
/// ```rust
/// use viewmodel_cli::config::ConfigStore;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = ConfigStore::from_toml_str(
///     r#"
///     [security]
///     auto_encode_view_data = false
///     "#,
/// )?;
///
/// // The legacy key is used because the new one is not set
/// assert!(!config.auto_filter(None));
/// // An explicit flag always wins
/// assert!(config.auto_filter(Some(true)));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    values: Table,
}

impl ConfigStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already parsed TOML table.
    #[must_use]
    pub fn from_table(values: Table) -> Self {
        Self {
            values,
        }
    }

    /// Parse a store from TOML source text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let values: Table = toml::from_str(content)?;
        Ok(Self::from_table(values))
    }

    /// Load a store from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let values: Table = parse_config(path)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(Self::from_table(values))
    }

    /// Look up a value by dotted key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut current = self.values.get(segments.next()?)?;

        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }

        Some(current)
    }

    /// Look up a string value by dotted key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Look up a value by dotted key and cast it to a boolean.
    ///
    /// Non-boolean values follow the usual loose truthiness rules: zero, the
    /// empty string, `"0"` and empty arrays or tables are `false`.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).map(truthy)
    }

    /// Set a value by dotted key, creating intermediate tables as needed.
    ///
    /// # Errors
    ///
    /// Fails when the key is empty, has an empty segment, or passes through a
    /// value that is not a table.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let mut segments: Vec<&str> = key.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ViewModelError::ConfigError {
                message: format!("Invalid configuration key '{key}'"),
            }
            .into());
        }

        // split always yields at least one segment
        let last = segments.pop().unwrap_or_default();
        let mut table = &mut self.values;

        for segment in segments {
            let entry = table.entry(segment.to_string()).or_insert(Value::Table(Table::new()));
            table = match entry {
                Value::Table(inner) => inner,
                _ => {
                    return Err(ViewModelError::ConfigError {
                        message: format!("Configuration key '{segment}' in '{key}' is not a table"),
                    }
                    .into());
                }
            };
        }

        table.insert(last.to_string(), value.into());
        Ok(())
    }

    /// Resolve the effective auto-filter flag.
    ///
    /// The first value present wins: `explicit`, [`AUTO_FILTER_KEY`],
    /// [`LEGACY_AUTO_FILTER_KEY`]. Filtering is on when none is set.
    #[must_use]
    pub fn auto_filter(&self, explicit: Option<bool>) -> bool {
        explicit
            .or_else(|| self.get_bool(AUTO_FILTER_KEY))
            .or_else(|| self.get_bool(LEGACY_AUTO_FILTER_KEY))
            .unwrap_or(true)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Boolean(b) => *b,
        Value::Integer(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Table(table) => !table.is_empty(),
        Value::Datetime(_) => true,
    }
}

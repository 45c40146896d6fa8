//! Template objects and the factory that produces them.
//!
//! A view model never talks to the template engine directly. It asks a
//! [`ViewFactory`] for a [`Template`] by logical path (`user/profile`) and then
//! reads, writes and stringifies variables through that object. The production
//! implementation is backed by Tera:
//!
//! - [`TeraViewFactory`] - Loads templates from a directory or from strings
//! - [`View`] - Holds raw variables with a per-variable filter flag
//!
//! # Filtering
//!
//! Values are stored exactly as given so that reading them back returns the
//! same value. Escaping happens when the view is rendered: every variable
//! whose filter flag is on is HTML-escaped recursively (strings nested in
//! arrays and objects included).

mod engine;
mod escape;

pub use engine::{DEFAULT_EXTENSION, DEFAULT_VIEWS_DIR, TeraViewFactory, View};
pub use escape::escape_value;

use anyhow::Result;
use serde_json::Value;

/// A per-render template context that holds named variables.
pub trait Template {
    /// Logical path this template was forged from.
    fn path(&self) -> &str;

    /// Current value of a variable, if set.
    fn get(&self, name: &str) -> Option<Value>;

    /// Set a variable. `filter` overrides the template's own auto-filter default.
    fn set(&mut self, name: &str, value: Value, filter: Option<bool>);

    /// Produce the final string form of the template.
    fn render(&self) -> Result<String>;
}

/// Produces template objects from logical paths.
pub trait ViewFactory {
    /// Resolve a template path into a template object.
    fn forge(&self, path: &str) -> Result<Box<dyn Template>>;
}

//! Configuration management
//!
//! View models read a small set of settings from a TOML file:
//!
//! ```toml
//! [security]
//! # Escape values set on views unless a caller says otherwise
//! auto_filter_view_data = true
//! # Older spelling, only consulted when the key above is absent
//! # auto_encode_view_data = true
//!
//! [views]
//! path = "views"
//! extension = "html"
//! ```
//!
//! # Modules
//!
//! - `parser` - Generic TOML parsing with file context in errors
//! - `store` - [`ConfigStore`], dotted-key access and the auto-filter cascade

mod parser;
mod store;

pub use parser::parse_config;
pub use store::{
    AUTO_FILTER_KEY, ConfigStore, LEGACY_AUTO_FILTER_KEY, VIEWS_EXTENSION_KEY, VIEWS_PATH_KEY,
};

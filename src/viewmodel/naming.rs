//! Naming conventions linking identifiers, class names and template paths.
//!
//! | Identifier | Module | Class name | Template path |
//! |---|---|---|---|
//! | `user/profile` | `blog` | `Blog\View_User_Profile` | `user/profile` |
//! | `home` | (none) | `View_Home` | `home` |
//!
//! Class names compare case-insensitively and a leading `\` is ignored, so
//! `\blog\view_user_profile` and `Blog\View_User_Profile` name the same type.

use regex::Regex;

/// Prefix every conventional view model class name starts with.
pub const CLASS_PREFIX: &str = "View_";

/// Separator between a module namespace and a class name.
pub const NAMESPACE_SEPARATOR: char = '\\';

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `user/profile` -> `View_User_Profile`
#[must_use]
pub fn display_class_name(identifier: &str) -> String {
    let segments: Vec<String> =
        identifier.split(['/', '_']).filter(|s| !s.is_empty()).map(ucfirst).collect();
    format!("{}{}", CLASS_PREFIX, segments.join("_"))
}

/// Class name probed first when forging `identifier` inside `module`.
///
/// An empty module produces a global class name without namespace.
#[must_use]
pub fn module_class_name(module: &str, identifier: &str) -> String {
    let class = display_class_name(identifier);
    if module.is_empty() {
        class
    } else {
        format!("{}{}{}", ucfirst(module), NAMESPACE_SEPARATOR, class)
    }
}

/// Key under which a class name is stored and looked up.
#[must_use]
pub fn normalize_class_name(class_name: &str) -> String {
    class_name.trim_start_matches(NAMESPACE_SEPARATOR).to_lowercase()
}

/// Template path used when a view model does not name its own template.
///
/// Strips the namespace and the `View_` prefix, then turns the remaining
/// underscores into path separators: `Blog\View_User_Profile` -> `user/profile`.
#[must_use]
pub fn derive_template_path(class_name: &str) -> String {
    let class_name = class_name.trim_start_matches(NAMESPACE_SEPARATOR);

    let stripped = match Regex::new(r"(?i)^([a-z0-9_]*\\)?(view_)?") {
        Ok(prefix) => prefix.replace(class_name, "").into_owned(),
        Err(_) => class_name.to_string(),
    };

    stripped.replace('_', "/").to_lowercase()
}

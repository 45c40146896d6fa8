//! Registry mapping class names to view model constructors.

use std::collections::HashMap;
use std::fmt;
use strsim::levenshtein;

use super::logic::ViewLogic;
use super::naming::normalize_class_name;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Maximum number of suggestions returned for an unknown class name.
const MAX_SUGGESTIONS: usize = 3;

type Constructor = Box<dyn Fn() -> Box<dyn ViewLogic>>;

struct Registration {
    class_name: String,
    constructor: Constructor,
}

/// View model types known to a [`ViewModelFactory`](super::ViewModelFactory).
///
/// Entries are keyed by class name. Lookups ignore case and a leading `\`.
///
/// # Examples
///
/// ```rust
/// use viewmodel_cli::viewmodel::{ViewLogic, ViewModelRegistry};
///
/// #[derive(Default)]
/// struct Profile;
/// impl ViewLogic for Profile {}
///
/// let mut registry = ViewModelRegistry::new();
/// registry.register_default::<Profile>("Blog\\View_User_Profile");
///
/// assert!(registry.contains("\\blog\\view_user_profile"));
/// assert_eq!(registry.resolve("BLOG\\VIEW_USER_PROFILE"), Some("Blog\\View_User_Profile"));
/// ```
#[derive(Default)]
pub struct ViewModelRegistry {
    entries: HashMap<String, Registration>,
}

impl ViewModelRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under a class name, replacing any previous one.
    pub fn register<F, L>(&mut self, class_name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn() -> L + 'static,
        L: ViewLogic + 'static,
    {
        let class_name = class_name.into();
        let key = normalize_class_name(&class_name);

        let registration = Registration {
            class_name: class_name.clone(),
            constructor: Box::new(move || Box::new(constructor()) as Box<dyn ViewLogic>),
        };

        if let Some(previous) = self.entries.insert(key, registration) {
            tracing::debug!(
                "Replaced view model registration '{}' with '{}'",
                previous.class_name,
                class_name
            );
        } else {
            tracing::debug!("Registered view model '{}'", class_name);
        }

        self
    }

    /// Register a type built with [`Default`].
    pub fn register_default<L>(&mut self, class_name: impl Into<String>) -> &mut Self
    where
        L: ViewLogic + Default + 'static,
    {
        self.register(class_name, L::default)
    }

    /// Whether a class name is registered.
    #[must_use]
    pub fn contains(&self, class_name: &str) -> bool {
        self.entries.contains_key(&normalize_class_name(class_name))
    }

    /// The class name as it was registered.
    #[must_use]
    pub fn resolve(&self, class_name: &str) -> Option<&str> {
        self.entries
            .get(&normalize_class_name(class_name))
            .map(|registration| registration.class_name.as_str())
    }

    /// Build a fresh instance of a registered type.
    #[must_use]
    pub fn construct(&self, class_name: &str) -> Option<Box<dyn ViewLogic>> {
        self.entries
            .get(&normalize_class_name(class_name))
            .map(|registration| (registration.constructor)())
    }

    /// Registered class names, sorted.
    #[must_use]
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.entries.values().map(|registration| registration.class_name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Registered class names close to `class_name`, closest first.
    #[must_use]
    pub fn suggestions(&self, class_name: &str) -> Vec<String> {
        let target = normalize_class_name(class_name);
        let max_distance = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;

        let mut scored: Vec<(usize, &str)> = self
            .entries
            .iter()
            .map(|(key, registration)| (levenshtein(&target, key), registration.class_name.as_str()))
            .filter(|(distance, _)| *distance <= max_distance)
            .collect();

        scored.sort();
        scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, name)| name.to_string()).collect()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ViewModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelRegistry").field("class_names", &self.class_names()).finish()
    }
}

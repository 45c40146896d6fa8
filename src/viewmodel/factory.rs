//! Resolution of identifiers to view model types.

use anyhow::Result;
use std::rc::Rc;

use super::logic::{DEFAULT_METHOD, ViewLogic};
use super::model::{Collaborators, ViewModel};
use super::naming::{display_class_name, module_class_name};
use super::registry::ViewModelRegistry;
use crate::config::ConfigStore;
use crate::core::{ErrorHandler, LoggingErrorHandler, ViewModelError};
use crate::request::Request;
use crate::view::ViewFactory;

/// Forges view models by identifier.
///
/// Owns everything a view model needs besides the request: the registry of
/// known types, the view factory that produces templates, the configuration
/// and the handler for errors swallowed during stringification.
///
/// # Resolution
///
/// For identifier `user/profile` in module `blog`:
///
/// 1. `Blog\View_User_Profile` (module-qualified conventional name)
/// 2. `user/profile` taken literally as a class name
///
/// If neither is registered, [`ViewModelError::ViewModelNotFound`] is returned.
///
/// # Examples
///
/// ```rust
/// use anyhow::Result;
/// use viewmodel_cli::config::ConfigStore;
/// use viewmodel_cli::request::Request;
/// use viewmodel_cli::view::TeraViewFactory;
/// use viewmodel_cli::viewmodel::{ViewLogic, ViewModel, ViewModelFactory, ViewModelRegistry};
///
/// #[derive(Default)]
/// struct Profile;
///
/// impl ViewLogic for Profile {
///     fn view(&mut self, vm: &ViewModel) -> Result<()> {
///         vm.set_value("name", "<Ann>");
///         Ok(())
///     }
/// }
///
/// # fn example() -> Result<()> {
/// let mut registry = ViewModelRegistry::new();
/// registry.register_default::<Profile>("Blog\\View_User_Profile");
///
/// let views = TeraViewFactory::from_templates([("user/profile", "Hi {{ name }}")], "html")?;
/// let factory = ViewModelFactory::new(registry, views, ConfigStore::new());
///
/// let mut request = Request::new("blog");
/// let vm = factory.forge(&mut request, "user/profile")?;
///
/// assert_eq!(vm.render()?, "Hi &lt;Ann&gt;");
/// assert_eq!(request.response().render_body(), "Hi &lt;Ann&gt;");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct ViewModelFactory {
    registry: ViewModelRegistry,
    views: Box<dyn ViewFactory>,
    config: ConfigStore,
    error_handler: Rc<dyn ErrorHandler>,
}

impl ViewModelFactory {
    /// Create a factory that logs swallowed rendering errors.
    pub fn new(
        registry: ViewModelRegistry,
        views: impl ViewFactory + 'static,
        config: ConfigStore,
    ) -> Self {
        Self {
            registry,
            views: Box::new(views),
            config,
            error_handler: Rc::new(LoggingErrorHandler),
        }
    }

    /// Replace the handler used when a view model fails to render for display.
    #[must_use]
    pub fn with_error_handler(mut self, error_handler: Rc<dyn ErrorHandler>) -> Self {
        self.error_handler = error_handler;
        self
    }

    /// Known view model types.
    #[must_use]
    pub fn registry(&self) -> &ViewModelRegistry {
        &self.registry
    }

    /// Mutable access for registering more types.
    pub fn registry_mut(&mut self) -> &mut ViewModelRegistry {
        &mut self.registry
    }

    /// Configuration consulted for default settings.
    #[must_use]
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Mutable configuration.
    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    /// Resolve an identifier to a registered class name.
    ///
    /// # Errors
    ///
    /// [`ViewModelError::ViewModelNotFound`] when no candidate is registered.
    pub fn resolve(&self, module: &str, identifier: &str) -> Result<String> {
        let qualified = module_class_name(module, identifier);
        if let Some(class_name) = self.registry.resolve(&qualified) {
            tracing::debug!("Resolved '{}' to '{}'", identifier, class_name);
            return Ok(class_name.to_string());
        }

        if let Some(class_name) = self.registry.resolve(identifier) {
            tracing::debug!("Resolved '{}' as a class name", identifier);
            return Ok(class_name.to_string());
        }

        Err(ViewModelError::ViewModelNotFound {
            name: display_class_name(identifier),
            suggestions: self.registry.suggestions(&qualified),
        }
        .into())
    }

    /// Forge a view model that renders with the default `view` method.
    pub fn forge(&self, request: &mut Request, identifier: &str) -> Result<ViewModel> {
        self.forge_with(request, identifier, DEFAULT_METHOD, None)
    }

    /// Forge a view model with an explicit render method and auto-filter flag.
    ///
    /// `auto_filter` of `None` defers to the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the identifier cannot be resolved, when the template cannot
    /// be forged, or when the `before` hook fails. Errors are not wrapped.
    pub fn forge_with(
        &self,
        request: &mut Request,
        identifier: &str,
        method: &str,
        auto_filter: Option<bool>,
    ) -> Result<ViewModel> {
        let class_name = self.resolve(request.module(), identifier)?;
        let logic = self.registry.construct(&class_name).ok_or_else(|| {
            ViewModelError::ViewModelNotFound {
                name: display_class_name(identifier),
                suggestions: Vec::new(),
            }
        })?;

        self.instantiate(request, &class_name, logic, method, auto_filter)
    }

    /// Older name of [`forge_with`](Self::forge_with).
    #[deprecated(note = "use forge_with() instead")]
    pub fn factory(
        &self,
        request: &mut Request,
        identifier: &str,
        method: &str,
    ) -> Result<ViewModel> {
        tracing::warn!("This method is deprecated. Please use forge() instead.");
        self.forge_with(request, identifier, method, None)
    }

    /// Construct a view model from logic that was not looked up in the registry.
    pub fn instantiate(
        &self,
        request: &mut Request,
        class_name: &str,
        logic: Box<dyn ViewLogic>,
        method: &str,
        auto_filter: Option<bool>,
    ) -> Result<ViewModel> {
        ViewModel::construct(
            class_name,
            logic,
            method,
            auto_filter,
            Collaborators {
                views: self.views.as_ref(),
                config: &self.config,
                error_handler: Rc::clone(&self.error_handler),
            },
            request,
        )
    }
}

impl std::fmt::Debug for ViewModelFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewModelFactory")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

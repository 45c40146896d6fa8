use anyhow::Result;
use serde_json::Value;
use std::cell::{Cell, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::logic::ViewLogic;
use super::naming::derive_template_path;
use crate::config::ConfigStore;
use crate::core::{ErrorHandler, ViewModelError};
use crate::request::Request;
use crate::view::{Template, ViewFactory};

/// Where a view model is in its render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Constructed and `before` has run
    Constructed,
    /// Running the render method
    RenderingMethod,
    /// Running `after`
    RenderingAfter,
    /// The template has been stringified
    Rendered,
}

struct Inner {
    class_name: String,
    method: String,
    auto_filter: Cell<bool>,
    state: Cell<RenderState>,
    template: RefCell<Box<dyn Template>>,
    logic: RefCell<Box<dyn ViewLogic>>,
    error_handler: Rc<dyn ErrorHandler>,
}

/// Collaborators a view model needs while it is constructed.
pub(crate) struct Collaborators<'a> {
    pub(crate) views: &'a dyn ViewFactory,
    pub(crate) config: &'a ConfigStore,
    pub(crate) error_handler: Rc<dyn ErrorHandler>,
}

/// A template bound to the logic that fills it.
///
/// `ViewModel` is a handle: clones share the same instance. This lets the
/// first view model of a request be published as the response body while the
/// caller keeps using it. It is single-threaded by construction.
///
/// Instances come from [`ViewModelFactory::forge`](super::ViewModelFactory::forge).
///
/// # Rendering
///
/// [`render`](Self::render) runs the configured method, then `after`, then
/// stringifies the template, propagating any error. Formatting the view model
/// with [`Display`](fmt::Display) renders too, but hands errors to the
/// factory's [`ErrorHandler`] and produces an empty string instead.
#[derive(Clone)]
pub struct ViewModel {
    inner: Rc<Inner>,
}

impl ViewModel {
    /// Bind `logic` to its template, run `before` and publish the instance as
    /// the response body if the request has none yet.
    pub(crate) fn construct(
        class_name: &str,
        logic: Box<dyn ViewLogic>,
        method: &str,
        auto_filter: Option<bool>,
        collaborators: Collaborators<'_>,
        request: &mut Request,
    ) -> Result<Self> {
        let template_path =
            logic.template_path().unwrap_or_else(|| derive_template_path(class_name));
        let template = collaborators.views.forge(&template_path)?;
        let auto_filter = collaborators.config.auto_filter(auto_filter);

        tracing::debug!(
            "Constructing view model '{}' (template '{}', method '{}', auto_filter={})",
            class_name,
            template_path,
            method,
            auto_filter
        );

        let view_model = Self {
            inner: Rc::new(Inner {
                class_name: class_name.to_string(),
                method: method.to_string(),
                auto_filter: Cell::new(auto_filter),
                state: Cell::new(RenderState::Constructed),
                template: RefCell::new(template),
                logic: RefCell::new(logic),
                error_handler: collaborators.error_handler,
            }),
        };

        view_model.logic_mut()?.before(&view_model)?;

        // First view model of the request becomes the response body
        if !request.response().has_body() {
            tracing::debug!("Publishing view model '{}' as response body", class_name);
            request.response_mut().set_body(view_model.clone());
        }

        Ok(view_model)
    }

    fn logic_mut(&self) -> Result<RefMut<'_, Box<dyn ViewLogic>>> {
        self.inner.logic.try_borrow_mut().map_err(|_| {
            ViewModelError::ReentrantRender {
                class: self.inner.class_name.clone(),
            }
            .into()
        })
    }

    /// Class name the view model was resolved to.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.inner.class_name
    }

    /// Name of the render method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.inner.method
    }

    /// Path of the bound template.
    #[must_use]
    pub fn template_path(&self) -> String {
        self.inner.template.borrow().path().to_string()
    }

    /// Current stage of the render cycle.
    #[must_use]
    pub fn state(&self) -> RenderState {
        self.inner.state.get()
    }

    /// Whether values set without an explicit filter flag are escaped.
    #[must_use]
    pub fn auto_filter(&self) -> bool {
        self.inner.auto_filter.get()
    }

    /// Change the auto-filter flag for subsequent [`set`](Self::set) calls.
    pub fn set_auto_filter(&self, auto_filter: bool) -> &Self {
        self.inner.auto_filter.set(auto_filter);
        self
    }

    /// Read a variable from the bound template.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.template.borrow().get(name)
    }

    /// Write a variable to the bound template.
    ///
    /// `filter` overrides the auto-filter flag for this variable only.
    pub fn set(&self, name: &str, value: impl Into<Value>, filter: Option<bool>) -> &Self {
        let filter = filter.unwrap_or_else(|| self.auto_filter());
        self.inner.template.borrow_mut().set(name, value.into(), Some(filter));
        self
    }

    /// Write a variable using the auto-filter flag.
    pub fn set_value(&self, name: &str, value: impl Into<Value>) -> &Self {
        self.set(name, value, None)
    }

    /// Run the render method and `after`, then stringify the template.
    ///
    /// # Errors
    ///
    /// Errors from the hooks and the template are returned unmodified. Calling
    /// `render` from one of this view model's own hooks fails with
    /// [`ViewModelError::ReentrantRender`].
    pub fn render(&self) -> Result<String> {
        let mut logic = self.logic_mut()?;
        tracing::debug!("Rendering view model '{}'", self.inner.class_name);

        self.inner.state.set(RenderState::RenderingMethod);
        logic.invoke(&self.inner.method, self)?;

        self.inner.state.set(RenderState::RenderingAfter);
        logic.after(self)?;
        drop(logic);

        let output = self.inner.template.borrow().render()?;
        self.inner.state.set(RenderState::Rendered);

        Ok(output)
    }

    /// Whether two handles refer to the same view model.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(output) => f.write_str(&output),
            Err(error) => {
                self.inner.error_handler.handle(&error);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("class_name", &self.inner.class_name)
            .field("method", &self.inner.method)
            .field("auto_filter", &self.inner.auto_filter.get())
            .field("state", &self.inner.state.get())
            .finish_non_exhaustive()
    }
}

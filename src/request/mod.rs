//! Request context passed explicitly to view model construction.
//!
//! A [`Request`] names the active module (used to qualify view model class
//! names) and owns the [`Response`] whose body the first view model of the
//! request claims.

use std::fmt;

use crate::viewmodel::ViewModel;

/// The body of a response.
#[derive(Clone)]
pub enum ResponseBody {
    /// Literal text
    Text(String),
    /// A view model, rendered when the body is turned into a string
    ViewModel(ViewModel),
}

impl ResponseBody {
    /// Text that is empty or exactly `"0"` does not count as a body.
    fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty() || text == "0")
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::ViewModel(view_model) => fmt::Display::fmt(view_model, f),
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::ViewModel(view_model) => {
                f.debug_tuple("ViewModel").field(&view_model.class_name()).finish()
            }
        }
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ViewModel> for ResponseBody {
    fn from(view_model: ViewModel) -> Self {
        Self::ViewModel(view_model)
    }
}

/// Response of the controller handling a request.
#[derive(Debug, Default, Clone)]
pub struct Response {
    body: Option<ResponseBody>,
}

impl Response {
    /// Create a response without a body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current body, if one has been set.
    #[must_use]
    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }

    /// Whether a non-empty body has been set.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|body| !body.is_empty())
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: impl Into<ResponseBody>) {
        self.body = Some(body.into());
    }

    /// Remove and return the body.
    pub fn take_body(&mut self) -> Option<ResponseBody> {
        self.body.take()
    }

    /// Final string form of the body; empty when there is none.
    ///
    /// View model bodies are stringified, so rendering errors are reported to
    /// their error handler and never returned from here.
    #[must_use]
    pub fn render_body(&self) -> String {
        self.body.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}

/// The request being processed.
#[derive(Debug, Clone)]
pub struct Request {
    module: String,
    response: Response,
}

impl Request {
    /// Create a request routed to `module`. An empty module means the application root.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            response: Response::new(),
        }
    }

    /// Name of the module handling the request.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Response of the active controller.
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable response of the active controller.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new("")
    }
}

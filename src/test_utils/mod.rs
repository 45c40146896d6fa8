//! Test utilities
//!
//! Stub collaborators and recording helpers for exercising view models without a
//! template engine:
//!
//! - [`StubViewFactory`] / [`StubTemplate`] - In-memory templates with a predictable string form
//! - [`RecordingLogic`] - A [`ViewLogic`] that records every hook it runs into a [`CallLog`]
//! - [`RecordingErrorHandler`] - Collects errors swallowed during stringification
//!
//! # Example
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use viewmodel_cli::config::ConfigStore;
//! use viewmodel_cli::request::Request;
//! use viewmodel_cli::test_utils::{CallLog, RecordingErrorHandler, RecordingLogic, StubViewFactory};
//! use viewmodel_cli::viewmodel::{ViewModelFactory, ViewModelRegistry};
//!
//! let log = CallLog::new();
//! let hook_log = log.clone();
//! let mut registry = ViewModelRegistry::new();
//! registry.register("View_Home", move || RecordingLogic::new(&hook_log));
//!
//! let handler = Rc::new(RecordingErrorHandler::new());
//! let factory = ViewModelFactory::new(registry, StubViewFactory::new(), ConfigStore::new())
//!     .with_error_handler(handler.clone());
//!
//! let mut request = Request::default();
//! let vm = factory.forge(&mut request, "home").unwrap();
//! vm.render().unwrap();
//! assert_eq!(log.calls(), vec!["before", "view", "after"]);
//! ```

use anyhow::{Result, bail};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::{ErrorHandler, ViewModelError};
use crate::view::{Template, ViewFactory};
use crate::viewmodel::{DEFAULT_METHOD, ViewLogic, ViewModel};

/// Environment variable holding a log directive for test runs.
pub const TEST_LOG_ENV: &str = "VIEWMODEL_TEST_LOG";

static INIT_LOGGING: Once = Once::new();

/// Log directive used by [`init_test_logging`].
///
/// `VIEWMODEL_TEST_LOG` is taken verbatim. A `level` only enables this crate's
/// own events, keeping Tera and other dependencies quiet. `RUST_LOG` is the
/// last resort; `None` means logging stays off.
#[must_use]
pub fn test_log_directive(level: Option<Level>) -> Option<String> {
    if let Ok(directive) = std::env::var(TEST_LOG_ENV) {
        return Some(directive);
    }

    match level {
        Some(level) => Some(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
        None => std::env::var("RUST_LOG").ok(),
    }
}

/// Install a compact subscriber writing through the test harness.
///
/// Only the first call has an effect, so every test may call it.
///
/// ```bash
/// VIEWMODEL_TEST_LOG=viewmodel_cli=debug cargo test --test integration
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let Some(directive) = test_log_directive(level) else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .compact()
            .with_env_filter(EnvFilter::new(directive))
            .with_test_writer()
            .with_target(false)
            .with_ansi(false)
            .without_time()
            .try_init();
    });
}

/// Shared, ordered record of hook invocations.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    /// All entries in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// How many times `entry` was recorded.
    #[must_use]
    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }
}

/// A [`ViewLogic`] that records its hooks and can be told to misbehave.
#[derive(Debug, Clone)]
pub struct RecordingLogic {
    log: CallLog,
    variables: Vec<(String, Value)>,
    methods: Vec<String>,
    template_path: Option<String>,
    failing_in: Option<String>,
    render_self: bool,
}

impl RecordingLogic {
    /// Record into `log`.
    #[must_use]
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            variables: Vec::new(),
            methods: Vec::new(),
            template_path: None,
            failing_in: None,
            render_self: false,
        }
    }

    /// Set `name` on the view model from every render method.
    #[must_use]
    pub fn with_variable(mut self, name: &str, value: Value) -> Self {
        self.variables.push((name.to_string(), value));
        self
    }

    /// Accept an additional render method name.
    #[must_use]
    pub fn with_method(mut self, method: &str) -> Self {
        self.methods.push(method.to_string());
        self
    }

    /// Bind an explicit template instead of the derived one.
    #[must_use]
    pub fn with_template(mut self, path: &str) -> Self {
        self.template_path = Some(path.to_string());
        self
    }

    /// Fail with `"<hook> failed"` when `hook` runs.
    #[must_use]
    pub fn failing_in(mut self, hook: &str) -> Self {
        self.failing_in = Some(hook.to_string());
        self
    }

    /// Render the owning view model from inside the render method.
    #[must_use]
    pub fn rendering_itself(mut self) -> Self {
        self.render_self = true;
        self
    }

    fn record(&self, hook: &str) -> Result<()> {
        self.log.push(hook);
        if self.failing_in.as_deref() == Some(hook) {
            bail!("{hook} failed");
        }
        Ok(())
    }

    fn fill(&self, vm: &ViewModel) -> Result<()> {
        for (name, value) in &self.variables {
            vm.set_value(name, value.clone());
        }
        if self.render_self {
            vm.render()?;
        }
        Ok(())
    }
}

impl ViewLogic for RecordingLogic {
    fn template_path(&self) -> Option<String> {
        self.template_path.clone()
    }

    fn before(&mut self, _vm: &ViewModel) -> Result<()> {
        self.record("before")
    }

    fn view(&mut self, vm: &ViewModel) -> Result<()> {
        self.record(DEFAULT_METHOD)?;
        self.fill(vm)
    }

    fn after(&mut self, _vm: &ViewModel) -> Result<()> {
        self.record("after")
    }

    fn invoke(&mut self, method: &str, vm: &ViewModel) -> Result<()> {
        if method == DEFAULT_METHOD {
            return self.view(vm);
        }

        if self.methods.iter().any(|m| m == method) {
            self.record(method)?;
            return self.fill(vm);
        }

        Err(ViewModelError::MethodNotFound {
            class: vm.class_name().to_string(),
            method: method.to_string(),
        }
        .into())
    }
}

/// Template whose string form lists its variables: `path{a=1,b="x"!}`.
///
/// Values are JSON-encoded; a trailing `!` marks a filtered variable.
#[derive(Debug, Clone, Default)]
pub struct StubTemplate {
    path: String,
    data: BTreeMap<String, (Value, bool)>,
}

impl StubTemplate {
    /// Create an empty template for `path`.
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            data: BTreeMap::new(),
        }
    }
}

impl Template for StubTemplate {
    fn path(&self) -> &str {
        &self.path
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.data.get(name).map(|(value, _)| value.clone())
    }

    fn set(&mut self, name: &str, value: Value, filter: Option<bool>) {
        self.data.insert(name.to_string(), (value, filter.unwrap_or(true)));
    }

    fn render(&self) -> Result<String> {
        let entries: Vec<String> = self
            .data
            .iter()
            .map(|(name, (value, filter))| {
                format!("{}={}{}", name, value, if *filter { "!" } else { "" })
            })
            .collect();
        Ok(format!("{}{{{}}}", self.path, entries.join(",")))
    }
}

/// View factory producing [`StubTemplate`]s for any path.
#[derive(Debug, Clone, Default)]
pub struct StubViewFactory {
    forged: Rc<RefCell<Vec<String>>>,
    missing: Vec<String>,
}

impl StubViewFactory {
    /// Create a factory that knows every path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `path` as missing.
    #[must_use]
    pub fn failing_on(mut self, path: &str) -> Self {
        self.missing.push(path.to_string());
        self
    }

    /// Paths forged so far, shared between clones.
    #[must_use]
    pub fn forged_paths(&self) -> Vec<String> {
        self.forged.borrow().clone()
    }
}

impl ViewFactory for StubViewFactory {
    fn forge(&self, path: &str) -> Result<Box<dyn Template>> {
        if self.missing.iter().any(|m| m == path) {
            return Err(ViewModelError::TemplateNotFound {
                path: path.to_string(),
            }
            .into());
        }

        self.forged.borrow_mut().push(path.to_string());
        Ok(Box::new(StubTemplate::new(path)))
    }
}

/// Error handler that keeps every error it receives.
#[derive(Debug, Default)]
pub struct RecordingErrorHandler {
    messages: RefCell<Vec<String>>,
}

impl RecordingErrorHandler {
    /// Create a handler with no recorded errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of errors handled.
    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.borrow().len()
    }

    /// Handled errors formatted with their cause chain.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl ErrorHandler for RecordingErrorHandler {
    fn handle(&self, error: &anyhow::Error) {
        self.messages.borrow_mut().push(format!("{error:#}"));
    }
}

//! Tera-backed view factory and template object.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error as _;
use std::path::Path;
use std::rc::Rc;
use tera::{Context as TeraContext, Tera};

use super::escape::escape_value;
use super::{Template, ViewFactory};
use crate::config::{ConfigStore, VIEWS_EXTENSION_KEY, VIEWS_PATH_KEY};
use crate::core::ViewModelError;

/// Template file extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "html";

/// Views directory used when none is configured, relative to the working directory.
pub const DEFAULT_VIEWS_DIR: &str = "views";

/// View factory backed by a shared Tera instance.
///
/// Template `user/profile` maps to the Tera template `user/profile.<extension>`.
/// Tera's own autoescaping is switched off: whether a value is escaped is
/// decided per variable by the [`View`] it is set on.
///
/// # Examples
///
/// ```rust
/// use viewmodel_cli::view::{TeraViewFactory, ViewFactory};
/// use serde_json::json;
///
/// # fn example() -> anyhow::Result<()> {
/// let views = TeraViewFactory::from_templates([("hello", "Hello {{ name }}!")], "html")?;
///
/// let mut view = views.forge("hello")?;
/// view.set("name", json!("<World>"), None);
/// assert_eq!(view.render()?, "Hello &lt;World&gt;!");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct TeraViewFactory {
    engine: Rc<Tera>,
    extension: String,
}

impl TeraViewFactory {
    /// Load every `*.<extension>` file below `dir`.
    ///
    /// Fails when `dir` is not an existing directory.
    pub fn from_dir(dir: &Path, extension: &str) -> Result<Self> {
        if !dir.is_dir() {
            let missing = std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Views directory does not exist: {}", dir.display()),
            );
            return Err(anyhow::Error::from(missing)
                .context(format!("Failed to load view templates from {}", dir.display())));
        }

        let pattern = format!("{}/**/*.{}", dir.display(), extension);
        tracing::debug!("Loading view templates matching {}", pattern);

        let tera = Tera::new(&pattern)
            .map_err(|e| anyhow::anyhow!(format_tera_error(&e)))
            .with_context(|| format!("Failed to load view templates from {}", dir.display()))?;

        Ok(Self::with_engine(tera, extension))
    }

    /// Build a factory from in-memory `(path, source)` pairs.
    pub fn from_templates<I, P, S>(templates: I, extension: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (P, S)>,
        P: AsRef<str>,
        S: AsRef<str>,
    {
        let mut tera = Tera::default();
        let sources: Vec<(String, String)> = templates
            .into_iter()
            .map(|(path, source)| {
                (format!("{}.{}", path.as_ref(), extension), source.as_ref().to_string())
            })
            .collect();

        tera.add_raw_templates(sources)
            .map_err(|e| anyhow::anyhow!(format_tera_error(&e)))
            .context("Failed to parse view templates")?;

        Ok(Self::with_engine(tera, extension))
    }

    /// Load templates from the directory named by `views.path`.
    ///
    /// A relative `views.path` is resolved against `base_dir`. Missing keys fall
    /// back to [`DEFAULT_VIEWS_DIR`] and [`DEFAULT_EXTENSION`].
    pub fn from_config(config: &ConfigStore, base_dir: &Path) -> Result<Self> {
        let dir = config.get_str(VIEWS_PATH_KEY).unwrap_or(DEFAULT_VIEWS_DIR);
        let extension = config.get_str(VIEWS_EXTENSION_KEY).unwrap_or(DEFAULT_EXTENSION);

        Self::from_dir(&base_dir.join(dir), extension)
    }

    fn with_engine(mut tera: Tera, extension: &str) -> Self {
        tera.autoescape_on(vec![]);
        Self {
            engine: Rc::new(tera),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Logical paths of every loaded template, sorted.
    #[must_use]
    pub fn template_paths(&self) -> Vec<String> {
        let suffix = format!(".{}", self.extension);
        let mut paths: Vec<String> = self
            .engine
            .get_template_names()
            .filter_map(|name| name.strip_suffix(&suffix))
            .map(str::to_string)
            .collect();
        paths.sort();
        paths
    }

    /// Whether a template exists for a logical path.
    #[must_use]
    pub fn has_template(&self, path: &str) -> bool {
        let name = self.template_name(path);
        self.engine.get_template_names().any(|n| n == name)
    }

    fn template_name(&self, path: &str) -> String {
        format!("{}.{}", path.trim_matches('/'), self.extension)
    }
}

impl ViewFactory for TeraViewFactory {
    fn forge(&self, path: &str) -> Result<Box<dyn Template>> {
        if !self.has_template(path) {
            return Err(ViewModelError::TemplateNotFound {
                path: path.to_string(),
            }
            .into());
        }

        tracing::debug!("Forged view '{}'", path);
        Ok(Box::new(View::new(path, self.template_name(path), Rc::clone(&self.engine))))
    }
}

/// A Tera template plus the variables that will be rendered into it.
pub struct View {
    path: String,
    template_name: String,
    engine: Rc<Tera>,
    data: BTreeMap<String, (Value, bool)>,
    auto_filter: bool,
}

impl View {
    fn new(path: &str, template_name: String, engine: Rc<Tera>) -> Self {
        Self {
            path: path.to_string(),
            template_name,
            engine,
            data: BTreeMap::new(),
            auto_filter: true,
        }
    }

    /// Change the filter default used by [`Template::set`] calls without an override.
    pub fn set_auto_filter(&mut self, auto_filter: bool) -> &mut Self {
        self.auto_filter = auto_filter;
        self
    }

    /// Whether a variable will be escaped when rendered.
    #[must_use]
    pub fn is_filtered(&self, name: &str) -> Option<bool> {
        self.data.get(name).map(|(_, filter)| *filter)
    }

    fn build_context(&self) -> TeraContext {
        let mut context = TeraContext::new();
        for (name, (value, filter)) in &self.data {
            if *filter {
                context.insert(name.as_str(), &escape_value(value));
            } else {
                context.insert(name.as_str(), value);
            }
        }
        context
    }
}

impl Template for View {
    fn path(&self) -> &str {
        &self.path
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.data.get(name).map(|(value, _)| value.clone())
    }

    fn set(&mut self, name: &str, value: Value, filter: Option<bool>) {
        let filter = filter.unwrap_or(self.auto_filter);
        self.data.insert(name.to_string(), (value, filter));
    }

    fn render(&self) -> Result<String> {
        let context = self.build_context();
        tracing::debug!("Rendering view '{}' with {} variable(s)", self.path, self.data.len());

        self.engine.render(&self.template_name, &context).map_err(|e| {
            ViewModelError::TemplateRender {
                path: self.path.clone(),
                message: format_tera_error(&e),
            }
            .into()
        })
    }
}

/// Flatten a Tera error and its sources into one line.
///
/// Tera nests the useful part of a failure (the missing variable, the parse
/// position) inside generic outer messages such as "Failed to render".
fn format_tera_error(error: &tera::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

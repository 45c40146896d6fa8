//! The `render` command.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::CliContext;
use crate::request::{Request, ResponseBody};
use crate::viewmodel::{DEFAULT_METHOD, ViewLogic, ViewModel, ViewModelFactory, ViewModelRegistry};
use crate::viewmodel::naming::module_class_name;

/// Render a view model whose variables come from the command line.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// View model identifier, e.g. `user/profile`
    identifier: String,

    /// Variable as KEY=VALUE; VALUE is read as JSON, or as a string if it is not JSON
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    vars: Vec<(String, Value)>,

    /// Variable that is never escaped, as KEY=VALUE
    #[arg(long = "raw", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    raw_vars: Vec<(String, Value)>,

    /// JSON file holding an object of variables
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Template to use instead of the one derived from the class name
    #[arg(long, value_name = "PATH")]
    template: Option<String>,

    /// Render method to invoke
    #[arg(long, default_value = DEFAULT_METHOD)]
    method: String,

    /// Escape variables regardless of configuration
    #[arg(long, conflicts_with = "no_filter")]
    filter: bool,

    /// Do not escape variables regardless of configuration
    #[arg(long)]
    no_filter: bool,
}

impl RenderCommand {
    fn auto_filter(&self) -> Option<bool> {
        match (self.filter, self.no_filter) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Collect variables in the order they are applied.
    ///
    /// Data file entries come first so `--var` and `--raw` can override them.
    fn variables(&self) -> Result<Vec<(String, Value, Option<bool>)>> {
        let mut variables = Vec::new();

        if let Some(path) = &self.data {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read data file: {}", path.display()))?;
            let data: Map<String, Value> = serde_json::from_str(&content)
                .with_context(|| format!("Data file must hold a JSON object: {}", path.display()))?;
            variables.extend(data.into_iter().map(|(name, value)| (name, value, None)));
        }

        variables.extend(self.vars.iter().map(|(name, value)| (name.clone(), value.clone(), None)));
        variables.extend(
            self.raw_vars.iter().map(|(name, value)| (name.clone(), value.clone(), Some(false))),
        );

        Ok(variables)
    }

    /// Forge the view model and render the response body.
    pub fn execute(&self, context: CliContext) -> Result<String> {
        let class_name = module_class_name(&context.module, &self.identifier);
        let logic = DataView::new(self.variables()?, self.template.clone());

        tracing::debug!("Registering '{}' for '{}'", class_name, self.identifier);
        let mut registry = ViewModelRegistry::new();
        registry.register(class_name, move || logic.clone());

        let factory = ViewModelFactory::new(registry, context.views, context.config);
        let mut request = Request::new(context.module);
        let vm = factory.forge_with(&mut request, &self.identifier, &self.method, self.auto_filter())?;
        tracing::debug!("Forged {:?}", vm);

        match request.response_mut().take_body() {
            Some(ResponseBody::ViewModel(body)) => body.render(),
            Some(ResponseBody::Text(text)) => Ok(text),
            None => Ok(String::new()),
        }
    }
}

/// View logic that sets a fixed list of variables.
#[derive(Debug, Clone, Default)]
pub struct DataView {
    variables: Vec<(String, Value, Option<bool>)>,
    template_path: Option<String>,
}

impl DataView {
    /// Create logic that sets `variables` and renders `template_path`, if given.
    #[must_use]
    pub fn new(variables: Vec<(String, Value, Option<bool>)>, template_path: Option<String>) -> Self {
        Self {
            variables,
            template_path,
        }
    }
}

impl ViewLogic for DataView {
    fn template_path(&self) -> Option<String> {
        self.template_path.clone()
    }

    fn view(&mut self, vm: &ViewModel) -> Result<()> {
        for (name, value, filter) in &self.variables {
            vm.set(name, value.clone(), *filter);
        }
        Ok(())
    }
}

/// Parse a `KEY=VALUE` argument.
///
/// The value is parsed as JSON so numbers, booleans, arrays and objects keep
/// their type; anything that is not valid JSON is taken as a plain string.
pub fn parse_key_value(arg: &str) -> Result<(String, Value), String> {
    let Some((key, value)) = arg.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got '{arg}'"));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{arg}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
